//! Global pairwise alignment with affine gap penalties.
//!
//! [`align::Aligner`] runs either a full-matrix Needleman-Wunsch
//! ([`align::Strategy::Quadratic`]) or the Myers-Miller linear-space
//! variant ([`align::Strategy::LinearSpace`]). Both return the same score
//! and the same transcript for the same inputs.

#[macro_use]
mod par;

pub mod align;
pub mod alphabets;
pub mod error;
pub mod seq;

pub use align::{align_pairs, Aligner, Alignment, MatrixType, Strategy};
pub use error::{NwError, NwResult};
