pub mod gapped;

pub use gapped::{GappedSeq, GAP};

use crate::alphabets::{dna, protein, Alphabet};
use crate::error::{NwError, NwResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SeqKind {
    Nucleotide,
    Protein,
}

impl SeqKind {
    pub fn default_alphabet(self) -> Alphabet {
        match self {
            SeqKind::Nucleotide => dna::iupac_alphabet(),
            SeqKind::Protein => protein::iupac_alphabet(),
        }
    }
}

/// Borrowed residues that passed alphabet validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sequence<'a> {
    bytes: &'a [u8],
    kind: SeqKind,
}

impl<'a> Sequence<'a> {
    /// Validate `bytes` against `alphabet`. `which` (1 or 2) only labels the error.
    pub fn new(bytes: &'a [u8], kind: SeqKind, alphabet: &Alphabet, which: u8) -> NwResult<Self> {
        if let Some((pos, b)) = alphabet.first_invalid(bytes) {
            return Err(NwError::InvalidSequence {
                seq: which,
                ch: b as char,
                pos,
            });
        }
        Ok(Self { bytes, kind })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn kind(&self) -> SeqKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_nucleotide() {
        let alpha = SeqKind::Nucleotide.default_alphabet();
        let seq = Sequence::new(b"ACGTNacgtn", SeqKind::Nucleotide, &alpha, 1).unwrap();
        assert_eq!(seq.len(), 10);
        assert_eq!(seq.kind(), SeqKind::Nucleotide);
    }

    #[test]
    fn invalid_char_rejected() {
        let alpha = SeqKind::Nucleotide.default_alphabet();
        let err = Sequence::new(b"AGXZ", SeqKind::Nucleotide, &alpha, 1).unwrap_err();
        match err {
            NwError::InvalidSequence { seq, ch, pos } => {
                assert_eq!(seq, 1);
                assert_eq!(ch, 'X');
                assert_eq!(pos, 2);
            }
            _ => panic!("expected InvalidSequence"),
        }
    }

    #[test]
    fn protein_accepts_what_dna_rejects() {
        let alpha = SeqKind::Protein.default_alphabet();
        assert!(Sequence::new(b"AGXZ", SeqKind::Protein, &alpha, 2).is_ok());
    }

    #[test]
    fn empty_is_valid() {
        let alpha = SeqKind::Nucleotide.default_alphabet();
        let seq = Sequence::new(b"", SeqKind::Nucleotide, &alpha, 1).unwrap();
        assert!(seq.is_empty());
    }
}
