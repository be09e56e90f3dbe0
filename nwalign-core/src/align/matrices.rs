//! 256x256 substitution tables keyed by raw residue bytes.

use crate::alphabets::Alphabet;
use crate::error::{NwError, NwResult};
use crate::seq::SeqKind;

const DIM: usize = 256;

/// Square substitution matrix over a small symbol set, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedScoreMatrix {
    pub symbols: Vec<u8>,
    pub scores: Vec<i8>,
    /// Score for any pair involving a byte outside `symbols`.
    pub default_score: i8,
}

impl PackedScoreMatrix {
    pub fn new(symbols: &[u8], scores: Vec<i8>, default_score: i8) -> NwResult<Self> {
        let m = Self {
            symbols: symbols.to_vec(),
            scores,
            default_score,
        };
        m.validate()?;
        Ok(m)
    }

    pub fn blosum62() -> Self {
        Self {
            symbols: BLOSUM62_SYMBOLS.to_vec(),
            scores: BLOSUM62.to_vec(),
            default_score: -4,
        }
    }

    pub fn validate(&self) -> NwResult<()> {
        let n = self.symbols.len();
        if n == 0 {
            return Err(NwError::bad_parameter("packed matrix has no symbols"));
        }
        if self.scores.len() != n * n {
            return Err(NwError::bad_parameter(format!(
                "packed matrix over {} symbols needs {} scores, got {}",
                n,
                n * n,
                self.scores.len()
            )));
        }
        let mut seen = Alphabet::default();
        for &s in &self.symbols {
            let u = s.to_ascii_uppercase();
            if seen.contains(u) {
                return Err(NwError::bad_parameter(format!(
                    "packed matrix repeats symbol '{}'",
                    s as char
                )));
            }
            seen.insert(u);
        }
        Ok(())
    }

    pub fn alphabet(&self) -> Alphabet {
        Alphabet::case_insensitive(&self.symbols)
    }
}

/// Scoring table selected at aligner construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatrixType {
    Nucleotide,
    Blosum62,
    Packed(PackedScoreMatrix),
}

impl MatrixType {
    pub fn kind(&self) -> SeqKind {
        match self {
            MatrixType::Nucleotide => SeqKind::Nucleotide,
            MatrixType::Blosum62 | MatrixType::Packed(_) => SeqKind::Protein,
        }
    }

    /// Bytes accepted in sequences scored by this table.
    pub fn alphabet(&self) -> Alphabet {
        match self {
            MatrixType::Nucleotide | MatrixType::Blosum62 => self.kind().default_alphabet(),
            MatrixType::Packed(p) => p.alphabet(),
        }
    }

    pub fn is_nucleotide(&self) -> bool {
        matches!(self, MatrixType::Nucleotide)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    table: Box<[i32]>,
}

impl std::fmt::Debug for ScoreMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreMatrix")
            .field("max_abs", &self.max_abs_score())
            .finish()
    }
}

impl ScoreMatrix {
    /// Match when the bytes agree ignoring ASCII case, mismatch otherwise.
    pub fn nucleotide(match_score: i32, mismatch_score: i32) -> Self {
        let mut table = vec![mismatch_score; DIM * DIM].into_boxed_slice();
        for a in 0..DIM {
            let ua = (a as u8).to_ascii_uppercase();
            for b in 0..DIM {
                if ua == (b as u8).to_ascii_uppercase() {
                    table[a * DIM + b] = match_score;
                }
            }
        }
        Self { table }
    }

    pub fn from_packed(packed: &PackedScoreMatrix) -> NwResult<Self> {
        packed.validate()?;
        let n = packed.symbols.len();
        let mut table = vec![packed.default_score as i32; DIM * DIM].into_boxed_slice();
        for (ri, &ra) in packed.symbols.iter().enumerate() {
            for (ci, &cb) in packed.symbols.iter().enumerate() {
                let v = packed.scores[ri * n + ci] as i32;
                for a in [ra.to_ascii_uppercase(), ra.to_ascii_lowercase()] {
                    for b in [cb.to_ascii_uppercase(), cb.to_ascii_lowercase()] {
                        table[a as usize * DIM + b as usize] = v;
                    }
                }
            }
        }
        Ok(Self { table })
    }

    pub fn for_type(matrix: &MatrixType, match_score: i32, mismatch_score: i32) -> NwResult<Self> {
        match matrix {
            MatrixType::Nucleotide => Ok(Self::nucleotide(match_score, mismatch_score)),
            MatrixType::Blosum62 => Self::from_packed(&PackedScoreMatrix::blosum62()),
            MatrixType::Packed(p) => Self::from_packed(p),
        }
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.table[(a as usize) * DIM + (b as usize)]
    }

    pub fn max_abs_score(&self) -> i32 {
        self.table.iter().map(|v| v.abs()).max().unwrap_or(0)
    }
}

const BLOSUM62_SYMBOLS: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZX*";

#[rustfmt::skip]
const BLOSUM62: [i8; 24 * 24] = [
//   A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];
