//! Edit transcripts: one symbol per alignment column.

use std::fmt;
use std::str::FromStr;

use super::matrices::ScoreMatrix;
use super::types::{Cigar, CigarOp, EndSpaceFree, Score, ScoringPolicy};
use crate::error::{NwError, NwResult};
use crate::seq::{GappedSeq, GAP};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditOp {
    /// Identical residues (case-insensitive).
    Match,
    /// Differing residues.
    Replace,
    /// Consumes sequence 2 only, a gap in sequence 1.
    Insert,
    /// Consumes sequence 1 only, a gap in sequence 2.
    Delete,
}

impl EditOp {
    pub fn as_char(self) -> char {
        match self {
            EditOp::Match => 'M',
            EditOp::Replace => 'R',
            EditOp::Insert => 'I',
            EditOp::Delete => 'D',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'M' => Some(EditOp::Match),
            'R' => Some(EditOp::Replace),
            'I' => Some(EditOp::Insert),
            'D' => Some(EditOp::Delete),
            _ => None,
        }
    }

    #[inline]
    pub fn consumes_seq1(self) -> bool {
        !matches!(self, EditOp::Insert)
    }

    #[inline]
    pub fn consumes_seq2(self) -> bool {
        !matches!(self, EditOp::Delete)
    }

    #[inline]
    pub fn is_gap(self) -> bool {
        matches!(self, EditOp::Insert | EditOp::Delete)
    }
}

/// Column counts of a transcript.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TranscriptStats {
    pub matches: usize,
    pub mismatches: usize,
    pub inserts: usize,
    pub deletes: usize,
    /// Maximal runs of Insert or of Delete.
    pub gap_opens: usize,
    /// `matches / columns`, 0 for an empty transcript.
    pub identity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Transcript {
    ops: Vec<EditOp>,
}

impl Transcript {
    pub fn new(ops: Vec<EditOp>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<EditOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Residues consumed from sequence 1 and sequence 2.
    pub fn consumed(&self) -> (usize, usize) {
        self.ops.iter().fold((0, 0), |(a, b), op| {
            (a + op.consumes_seq1() as usize, b + op.consumes_seq2() as usize)
        })
    }

    /// CIGAR with sequence 1 as the reference. Match and Replace both map to M.
    pub fn to_cigar(&self) -> Cigar {
        let mut cigar = Cigar::default();
        for op in &self.ops {
            let c = match op {
                EditOp::Match | EditOp::Replace => CigarOp::Match,
                EditOp::Insert => CigarOp::Ins,
                EditOp::Delete => CigarOp::Del,
            };
            cigar.push(c, 1);
        }
        cigar
    }

    pub fn stats(&self) -> TranscriptStats {
        let mut st = TranscriptStats::default();
        let mut prev: Option<EditOp> = None;
        for &op in &self.ops {
            match op {
                EditOp::Match => st.matches += 1,
                EditOp::Replace => st.mismatches += 1,
                EditOp::Insert => st.inserts += 1,
                EditOp::Delete => st.deletes += 1,
            }
            if op.is_gap() && prev != Some(op) {
                st.gap_opens += 1;
            }
            prev = Some(op);
        }
        if !self.ops.is_empty() {
            st.identity = st.matches as f64 / self.ops.len() as f64;
        }
        st
    }

    /// Fraction of columns that are matches.
    pub fn identity(&self) -> f64 {
        self.stats().identity
    }

    /// Walk the transcript over both sequences, checking lengths and labels.
    /// `visit` sees each op with the residue indices consumed so far.
    fn walk(
        &self,
        seq1: &[u8],
        seq2: &[u8],
        mut visit: impl FnMut(EditOp, usize, usize),
    ) -> NwResult<()> {
        let (c1, c2) = self.consumed();
        if c1 != seq1.len() || c2 != seq2.len() {
            return Err(NwError::TranscriptMismatch {
                msg: format!(
                    "transcript consumes {}/{} residues, sequences have {}/{}",
                    c1,
                    c2,
                    seq1.len(),
                    seq2.len()
                ),
            });
        }
        let (mut i, mut j) = (0usize, 0usize);
        for (pos, &op) in self.ops.iter().enumerate() {
            if matches!(op, EditOp::Match | EditOp::Replace) {
                let same = seq1[i].eq_ignore_ascii_case(&seq2[j]);
                if same != (op == EditOp::Match) {
                    return Err(NwError::TranscriptMismatch {
                        msg: format!(
                            "'{}' at column {} pairs '{}' with '{}'",
                            op.as_char(),
                            pos,
                            seq1[i] as char,
                            seq2[j] as char
                        ),
                    });
                }
            }
            visit(op, i, j);
            i += op.consumes_seq1() as usize;
            j += op.consumes_seq2() as usize;
        }
        Ok(())
    }

    /// Both sequences with gap characters inserted per the transcript.
    pub fn apply(&self, seq1: &[u8], seq2: &[u8]) -> NwResult<(GappedSeq, GappedSeq)> {
        let mut row1 = Vec::with_capacity(self.ops.len());
        let mut row2 = Vec::with_capacity(self.ops.len());
        self.walk(seq1, seq2, |op, i, j| {
            row1.push(if op.consumes_seq1() { seq1[i] } else { GAP });
            row2.push(if op.consumes_seq2() { seq2[j] } else { GAP });
        })?;
        Ok((
            GappedSeq::from_bytes_unchecked(row1),
            GappedSeq::from_bytes_unchecked(row2),
        ))
    }

    /// Score of this transcript under the given scoring, independent of any
    /// aligner. A gap run at the start or end of a sequence is free when the
    /// matching end-space flag is set.
    pub fn score(
        &self,
        seq1: &[u8],
        seq2: &[u8],
        matrix: &ScoreMatrix,
        policy: &ScoringPolicy,
        esf: EndSpaceFree,
    ) -> NwResult<Score> {
        let (n, m) = (seq1.len(), seq2.len());
        let mut total: i64 = 0;
        let mut prev: Option<EditOp> = None;
        self.walk(seq1, seq2, |op, i, j| {
            total += match op {
                EditOp::Match | EditOp::Replace => matrix.score(seq1[i], seq2[j]) as i64,
                // Insert runs stay at one seq1 position, Delete runs at one seq2 position.
                EditOp::Insert if (i == 0 && esf.left1) || (i == n && esf.right1) => 0,
                EditOp::Delete if (j == 0 && esf.left2) || (j == m && esf.right2) => 0,
                _ if prev == Some(op) => policy.gap_extend as i64,
                _ => policy.gap_open as i64,
            };
            prev = Some(op);
        })?;
        Score::try_from(total).map_err(|_| NwError::ScoreOverflow { score: total })
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{}", op.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Transcript {
    type Err = NwError;

    fn from_str(s: &str) -> NwResult<Self> {
        s.chars()
            .enumerate()
            .map(|(pos, ch)| EditOp::from_char(ch).ok_or(NwError::InvalidTranscript { ch, pos }))
            .collect::<NwResult<Vec<_>>>()
            .map(Transcript::new)
    }
}
