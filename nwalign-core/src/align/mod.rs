pub mod format;
mod grid;
mod linear;
pub mod matrices;
mod quadratic;
pub mod transcript;
pub mod types;

pub use format::{format_alignment, FormatType};
pub use matrices::{MatrixType, PackedScoreMatrix, ScoreMatrix};
pub use transcript::{EditOp, Transcript, TranscriptStats};
pub use types::{
    AlignOptions, Cigar, CigarOp, EndSpaceFree, Score, ScoringPolicy, Strategy,
    DEFAULT_BASE_CASE_CELLS, DEFAULT_LINE_WIDTH, DEFAULT_MAX_CELLS,
};

use log::debug;

use crate::error::{NwError, NwResult};
use crate::seq::{GappedSeq, Sequence};
use grid::{Dp, Grid};

#[cfg(test)]
mod tests;

/// Score and transcript of one completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub score: Score,
    pub transcript: Transcript,
}

/// Global aligner over two borrowed sequences.
///
/// Configure, then `run()`. Changing any input clears the previous result.
#[derive(Clone, Debug)]
pub struct Aligner<'a> {
    seq1: Sequence<'a>,
    seq2: Sequence<'a>,
    matrix_type: MatrixType,
    matrix: ScoreMatrix,
    policy: ScoringPolicy,
    end_space_free: EndSpaceFree,
    options: AlignOptions,
    strategy: Strategy,
    result: Option<Alignment>,
}

impl<'a> Aligner<'a> {
    /// Validates both sequences against the alphabet implied by `matrix`.
    /// Gap penalties default to `ScoringPolicy::nucleotide()` or `protein()`.
    pub fn new(
        seq1: &'a [u8],
        seq2: &'a [u8],
        matrix: MatrixType,
        strategy: Strategy,
    ) -> NwResult<Self> {
        let policy = if matrix.is_nucleotide() {
            ScoringPolicy::nucleotide()
        } else {
            ScoringPolicy::protein()
        };
        let table = ScoreMatrix::for_type(&matrix, policy.match_score, policy.mismatch_score)?;
        let (seq1, seq2) = validate_pair(seq1, seq2, &matrix)?;
        Ok(Self {
            seq1,
            seq2,
            matrix_type: matrix,
            matrix: table,
            policy,
            end_space_free: EndSpaceFree::default(),
            options: AlignOptions::default(),
            strategy,
            result: None,
        })
    }

    /// Quadratic-space Needleman-Wunsch.
    pub fn nw(seq1: &'a [u8], seq2: &'a [u8], matrix: MatrixType) -> NwResult<Self> {
        Self::new(seq1, seq2, matrix, Strategy::Quadratic)
    }

    /// Linear-space Myers-Miller.
    pub fn mm(seq1: &'a [u8], seq2: &'a [u8], matrix: MatrixType) -> NwResult<Self> {
        Self::new(seq1, seq2, matrix, Strategy::LinearSpace)
    }

    pub fn seq1(&self) -> &'a [u8] {
        self.seq1.as_bytes()
    }

    pub fn seq2(&self) -> &'a [u8] {
        self.seq2.as_bytes()
    }

    pub fn matrix_type(&self) -> &MatrixType {
        &self.matrix_type
    }

    pub fn matrix(&self) -> &ScoreMatrix {
        &self.matrix
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn end_space_free(&self) -> EndSpaceFree {
        self.end_space_free
    }

    pub fn options(&self) -> &AlignOptions {
        &self.options
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Replace both sequences, revalidating them. On error the aligner keeps
    /// its previous sequences but loses any result.
    pub fn set_sequences(&mut self, seq1: &'a [u8], seq2: &'a [u8]) -> NwResult<()> {
        self.result = None;
        let (seq1, seq2) = validate_pair(seq1, seq2, &self.matrix_type)?;
        self.seq1 = seq1;
        self.seq2 = seq2;
        Ok(())
    }

    /// Rebuilds the nucleotide table. Protein tables ignore this value.
    pub fn set_match_score(&mut self, score: i32) {
        self.policy.match_score = score;
        self.rebuild_nucleotide();
    }

    /// Rebuilds the nucleotide table. Protein tables ignore this value.
    pub fn set_mismatch_score(&mut self, score: i32) {
        self.policy.mismatch_score = score;
        self.rebuild_nucleotide();
    }

    pub fn set_gap_open(&mut self, score: i32) {
        self.policy.gap_open = score;
        self.result = None;
    }

    pub fn set_gap_extend(&mut self, score: i32) {
        self.policy.gap_extend = score;
        self.result = None;
    }

    /// Replace all four scoring parameters at once.
    pub fn set_policy(&mut self, policy: ScoringPolicy) {
        self.policy = policy;
        self.rebuild_nucleotide();
    }

    pub fn set_end_space_free(&mut self, esf: EndSpaceFree) {
        self.end_space_free = esf;
        self.result = None;
    }

    pub fn set_options(&mut self, options: AlignOptions) {
        self.options = options;
        self.result = None;
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
        self.result = None;
    }

    fn rebuild_nucleotide(&mut self) {
        self.result = None;
        if self.matrix_type.is_nucleotide() {
            let p = &self.policy;
            self.matrix = ScoreMatrix::nucleotide(p.match_score, p.mismatch_score);
        }
    }

    /// Align and return the optimal score. Running again with unchanged
    /// inputs reproduces the same result.
    pub fn run(&mut self) -> NwResult<Score> {
        self.result = None;
        self.policy.validate()?;
        self.options.validate()?;

        let (s1, s2) = (self.seq1.as_bytes(), self.seq2.as_bytes());
        let (ops, raw) = if s1.is_empty() || s2.is_empty() {
            self.align_degenerate()?
        } else {
            match self.strategy {
                Strategy::Quadratic => {
                    let grid = Grid::new(
                        s1,
                        s2,
                        &self.matrix,
                        &self.policy,
                        self.end_space_free,
                        false,
                    );
                    quadratic::align(&grid, self.options.max_cells)?
                }
                Strategy::LinearSpace => {
                    // Sweep rows of the longer sequence so score rows span the shorter.
                    let transpose = s2.len() > s1.len();
                    let grid = Grid::new(
                        s1,
                        s2,
                        &self.matrix,
                        &self.policy,
                        self.end_space_free,
                        transpose,
                    );
                    linear::align(&grid, &self.options)
                }
            }
        };
        let score = Score::try_from(raw).map_err(|_| NwError::ScoreOverflow { score: raw })?;
        debug!(
            "{:?} alignment of {}x{}: score {}, {} columns",
            self.strategy,
            s1.len(),
            s2.len(),
            score,
            ops.len()
        );
        self.result = Some(Alignment {
            score,
            transcript: Transcript::new(ops),
        });
        Ok(score)
    }

    /// One side empty: the whole other sequence is a single gap.
    fn align_degenerate(&self) -> NwResult<(Vec<EditOp>, Dp)> {
        let (s1, s2) = (self.seq1.as_bytes(), self.seq2.as_bytes());
        let op = if s1.is_empty() {
            EditOp::Insert
        } else {
            EditOp::Delete
        };
        let transcript = Transcript::new(vec![op; s1.len().max(s2.len())]);
        let score = transcript.score(s1, s2, &self.matrix, &self.policy, self.end_space_free)?;
        Ok((transcript.into_ops(), Dp::from(score)))
    }

    fn result(&self) -> NwResult<&Alignment> {
        self.result.as_ref().ok_or(NwError::NotRun)
    }

    pub fn score(&self) -> NwResult<Score> {
        Ok(self.result()?.score)
    }

    pub fn transcript(&self) -> NwResult<&Transcript> {
        Ok(&self.result()?.transcript)
    }

    /// One character per column: `M`, `R`, `I` or `D`.
    pub fn transcript_string(&self) -> NwResult<String> {
        Ok(self.transcript()?.to_string())
    }

    pub fn cigar(&self) -> NwResult<Cigar> {
        Ok(self.transcript()?.to_cigar())
    }

    pub fn gapped_sequences(&self) -> NwResult<(GappedSeq, GappedSeq)> {
        self.transcript()?.apply(self.seq1.as_bytes(), self.seq2.as_bytes())
    }

    pub fn format(&self, kind: FormatType, line_width: usize) -> NwResult<String> {
        let (row1, row2) = self.gapped_sequences()?;
        format_alignment(&row1, &row2, kind, line_width)
    }

    /// Take the result of the last run.
    pub fn into_alignment(self) -> NwResult<Alignment> {
        self.result.ok_or(NwError::NotRun)
    }
}

fn validate_pair<'a>(
    seq1: &'a [u8],
    seq2: &'a [u8],
    matrix: &MatrixType,
) -> NwResult<(Sequence<'a>, Sequence<'a>)> {
    let alphabet = matrix.alphabet();
    let kind = matrix.kind();
    Ok((
        Sequence::new(seq1, kind, &alphabet, 1)?,
        Sequence::new(seq2, kind, &alphabet, 2)?,
    ))
}

/// Align independent pairs, in parallel with the `parallel` feature.
///
/// Each pair runs on its own aligner with sequential sweeps, so the batch is
/// the unit of parallelism.
pub fn align_pairs(
    pairs: &[(&[u8], &[u8])],
    matrix: MatrixType,
    strategy: Strategy,
    policy: &ScoringPolicy,
) -> Vec<NwResult<Alignment>> {
    let matrix = &matrix;
    par_map!(pairs, |&(seq1, seq2): &(&[u8], &[u8])| -> NwResult<Alignment> {
        let mut aligner = Aligner::new(seq1, seq2, matrix.clone(), strategy)?;
        aligner.set_policy(*policy);
        aligner.set_options(AlignOptions::default().with_parallel(false));
        aligner.run()?;
        aligner.into_alignment()
    })
}
