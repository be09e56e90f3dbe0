use crate::error::{NwError, NwResult};

/// Alignment score as reported to callers.
pub type Score = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Full Needleman-Wunsch matrix with a one-byte-per-cell trace.
    Quadratic,
    /// Myers-Miller divide and conquer over linear-size score rows.
    LinearSpace,
}

/// CIGAR operations, sequence 1 taken as the reference.
/// Ins consumes sequence 2 (gap in sequence 1), Del consumes sequence 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CigarOp {
    /// Consumes both sequences.
    Match,
    Ins,
    Del,
}

impl CigarOp {
    pub fn as_char(self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Ins => 'I',
            CigarOp::Del => 'D',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Cigar {
    pub ops: Vec<(CigarOp, usize)>,
}

impl Cigar {
    pub fn push(&mut self, op: CigarOp, len: usize) {
        if len == 0 {
            return;
        }
        if let Some((last_op, last_len)) = self.ops.last_mut() {
            if *last_op == op {
                *last_len += len;
                return;
            }
        }
        self.ops.push((op, len));
    }

    pub fn len(&self) -> usize {
        self.ops.iter().map(|(_, n)| *n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl std::fmt::Display for Cigar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (op, len) in &self.ops {
            write!(f, "{}{}", len, op.as_char())?;
        }
        Ok(())
    }
}

/// Match/mismatch bonus and affine gap penalties.
///
/// A gap of length `L` scores `gap_open + (L - 1) * gap_extend`.
/// `match_score` and `mismatch_score` only drive nucleotide tables; protein
/// tables come from a substitution matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoringPolicy {
    pub match_score: i32,
    pub mismatch_score: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::nucleotide()
    }
}

impl ScoringPolicy {
    pub fn new(match_score: i32, mismatch_score: i32, gap_open: i32, gap_extend: i32) -> Self {
        Self {
            match_score,
            mismatch_score,
            gap_open,
            gap_extend,
        }
    }

    pub fn nucleotide() -> Self {
        Self::new(1, -3, -5, -2)
    }

    /// Gap penalties commonly paired with BLOSUM62.
    pub fn protein() -> Self {
        Self::new(1, -3, -11, -1)
    }

    pub fn validate(&self) -> NwResult<()> {
        if self.gap_open > 0 {
            return Err(NwError::bad_parameter(format!(
                "gap_open must be <= 0 (got {})",
                self.gap_open
            )));
        }
        if self.gap_extend > 0 {
            return Err(NwError::bad_parameter(format!(
                "gap_extend must be <= 0 (got {})",
                self.gap_extend
            )));
        }
        Ok(())
    }
}

/// End gaps that are not penalised.
///
/// `left1`/`right1` free leading/trailing gaps placed in sequence 1
/// (Insert runs), `left2`/`right2` the same for sequence 2 (Delete runs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct EndSpaceFree {
    pub left1: bool,
    pub right1: bool,
    pub left2: bool,
    pub right2: bool,
}

impl EndSpaceFree {
    pub fn new(left1: bool, right1: bool, left2: bool, right2: bool) -> Self {
        Self {
            left1,
            right1,
            left2,
            right2,
        }
    }

    pub fn all() -> Self {
        Self::new(true, true, true, true)
    }

    /// Same flags with the roles of the two sequences exchanged.
    pub fn swapped(self) -> Self {
        Self::new(self.left2, self.right2, self.left1, self.right1)
    }
}

/// Default ceiling on quadratic DP cells (one trace byte each).
pub const DEFAULT_MAX_CELLS: usize = 1 << 30;

/// Default rectangle area solved directly by the linear-space aligner.
pub const DEFAULT_BASE_CASE_CELLS: usize = 4096;

/// Default residues per line in formatted output.
pub const DEFAULT_LINE_WIDTH: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignOptions {
    pub max_cells: usize,
    pub base_case_cells: usize,
    pub parallel: bool,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            max_cells: DEFAULT_MAX_CELLS,
            base_case_cells: DEFAULT_BASE_CASE_CELLS,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl AlignOptions {
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn with_base_case_cells(mut self, cells: usize) -> Self {
        self.base_case_cells = cells;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> NwResult<()> {
        if self.max_cells == 0 {
            return Err(NwError::bad_parameter("max_cells must be positive"));
        }
        if self.base_case_cells == 0 {
            return Err(NwError::bad_parameter("base_case_cells must be positive"));
        }
        // The linear-space base case allocates a full trace block.
        if self.base_case_cells > self.max_cells {
            return Err(NwError::bad_parameter(format!(
                "base_case_cells ({}) exceeds max_cells ({})",
                self.base_case_cells, self.max_cells
            )));
        }
        Ok(())
    }
}
