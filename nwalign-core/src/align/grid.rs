//! Alignment graph shared by the quadratic and linear-space aligners.
//!
//! Rows follow the row sequence and columns the column sequence. A node
//! `(i, j, s)` has consumed `i` row residues and `j` column residues, and
//! `s` is the kind of step that entered it. Edge weights depend only on
//! absolute coordinates, so any sub-rectangle scores exactly like the whole.
//!
//! Without transposition rows are sequence 1 and columns sequence 2, so a
//! horizontal step is an Insert and a vertical step a Delete.

use super::matrices::ScoreMatrix;
use super::transcript::EditOp;
use super::types::{EndSpaceFree, ScoringPolicy};

/// DP values. Wide enough that sums of NEG_INF never wrap.
pub(crate) type Dp = i64;
pub(crate) const NEG_INF: Dp = i64::MIN / 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum State {
    Diag = 0,
    Horiz = 1,
    Vert = 2,
}

impl State {
    #[inline]
    pub(crate) fn from_bits(bits: u8) -> State {
        match bits & 0b11 {
            0 => State::Diag,
            1 => State::Horiz,
            _ => State::Vert,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub i: usize,
    pub j: usize,
    pub state: State,
}

/// Sub-problem over rows `i1..=i2` and columns `j1..=j2`. Row `i1` is
/// supplied as a boundary, never recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub i1: usize,
    pub j1: usize,
    pub i2: usize,
    pub j2: usize,
}

impl Rect {
    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.i2 - self.i1
    }

    #[inline]
    pub(crate) fn width(&self) -> usize {
        self.j2 - self.j1 + 1
    }
}

/// How a path must terminate at `(i2, j2)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum End {
    /// Whichever state scores best, ties broken by the grid order.
    Free,
    At(State),
}

/// Per-state values along one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Row {
    pub g: Vec<Dp>,
    pub e: Vec<Dp>,
    pub f: Vec<Dp>,
}

impl Row {
    pub(crate) fn unreachable(width: usize) -> Self {
        Self {
            g: vec![NEG_INF; width],
            e: vec![NEG_INF; width],
            f: vec![NEG_INF; width],
        }
    }

    /// Only the first column reachable, in `state`, with value 0.
    pub(crate) fn single(width: usize, state: State) -> Self {
        let mut row = Self::unreachable(width);
        row.set(state, 0, 0);
        row
    }

    pub(crate) fn width(&self) -> usize {
        self.g.len()
    }

    pub(crate) fn prefix(&self, width: usize) -> Self {
        Self {
            g: self.g[..width].to_vec(),
            e: self.e[..width].to_vec(),
            f: self.f[..width].to_vec(),
        }
    }

    #[inline]
    pub(crate) fn get(&self, state: State, k: usize) -> Dp {
        match state {
            State::Diag => self.g[k],
            State::Horiz => self.e[k],
            State::Vert => self.f[k],
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, state: State, k: usize, v: Dp) {
        match state {
            State::Diag => self.g[k] = v,
            State::Horiz => self.e[k] = v,
            State::Vert => self.f[k] = v,
        }
    }
}

pub(crate) struct Grid<'a> {
    rows: &'a [u8],
    cols: &'a [u8],
    matrix: &'a ScoreMatrix,
    gap_open: Dp,
    gap_extend: Dp,
    free_h_first: bool,
    free_h_last: bool,
    free_v_first: bool,
    free_v_last: bool,
    transposed: bool,
    /// Predecessor priority on equal values, highest first.
    order: [State; 3],
}

impl<'a> Grid<'a> {
    pub(crate) fn new(
        seq1: &'a [u8],
        seq2: &'a [u8],
        matrix: &'a ScoreMatrix,
        policy: &ScoringPolicy,
        esf: EndSpaceFree,
        transpose: bool,
    ) -> Self {
        // Tie-break: diagonal, then Delete, then Insert. Delete is the
        // vertical step unless the grid is transposed.
        let (rows, cols, esf, order) = if transpose {
            (seq2, seq1, esf.swapped(), [State::Diag, State::Horiz, State::Vert])
        } else {
            (seq1, seq2, esf, [State::Diag, State::Vert, State::Horiz])
        };
        Self {
            rows,
            cols,
            matrix,
            gap_open: policy.gap_open as Dp,
            gap_extend: policy.gap_extend as Dp,
            free_h_first: esf.left1,
            free_h_last: esf.right1,
            free_v_first: esf.left2,
            free_v_last: esf.right2,
            transposed: transpose,
            order,
        }
    }

    #[inline]
    pub(crate) fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub(crate) fn n_cols(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    pub(crate) fn order(&self) -> [State; 3] {
        self.order
    }

    /// Weight of the diagonal step into `(i, j)`, `i, j >= 1`.
    #[inline]
    pub(crate) fn sub(&self, i: usize, j: usize) -> Dp {
        let (r, c) = (self.rows[i - 1], self.cols[j - 1]);
        let v = if self.transposed {
            self.matrix.score(c, r)
        } else {
            self.matrix.score(r, c)
        };
        v as Dp
    }

    /// Weight of a horizontal step along row `i` leaving a node in `from`.
    #[inline]
    pub(crate) fn horiz(&self, i: usize, from: State) -> Dp {
        if (i == 0 && self.free_h_first) || (i == self.rows.len() && self.free_h_last) {
            0
        } else if from == State::Horiz {
            self.gap_extend
        } else {
            self.gap_open
        }
    }

    /// Weight of a vertical step down column `j` leaving a node in `from`.
    #[inline]
    pub(crate) fn vert(&self, j: usize, from: State) -> Dp {
        if (j == 0 && self.free_v_first) || (j == self.cols.len() && self.free_v_last) {
            0
        } else if from == State::Vert {
            self.gap_extend
        } else {
            self.gap_open
        }
    }

    /// Best `(value, state)` over the three states, earlier in `order` on ties.
    #[inline]
    pub(crate) fn best(&self, mut value: impl FnMut(State) -> Dp) -> (Dp, State) {
        let mut best = NEG_INF;
        let mut arg = self.order[0];
        let mut first = true;
        for s in self.order {
            let v = value(s);
            if first || v > best {
                best = v;
                arg = s;
                first = false;
            }
        }
        (best, arg)
    }

    /// Row 0 over columns `0..=j2`, starting from `(0, 0)` in the diagonal state.
    pub(crate) fn origin_row(&self, j2: usize) -> Row {
        let mut row = Row::unreachable(j2 + 1);
        row.g[0] = 0;
        for k in 1..=j2 {
            let (v, _) = self.best(|s| row.get(s, k - 1) + self.horiz(0, s));
            row.e[k] = v;
        }
        row
    }

    /// Transcript symbol for the step entering `(i, j)` in `state`.
    #[inline]
    pub(crate) fn op(&self, state: State, i: usize, j: usize) -> EditOp {
        match state {
            State::Diag => {
                if self.rows[i - 1].eq_ignore_ascii_case(&self.cols[j - 1]) {
                    EditOp::Match
                } else {
                    EditOp::Replace
                }
            }
            State::Horiz if self.transposed => EditOp::Delete,
            State::Horiz => EditOp::Insert,
            State::Vert if self.transposed => EditOp::Insert,
            State::Vert => EditOp::Delete,
        }
    }
}
