//! Full-matrix Needleman-Wunsch with affine gaps.
//!
//! The block kernel here is also the base case of the linear-space aligner,
//! which is what keeps the two strategies' transcripts identical.

use log::warn;

use super::grid::{Dp, End, Grid, Node, Rect, Row, State, NEG_INF};
use super::transcript::EditOp;
use crate::error::{NwError, NwResult};

// One byte per cell. Bits 0-1: predecessor state of G (diagonal),
// bits 2-3: of E (horizontal), bits 4-5: of F (vertical).
const SHIFT_G: u8 = 0;
const SHIFT_E: u8 = 2;
const SHIFT_F: u8 = 4;

/// Path through a sub-rectangle, from its boundary row to its end node.
#[derive(Debug)]
pub(crate) struct Segment {
    pub ops: Vec<EditOp>,
    /// Where the path leaves the boundary row.
    pub exit: Node,
    /// Boundary value at `exit` plus the path weight.
    pub score: Dp,
}

#[inline]
fn shift(state: State) -> u8 {
    match state {
        State::Diag => SHIFT_G,
        State::Horiz => SHIFT_E,
        State::Vert => SHIFT_F,
    }
}

/// Solve `rect` exactly, keeping a trace byte per cell.
///
/// `top` holds the fixed values of row `rect.i1`; `rect.height()` must be
/// at least one. Ties are broken by `grid.order()` both when relaxing and
/// when choosing the final state.
pub(crate) fn solve_block(grid: &Grid<'_>, rect: Rect, top: &Row, end: End) -> Segment {
    let w = rect.width();
    let h = rect.height();
    debug_assert!(h >= 1);
    debug_assert_eq!(top.width(), w);

    let mut trace = vec![0u8; h * w];
    let mut prev = top.clone();
    let mut cur = Row::unreachable(w);

    for di in 1..=h {
        let i = rect.i1 + di;
        let base = (di - 1) * w;
        for k in 0..w {
            let j = rect.j1 + k;
            let (g, g_from) = if k > 0 {
                let (v, s) = grid.best(|s| prev.get(s, k - 1));
                (v + grid.sub(i, j), s)
            } else {
                (NEG_INF, State::Diag)
            };
            // Gaps open from any state, so Insert may follow Delete directly.
            let (e, e_from) = if k > 0 {
                grid.best(|s| cur.get(s, k - 1) + grid.horiz(i, s))
            } else {
                (NEG_INF, State::Diag)
            };
            let (f, f_from) = grid.best(|s| prev.get(s, k) + grid.vert(j, s));
            cur.g[k] = g;
            cur.e[k] = e;
            cur.f[k] = f;
            trace[base + k] = ((g_from as u8) << SHIFT_G)
                | ((e_from as u8) << SHIFT_E)
                | ((f_from as u8) << SHIFT_F);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let (score, mut state) = match end {
        End::At(s) => (prev.get(s, w - 1), s),
        End::Free => grid.best(|s| prev.get(s, w - 1)),
    };

    let mut ops = Vec::with_capacity(h + w);
    let mut i = rect.i2;
    let mut k = w - 1;
    while i > rect.i1 {
        let t = trace[(i - rect.i1 - 1) * w + k];
        let from = State::from_bits(t >> shift(state));
        ops.push(grid.op(state, i, rect.j1 + k));
        match state {
            State::Diag => {
                i -= 1;
                k -= 1;
            }
            State::Horiz => k -= 1,
            State::Vert => i -= 1,
        }
        state = from;
    }
    ops.reverse();

    Segment {
        ops,
        exit: Node {
            i: rect.i1,
            j: rect.j1 + k,
            state,
        },
        score,
    }
}

/// Refuse a full matrix that would exceed `max_cells`.
pub(crate) fn check_memory_limit(n: usize, m: usize, max_cells: usize) -> NwResult<()> {
    let cells = n as u128 * m as u128;
    if cells > max_cells as u128 {
        warn!(
            "quadratic alignment of {}x{} needs {} cells, limit is {}",
            n, m, cells, max_cells
        );
        return Err(NwError::ResourceLimit {
            cells,
            limit: max_cells,
        });
    }
    Ok(())
}

/// Row-0 moves before the path's first exit: horizontal steps from `(0, 0)`.
pub(crate) fn leading_ops(grid: &Grid<'_>, exit: Node) -> Vec<EditOp> {
    (1..=exit.j).map(|j| grid.op(State::Horiz, 0, j)).collect()
}

/// Whole-grid alignment. Both sequences must be non-empty.
pub(crate) fn align(grid: &Grid<'_>, max_cells: usize) -> NwResult<(Vec<EditOp>, Dp)> {
    let (n, m) = (grid.n_rows(), grid.n_cols());
    check_memory_limit(n, m, max_cells)?;
    let rect = Rect {
        i1: 0,
        j1: 0,
        i2: n,
        j2: m,
    };
    let top = grid.origin_row(m);
    let seg = solve_block(grid, rect, &top, End::Free);
    let mut ops = leading_ops(grid, seg.exit);
    ops.extend(seg.ops);
    Ok((ops, seg.score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::matrices::ScoreMatrix;
    use crate::align::types::{EndSpaceFree, ScoringPolicy};

    fn run(a: &[u8], b: &[u8], esf: EndSpaceFree) -> (String, Dp) {
        let matrix = ScoreMatrix::nucleotide(1, -3);
        let policy = ScoringPolicy::default();
        let grid = Grid::new(a, b, &matrix, &policy, esf, false);
        let (ops, score) = align(&grid, usize::MAX).unwrap();
        (ops.iter().map(|op| op.as_char()).collect(), score)
    }

    #[test]
    fn single_deletion() {
        assert_eq!(run(b"AGCT", b"AGT", EndSpaceFree::default()), ("MMDM".into(), -2));
    }

    #[test]
    fn identical_sequences() {
        let (t, s) = run(b"ACGTACGT", b"ACGTACGT", EndSpaceFree::default());
        assert_eq!(t, "MMMMMMMM");
        assert_eq!(s, 8);
    }

    #[test]
    fn leading_gap_runs_along_row_zero() {
        // Free leading gap in sequence 1: the three extra residues of
        // sequence 2 are skipped before the first match.
        let esf = EndSpaceFree::new(true, false, false, false);
        let (t, s) = run(b"ACGT", b"TTTACGT", esf);
        assert_eq!(t, "IIIMMMM");
        assert_eq!(s, 4);
    }

    #[test]
    fn trailing_free_gap_costs_nothing() {
        let esf = EndSpaceFree::new(false, false, false, true);
        let (t, s) = run(b"ACGTAAA", b"ACGT", esf);
        assert_eq!(t, "MMMMDDD");
        assert_eq!(s, 4);
    }

    #[test]
    fn memory_limit_is_enforced() {
        let err = check_memory_limit(1000, 1000, 999_999).unwrap_err();
        assert_eq!(
            err,
            NwError::ResourceLimit {
                cells: 1_000_000,
                limit: 999_999
            }
        );
        assert!(check_memory_limit(1000, 1000, 1_000_000).is_ok());
    }

    #[test]
    fn block_with_fixed_end_state() {
        let matrix = ScoreMatrix::nucleotide(1, -3);
        let policy = ScoringPolicy::default();
        let grid = Grid::new(b"AC", b"AC", &matrix, &policy, EndSpaceFree::default(), false);
        let rect = Rect {
            i1: 0,
            j1: 0,
            i2: 2,
            j2: 2,
        };
        let top = grid.origin_row(2);
        // forced to end on a vertical step into (2, 2)
        let seg = solve_block(&grid, rect, &top, End::At(State::Vert));
        assert_eq!(*seg.ops.last().unwrap(), EditOp::Delete);
        let free = solve_block(&grid, rect, &top, End::Free);
        assert_eq!(free.score, 2);
        assert!(seg.score < free.score);
    }
}
