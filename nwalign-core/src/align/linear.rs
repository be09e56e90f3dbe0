//! Myers-Miller divide and conquer in linear space.
//!
//! Each level runs a forward sweep to the middle row and a backward sweep
//! from the end node up to the row below it, then splits at the node where
//! the optimal path leaves the middle row. When that node is unique both
//! halves are independent. When several nodes tie, the lower half is solved
//! first from the full middle row and reports which node the path used.
//! Either way the result equals the quadratic backtrace.

use log::trace;

use super::grid::{Dp, End, Grid, Node, Rect, Row, State, NEG_INF};
use super::quadratic::{self, Segment};
use super::transcript::EditOp;
use super::types::AlignOptions;

/// Forward values at row `rect.i2`, starting from `top` at row `rect.i1`.
fn forward(grid: &Grid<'_>, rect: Rect, top: &Row) -> Row {
    let w = rect.width();
    let mut prev = top.clone();
    let mut cur = Row::unreachable(w);
    for i in rect.i1 + 1..=rect.i2 {
        for k in 0..w {
            let j = rect.j1 + k;
            cur.g[k] = if k > 0 {
                grid.best(|s| prev.get(s, k - 1)).0 + grid.sub(i, j)
            } else {
                NEG_INF
            };
            cur.e[k] = if k > 0 {
                grid.best(|s| cur.get(s, k - 1) + grid.horiz(i, s)).0
            } else {
                NEG_INF
            };
            cur.f[k] = grid.best(|s| prev.get(s, k) + grid.vert(j, s)).0;
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Best continuation from each node of row `rect.i1` to the end node.
///
/// The value of `(i, j, s)` excludes the step that entered it, so the weight
/// of a leaving gap still depends on `s`.
fn backward(grid: &Grid<'_>, rect: Rect, end: End) -> Row {
    let w = rect.width();
    let last = w - 1;
    let mut next = Row::unreachable(w);
    let mut cur = Row::unreachable(w);
    for i in (rect.i1..=rect.i2).rev() {
        for k in (0..w).rev() {
            let j = rect.j1 + k;
            for s in grid.order() {
                let v = if i == rect.i2 && k == last {
                    match end {
                        End::Free => 0,
                        End::At(t) if t == s => 0,
                        End::At(_) => NEG_INF,
                    }
                } else {
                    let mut v = NEG_INF;
                    if k < last {
                        v = v.max(grid.horiz(i, s) + cur.e[k + 1]);
                    }
                    if i < rect.i2 {
                        v = v.max(grid.vert(j, s) + next.f[k]);
                        if k < last {
                            v = v.max(grid.sub(i + 1, j + 1) + next.g[k + 1]);
                        }
                    }
                    v
                };
                cur.set(s, k, v);
            }
        }
        std::mem::swap(&mut next, &mut cur);
    }
    next
}

enum Crossing {
    Unique(Node),
    Ambiguous,
}

/// Locate where optimal paths leave row `mid`. `fwd` covers row `mid`,
/// `bwd` row `mid + 1`, both over the same columns starting at `j1`.
fn crossing(grid: &Grid<'_>, mid: usize, j1: usize, fwd: &Row, bwd: &Row) -> (Dp, Crossing) {
    let w = fwd.width();
    let mut best = NEG_INF;
    let mut count = 0usize;
    let mut node = Node {
        i: mid,
        j: j1,
        state: State::Diag,
    };
    for k in 0..w {
        let j = j1 + k;
        let diag = if k + 1 < w {
            grid.sub(mid + 1, j + 1) + bwd.g[k + 1]
        } else {
            NEG_INF
        };
        for s in grid.order() {
            let down = grid.vert(j, s) + bwd.f[k];
            let total = fwd.get(s, k) + diag.max(down);
            if total > best {
                best = total;
                count = 1;
                node = Node { i: mid, j, state: s };
            } else if total == best {
                count += 1;
            }
        }
    }
    if count == 1 {
        (best, Crossing::Unique(node))
    } else {
        (best, Crossing::Ambiguous)
    }
}

fn solve(grid: &Grid<'_>, rect: Rect, top: &Row, end: End, opts: &AlignOptions) -> Segment {
    let h = rect.height();
    let w = rect.width();
    if h <= 1 || h.saturating_mul(w) <= opts.base_case_cells {
        return quadratic::solve_block(grid, rect, top, end);
    }

    let mid = rect.i1 + h / 2;
    let upper = Rect { i2: mid, ..rect };
    let lower = Rect { i1: mid + 1, ..rect };
    let (fwd, bwd) = par_join!(
        opts.parallel,
        || forward(grid, upper, top),
        || backward(grid, lower, end)
    );
    let (best, split) = crossing(grid, mid, rect.j1, &fwd, &bwd);
    drop(bwd);

    match split {
        Crossing::Unique(node) => {
            drop(fwd);
            trace!(
                "rows {}..{} cols {}..{}: crossing at ({}, {}, {:?})",
                rect.i1,
                rect.i2,
                rect.j1,
                rect.j2,
                node.i,
                node.j,
                node.state
            );
            let top_rect = Rect { i2: mid, j2: node.j, ..rect };
            let bottom_rect = Rect { i1: mid, j1: node.j, ..rect };
            let top_row = top.prefix(node.j - rect.j1 + 1);
            let bottom_row = Row::single(bottom_rect.width(), node.state);
            let (first, second) = par_join!(
                opts.parallel,
                || solve(grid, top_rect, &top_row, End::At(node.state), opts),
                || solve(grid, bottom_rect, &bottom_row, end, opts)
            );
            debug_assert_eq!(second.exit, node);
            join(first, second, best)
        }
        Crossing::Ambiguous => {
            trace!(
                "rows {}..{} cols {}..{}: tied crossings at row {}",
                rect.i1,
                rect.i2,
                rect.j1,
                rect.j2,
                mid
            );
            let bottom_rect = Rect { i1: mid, ..rect };
            let second = solve(grid, bottom_rect, &fwd, end, opts);
            drop(fwd);
            let node = second.exit;
            let top_rect = Rect { i2: mid, j2: node.j, ..rect };
            let top_row = top.prefix(node.j - rect.j1 + 1);
            let first = solve(grid, top_rect, &top_row, End::At(node.state), opts);
            let score = second.score;
            join(first, second, score)
        }
    }
}

fn join(first: Segment, second: Segment, score: Dp) -> Segment {
    let mut ops = first.ops;
    ops.extend(second.ops);
    Segment {
        ops,
        exit: first.exit,
        score,
    }
}

/// Whole-grid alignment. Both sequences must be non-empty.
pub(crate) fn align(grid: &Grid<'_>, opts: &AlignOptions) -> (Vec<EditOp>, Dp) {
    let (n, m) = (grid.n_rows(), grid.n_cols());
    let rect = Rect {
        i1: 0,
        j1: 0,
        i2: n,
        j2: m,
    };
    let top = grid.origin_row(m);
    let seg = solve(grid, rect, &top, End::Free, opts);
    let mut ops = quadratic::leading_ops(grid, seg.exit);
    ops.extend(seg.ops);
    (ops, seg.score)
}
