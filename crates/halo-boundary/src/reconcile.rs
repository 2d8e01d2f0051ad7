//! Keeping the staggered field divergence-free across ghost layers.
//!
//! After a direction's ghosts are filled, the face component normal to
//! that direction is rebuilt from the discrete solenoidal constraint:
//!
//! ```text
//! Σ_e  A_e B_e |_(c + 1_e)  -  A_e B_e |_c  = 0      (every cell c)
//! ```
//!
//! Solving for the outer normal face gives a recurrence that sweeps
//! outward from the domain boundary, one line at a time. Face areas come
//! from the block geometry, so the same code holds in curvilinear grids.

use rayon::prelude::*;

use halo_arena::{unflatten, FaceField, FieldState, ScratchRegion};
use halo_core::{Dir, Index3, Side, VarLayout};
use halo_grid::{BlockGeometry, BoundaryType};

/// Discrete divergence `Σ_e A_e B_e|_(c+1_e) - A_e B_e|_c` of cell `p`.
pub fn divergence(block: &BlockGeometry, vs: &FaceField, p: Index3) -> f64 {
    Dir::active(block.dims())
        .filter_map(|e| Some((e, block.area(e)?, vs.comp(e)?)))
        .map(|(e, a, b)| {
            let q = step(p, e);
            a[q] * b[q] - a[p] * b[p]
        })
        .sum()
}

#[inline]
fn step(p: Index3, d: Dir) -> Index3 {
    let mut q = p;
    q[d.index()] += 1;
    q
}

#[inline]
fn line_point(dir: Dir, across: (Dir, Dir), line: (usize, usize), idx: usize) -> Index3 {
    let mut p = [0; 3];
    p[dir.index()] = idx;
    p[across.0.index()] = line.0;
    p[across.1.index()] = line.1;
    p
}

fn transverse(dir: Dir) -> (Dir, Dir) {
    match dir {
        Dir::X1 => (Dir::X2, Dir::X3),
        Dir::X2 => (Dir::X1, Dir::X3),
        Dir::X3 => (Dir::X1, Dir::X2),
    }
}

/// Whether a side's normal field must be rebuilt.
pub fn needs_reconstruction(bound: BoundaryType) -> bool {
    !matches!(bound, BoundaryType::Periodic | BoundaryType::Internal)
}

/// Rebuild the ghost faces normal to `dir` beyond `side`.
///
/// `sign(e)` scales the tangential contribution of component `e`; it is
/// `1.0` everywhere except across a coordinate pole.
pub(crate) fn reconstruct_side(
    block: &BlockGeometry,
    vs: &mut FaceField,
    scratch: &mut ScratchRegion,
    dir: Dir,
    side: Side,
    sign: impl Fn(Dir) -> f64 + Sync + Send,
) {
    let ax = block.axis(dir);
    let ghosts = ax.ghosts;
    if ghosts == 0 {
        return;
    }
    let across = transverse(dir);
    let cells = block.shape();
    let n_a = cells[across.0.index()];
    let lines = n_a * cells[across.1.index()];
    let (beg, end, total) = (ax.beg(), ax.end(), ax.total);

    let buf = scratch.slab(lines * ghosts);
    {
        let vs: &FaceField = vs;
        let (Some(a_d), Some(b_d)) = (block.area(dir), vs.comp(dir)) else {
            return;
        };
        let tangential: Vec<_> = Dir::active(block.dims())
            .filter(|&e| e != dir)
            .filter_map(|e| Some((block.area(e)?, vs.comp(e)?, sign(e), e)))
            .collect();
        let flux = |p: Index3| -> f64 {
            tangential
                .iter()
                .map(|&(a, b, s, e)| {
                    let q = step(p, e);
                    s * (a[q] * b[q] - a[p] * b[p])
                })
                .sum()
        };

        buf.par_chunks_mut(ghosts)
            .enumerate()
            .for_each(|(l, out)| {
                let line = (l % n_a, l / n_a);
                let at = |idx| line_point(dir, across, line, idx);
                match side {
                    Side::Left => {
                        let mut outer = a_d[at(beg)] * b_d[at(beg)];
                        for idx in (0..beg).rev() {
                            let p = at(idx);
                            outer += flux(p);
                            let value = outer / a_d[p];
                            out[idx] = value;
                            outer = a_d[p] * value;
                        }
                    }
                    Side::Right => {
                        let mut inner = a_d[at(end)] * b_d[at(end)];
                        for idx in end..total {
                            let p = at(idx);
                            let q = at(idx + 1);
                            inner -= flux(p);
                            let value = inner / a_d[q];
                            out[idx - end] = value;
                            inner = a_d[q] * value;
                        }
                    }
                }
            });
    }

    let Some(b_d) = vs.comp_mut(dir) else {
        return;
    };
    for (l, values) in buf.chunks(ghosts).enumerate() {
        let line = (l % n_a, l / n_a);
        for (g, &value) in values.iter().enumerate() {
            let face = match side {
                Side::Left => g,
                Side::Right => end + g + 1,
            };
            b_d[line_point(dir, across, line, face)] = value;
        }
    }
}

/// Rebuild the ghost faces normal to `dir` on every side that needs it.
pub fn reconstruct_normal_field(
    block: &BlockGeometry,
    vs: &mut FaceField,
    scratch: &mut ScratchRegion,
    dir: Dir,
) {
    for side in Side::BOTH {
        if needs_reconstruction(block.boundary(dir, side)) {
            reconstruct_side(block, vs, scratch, dir, side, |_| 1.0);
        }
    }
}

/// Set every cell-centered field component to the mean of its two
/// bracketing faces, over the whole block.
pub fn reconstruct_vc_field(block: &BlockGeometry, layout: &VarLayout, state: &mut FieldState) {
    let FieldState { vc, vs } = state;
    let Some(vs) = vs.as_ref() else {
        return;
    };
    let cells = vc.shape();
    for d in Dir::active(block.dims()) {
        let (Some(n), Some(b)) = (layout.bx(d), vs.comp(d)) else {
            continue;
        };
        vc.var_mut(n)
            .par_iter_mut()
            .enumerate()
            .for_each(|(flat, out)| {
                let p = unflatten(cells, flat);
                *out = 0.5 * (b[p] + b[step(p, d)]);
            });
    }
}
