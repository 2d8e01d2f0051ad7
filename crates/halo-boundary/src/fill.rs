//! Local ghost fills: periodic, reflective and outflow.
//!
//! Every fill is a copy from an interior source index along the boundary
//! direction, optionally transformed. Other axes pass through unchanged.
//! Each array is filled with one gather into scratch and one scatter, so
//! a source cell is never read after it has been overwritten.

use halo_arena::{flat_offset, FieldState, ScratchRegion};
use halo_core::{Dir, Index3, Side, Staging, VarLayout};
use halo_grid::{BlockAxis, BlockGeometry};

use crate::window::IndexWindow;

// ── Source indices ─────────────────────────────────────────────────

/// Interior index that periodic ghost `g` wraps to.
///
/// Valid for any ghost thickness, including thicker than the interior.
pub fn periodic_source(ax: &BlockAxis, g: usize) -> usize {
    let n = ax.cells as i64;
    let beg = ax.beg() as i64;
    (beg + (g as i64 - beg).rem_euclid(n)) as usize
}

/// Interior index that reflective ghost `g` mirrors.
///
/// The mirror plane is the boundary face itself, so the first ghost on
/// either side copies the boundary cell and the `k`-th copies the `k`-th
/// cell in. Needs `ghosts <= cells`; the grid builder enforces it.
pub fn mirror_source(ax: &BlockAxis, side: Side, g: usize) -> usize {
    let b = ax.beg() + side.offset() * ax.cells;
    2 * b - g - 1
}

/// Interior index that every outflow ghost on `side` copies.
pub fn outflow_source(ax: &BlockAxis, side: Side) -> usize {
    ax.beg() + side.offset() * (ax.cells - 1)
}

// ── Kernel ─────────────────────────────────────────────────────────

/// Fill `window` of `data` (shape `shape`) with `map(data[source(p)])`.
pub(crate) fn copy_from<S, M>(
    data: &mut [f64],
    shape: Index3,
    window: &IndexWindow,
    scratch: &mut ScratchRegion,
    source: S,
    map: M,
) where
    S: Fn(Index3) -> Index3 + Sync + Send,
    M: Fn(f64) -> f64 + Sync + Send,
{
    let buf = scratch.slab(window.len());
    {
        let src: &[f64] = data;
        window.gather(buf, |p| map(src[flat_offset(shape, source(p))]));
    }
    window.scatter(data, shape, buf);
}

fn along(p: Index3, dir: Dir, idx: usize) -> Index3 {
    let mut q = p;
    q[dir.index()] = idx;
    q
}

// ── Fills ──────────────────────────────────────────────────────────

/// Periodic fill of every cell-centered variable and face component.
pub fn enforce_periodic(
    block: &BlockGeometry,
    state: &mut FieldState,
    scratch: &mut ScratchRegion,
    dir: Dir,
    side: Side,
) {
    let ax = block.axis(dir);
    let source = |p: Index3| along(p, dir, periodic_source(ax, p[dir.index()]));

    let shape = block.shape();
    let window = IndexWindow::ghost(block, dir, side, Staging::Cell);
    for n in 0..state.vc.nvar() {
        copy_from(state.vc.var_mut(n), shape, &window, scratch, source, |v| v);
    }

    if let Some(vs) = state.vs.as_mut() {
        for comp in Dir::active(block.dims()) {
            let staging = Staging::Face(comp);
            let window = IndexWindow::ghost(block, dir, side, staging);
            if let Some(b) = vs.comp_mut(comp) {
                let shape = b.shape();
                copy_from(b.as_mut_slice(), shape, &window, scratch, source, |v| v);
            }
        }
    }
}

/// Mirror fill; the velocity normal to `dir` and the tangential face
/// components change sign. The normal face component is left alone.
pub fn enforce_reflective(
    block: &BlockGeometry,
    layout: &VarLayout,
    state: &mut FieldState,
    scratch: &mut ScratchRegion,
    dir: Dir,
    side: Side,
) {
    let ax = block.axis(dir);
    let source = |p: Index3| along(p, dir, mirror_source(ax, side, p[dir.index()]));
    let normal = layout.vx(dir);

    let shape = block.shape();
    let window = IndexWindow::ghost(block, dir, side, Staging::Cell);
    for n in 0..state.vc.nvar() {
        let sign = if Some(n) == normal { -1.0 } else { 1.0 };
        copy_from(state.vc.var_mut(n), shape, &window, scratch, source, |v| {
            sign * v
        });
    }

    if let Some(vs) = state.vs.as_mut() {
        for comp in Dir::active(block.dims()).filter(|&c| c != dir) {
            let window = IndexWindow::ghost(block, dir, side, Staging::Face(comp));
            if let Some(b) = vs.comp_mut(comp) {
                let shape = b.shape();
                copy_from(b.as_mut_slice(), shape, &window, scratch, source, |v| -v);
            }
        }
    }
}

/// Zero-gradient fill that refuses inflow: the ghost's normal velocity is
/// zeroed whenever the boundary cell's flow points into the domain (or
/// is exactly zero). Tangential face components are copied unchanged.
pub fn enforce_outflow(
    block: &BlockGeometry,
    layout: &VarLayout,
    state: &mut FieldState,
    scratch: &mut ScratchRegion,
    dir: Dir,
    side: Side,
) {
    let ax = block.axis(dir);
    let iref = outflow_source(ax, side);
    let source = |p: Index3| along(p, dir, iref);
    let normal = layout.vx(dir);
    // +1 on the left, -1 on the right: positive means "pointing inward".
    let inward = match side {
        Side::Left => 1.0,
        Side::Right => -1.0,
    };

    let shape = block.shape();
    let window = IndexWindow::ghost(block, dir, side, Staging::Cell);
    for n in 0..state.vc.nvar() {
        if Some(n) == normal {
            copy_from(state.vc.var_mut(n), shape, &window, scratch, source, |v| {
                if inward * v >= 0.0 {
                    0.0
                } else {
                    v
                }
            });
        } else {
            copy_from(state.vc.var_mut(n), shape, &window, scratch, source, |v| v);
        }
    }

    if let Some(vs) = state.vs.as_mut() {
        for comp in Dir::active(block.dims()).filter(|&c| c != dir) {
            let window = IndexWindow::ghost(block, dir, side, Staging::Face(comp));
            if let Some(b) = vs.comp_mut(comp) {
                let shape = b.shape();
                copy_from(b.as_mut_slice(), shape, &window, scratch, source, |v| v);
            }
        }
    }
}
