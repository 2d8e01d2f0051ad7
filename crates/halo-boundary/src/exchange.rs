//! Ghost exchange with neighbouring ranks.
//!
//! Boundary enforcement does not know how data moves between ranks. It
//! calls [`HaloExchange::exchange_axis`] once per decomposed direction,
//! before the local fills of that direction, and expects every ghost on
//! an `internal` face (and on a wrapping face whose partner lives on
//! another rank) to hold the neighbour's interior afterwards.
//!
//! [`pack_slab`] and [`unpack_slab`] fix the wire layout so that every
//! transport agrees on it: every cell-centered variable in layout order,
//! then every face component in direction order, each in window order.

use halo_arena::{flat_offset, FieldState};
use halo_core::{BoundaryError, Dir, Index3, Side, Staging};
use halo_grid::BlockGeometry;

use crate::window::IndexWindow;

/// Moves ghost data between ranks along one direction.
///
/// Implementations must be collective: every rank sharing the direction
/// calls `exchange_axis` for the same `dir` in the same order.
pub trait HaloExchange: Send {
    /// Fill the ghosts of `dir` that face other ranks.
    fn exchange_axis(
        &mut self,
        dir: Dir,
        block: &BlockGeometry,
        state: &mut FieldState,
    ) -> Result<(), BoundaryError>;
}

fn slabs(block: &BlockGeometry, state: &FieldState, dir: Dir, side: Side) -> Vec<(Staging, IndexWindow)> {
    let mut out = vec![(
        Staging::Cell,
        IndexWindow::ghost(block, dir, side, Staging::Cell),
    )];
    if let Some(vs) = state.vs.as_ref() {
        for (comp, _) in vs.iter() {
            let staging = Staging::Face(comp);
            out.push((staging, IndexWindow::ghost(block, dir, side, staging)));
        }
    }
    out
}

/// Number of values [`pack_slab`] produces for `dir`.
pub fn slab_len(block: &BlockGeometry, state: &FieldState, dir: Dir) -> usize {
    slabs(block, state, dir, Side::Left)
        .iter()
        .map(|(staging, w)| match staging {
            Staging::Cell => w.len() * state.vc.nvar(),
            Staging::Face(_) => w.len(),
        })
        .sum()
}

/// Pack the interior cells that the neighbour on `toward` needs for its
/// ghosts, appending to `out`.
///
/// Sending to the right neighbour fills its left ghosts, which mirror
/// the last `ghosts` interior layers; sending left mirrors the first.
pub fn pack_slab(
    block: &BlockGeometry,
    state: &FieldState,
    dir: Dir,
    toward: Side,
    out: &mut Vec<f64>,
) {
    let cells = block.axis(dir).cells;
    let source = |p: Index3| -> Index3 {
        let mut q = p;
        match toward {
            Side::Right => q[dir.index()] += cells,
            Side::Left => q[dir.index()] -= cells,
        }
        q
    };
    // The receiver's ghost window, seen from the sender's own indices.
    let window_side = toward.opposite();
    out.reserve(slab_len(block, state, dir));

    for (staging, window) in slabs(block, state, dir, window_side) {
        match staging {
            Staging::Cell => {
                let shape = state.vc.shape();
                for n in 0..state.vc.nvar() {
                    let data = state.vc.var(n);
                    window.for_each(|p| out.push(data[flat_offset(shape, source(p))]));
                }
            }
            Staging::Face(comp) => {
                if let Some(b) = state.vs.as_ref().and_then(|vs| vs.comp(comp)) {
                    window.for_each(|p| out.push(b[source(p)]));
                }
            }
        }
    }
}

/// Write a slab produced by a neighbour's [`pack_slab`] into the ghosts
/// on `side` of `dir`.
pub fn unpack_slab(
    block: &BlockGeometry,
    state: &mut FieldState,
    dir: Dir,
    side: Side,
    data: &[f64],
) -> Result<(), BoundaryError> {
    let expected = slab_len(block, state, dir);
    if data.len() != expected {
        return Err(BoundaryError::Exchange {
            dir,
            reason: format!(
                "received {} values from the {side} neighbour, expected {expected}",
                data.len()
            ),
        });
    }

    let mut values = data.iter().copied();
    for (staging, window) in slabs(block, state, dir, side) {
        match staging {
            Staging::Cell => {
                let shape = state.vc.shape();
                for n in 0..state.vc.nvar() {
                    let target = state.vc.var_mut(n);
                    window.for_each(|p| {
                        if let Some(v) = values.next() {
                            target[flat_offset(shape, p)] = v;
                        }
                    });
                }
            }
            Staging::Face(comp) => {
                if let Some(b) = state.vs.as_mut().and_then(|vs| vs.comp_mut(comp)) {
                    window.for_each(|p| {
                        if let Some(v) = values.next() {
                            b[p] = v;
                        }
                    });
                }
            }
        }
    }
    Ok(())
}
