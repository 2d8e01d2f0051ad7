//! Block and field fixtures.
//!
//! - [`block`] builds the single block of an undecomposed grid.
//! - [`noise`] is a deterministic, seedable value per index.
//! - [`solenoidal_field`] fills a face field whose discrete divergence
//!   vanishes in every cell, ghosts included.
//! - [`poison_ghosts`] marks every ghost value so tests can check that
//!   boundary enforcement rewrote it.

use halo_arena::{unflatten, FaceField, FieldState};
use halo_boundary::reconcile::divergence;
use halo_boundary::IndexWindow;
use halo_core::{Dir, Index3, Staging};
use halo_grid::{AxisSpec, BlockGeometry, BoundaryType, Geometry, Grid};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The block of a single-rank grid with one axis per entry of `axes`.
pub fn block(geometry: Geometry, axes: &[AxisSpec]) -> BlockGeometry {
    let mut builder = Grid::builder(geometry, axes.len());
    for (d, spec) in Dir::ALL.into_iter().zip(axes) {
        builder = builder.axis(d, spec.clone());
    }
    builder
        .build()
        .expect("fixture grid is valid")
        .single_block()
        .expect("fixture grid has rank 0")
}

/// Packs `tag` and `p` into a stream key, so values do not depend on
/// the order in which indices are visited.
fn stream_key(tag: u64, p: Index3) -> u64 {
    (tag << 48) ^ ((p[2] as u64) << 32) ^ ((p[1] as u64) << 16) ^ p[0] as u64
}

/// A uniform value in `[-1, 1)` determined by `seed`, `tag` and `p`.
pub fn noise(seed: u64, tag: u64, p: Index3) -> f64 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ stream_key(tag, p));
    rng.random_range(-1.0..1.0)
}

/// Set every interior value of variable `n` to `f(n, position)`.
pub fn fill_interior(
    block: &BlockGeometry,
    state: &mut FieldState,
    f: impl Fn(usize, [f64; 3]) -> f64,
) {
    let window = IndexWindow::interior(block, Staging::Cell);
    for n in 0..state.vc.nvar() {
        window.for_each(|p| state.vc[(n, p)] = f(n, block.position(p)));
    }
}

/// Fill the interior of every cell-centered variable with [`noise`].
pub fn fill_random(block: &BlockGeometry, state: &mut FieldState, seed: u64) {
    let window = IndexWindow::interior(block, Staging::Cell);
    for n in 0..state.vc.nvar() {
        window.for_each(|p| state.vc[(n, p)] = noise(seed, n as u64, p));
    }
}

/// Set every value outside the interior to NaN.
pub fn poison_ghosts(block: &BlockGeometry, state: &mut FieldState) {
    let interior = IndexWindow::interior(block, Staging::Cell);
    let shape = state.vc.shape();
    for n in 0..state.vc.nvar() {
        for (flat, v) in state.vc.var_mut(n).iter_mut().enumerate() {
            if !interior.contains(unflatten(shape, flat)) {
                *v = f64::NAN;
            }
        }
    }
    if let Some(vs) = state.vs.as_mut() {
        for d in Dir::active(block.dims()) {
            let interior = IndexWindow::interior(block, Staging::Face(d));
            if let Some(b) = vs.comp_mut(d) {
                let shape = b.shape();
                for (flat, v) in b.as_mut_slice().iter_mut().enumerate() {
                    if !interior.contains(unflatten(shape, flat)) {
                        *v = f64::NAN;
                    }
                }
            }
        }
    }
}

/// Whether every value of `state` is finite.
pub fn all_finite(state: &FieldState) -> bool {
    state.vc.as_slice().iter().all(|v| v.is_finite())
        && state
            .vs
            .iter()
            .flat_map(|vs| vs.iter())
            .all(|(_, b)| b.as_slice().iter().all(|v| v.is_finite()))
}

fn shift(p: Index3, d: Dir) -> Index3 {
    let mut q = p;
    q[d.index()] += 1;
    q
}

/// Fill `vs` with a field whose face fluxes are the discrete curl of a
/// random edge potential, so every cell has zero divergence.
///
/// The potential repeats with the interior period along periodic axes,
/// so periodic images agree. Faces of (numerically) zero area, such as
/// those on a polar axis, are set to zero.
pub fn solenoidal_field(block: &BlockGeometry, vs: &mut FaceField, seed: u64) {
    let dims = block.dims();
    let key = |p: Index3| -> Index3 {
        let mut q = p;
        for d in Dir::active(dims) {
            let ax = block.axis(d);
            if ax.left == BoundaryType::Periodic {
                let beg = ax.beg() as i64;
                q[d.index()] = (beg + (p[d.index()] as i64 - beg).rem_euclid(ax.cells as i64)) as usize;
            }
        }
        q
    };
    let potential = |c: Dir, p: Index3| -> f64 {
        if dims == 3 || c == Dir::X3 {
            noise(seed, c.index() as u64, key(p))
        } else {
            0.0
        }
    };
    let curl = |a: Dir, b: Dir, c: Dir, p: Index3| -> f64 {
        // (curl A)_a = dA_c/db - dA_b/dc
        (potential(c, shift(p, b)) - potential(c, p)) - (potential(b, shift(p, c)) - potential(b, p))
    };
    let constant = 0.5 + noise(seed, 7, [0; 3]).abs();

    for d in Dir::active(dims) {
        let (Some(area), Some(b)) = (block.area(d), vs.comp_mut(d)) else {
            continue;
        };
        let shape = b.shape();
        for (flat, v) in b.as_mut_slice().iter_mut().enumerate() {
            let p = unflatten(shape, flat);
            let flux = if dims == 1 {
                constant
            } else {
                match d {
                    Dir::X1 => curl(Dir::X1, Dir::X2, Dir::X3, p),
                    Dir::X2 => curl(Dir::X2, Dir::X3, Dir::X1, p),
                    Dir::X3 => curl(Dir::X3, Dir::X1, Dir::X2, p),
                }
            };
            let a = area[p];
            *v = if a.abs() < 1e-12 { 0.0 } else { flux / a };
        }
    }
}

/// Largest absolute divergence over the cells of `window`.
pub fn max_divergence(block: &BlockGeometry, vs: &FaceField, window: &IndexWindow) -> f64 {
    let mut worst: f64 = 0.0;
    window.for_each(|p| worst = worst.max(divergence(block, vs, p).abs()));
    worst
}

/// Largest absolute divergence over every cell of the block.
pub fn max_block_divergence(block: &BlockGeometry, vs: &FaceField) -> f64 {
    max_divergence(block, vs, &IndexWindow::full(block, Staging::Cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_deterministic_and_bounded() {
        let a = noise(3, 1, [4, 5, 6]);
        assert_eq!(a, noise(3, 1, [4, 5, 6]));
        assert_ne!(a, noise(4, 1, [4, 5, 6]));
        for i in 0..1000 {
            let v = noise(9, 0, [i, 0, 0]);
            assert!((-1.0..1.0).contains(&v));
        }
        // Distinct tags and indices draw from distinct streams.
        assert_ne!(noise(3, 1, [4, 5, 6]), noise(3, 2, [4, 5, 6]));
        assert_ne!(noise(3, 1, [4, 5, 6]), noise(3, 1, [4, 6, 5]));
    }

    #[test]
    fn solenoidal_field_is_divergence_free() {
        let outflow = |s: f64, e: f64, n: usize| {
            AxisSpec::new(s, e, n).bounds(BoundaryType::Outflow, BoundaryType::Outflow)
        };
        for (geometry, axes) in [
            (Geometry::Cartesian, vec![outflow(0.0, 1.0, 5), outflow(0.0, 2.0, 4)]),
            (
                Geometry::Spherical,
                vec![outflow(1.0, 2.0, 4), outflow(0.4, 2.6, 5), outflow(0.0, 1.0, 3)],
            ),
        ] {
            let block = block(geometry, &axes);
            let mut vs = FaceField::zeros(block.shape(), block.dims());
            solenoidal_field(&block, &mut vs, 11);
            assert!(max_block_divergence(&block, &vs) < 1e-12);
        }
    }
}
