//! Polar-axis boundary of spherical grids.
//!
//! Ghost cells beyond `theta = 0` (or `theta = pi`) are the cells on the
//! other side of the pole: the same radius, mirrored in theta, and half a
//! turn away in phi when the grid covers the full circle. Quantities
//! whose direction flips across the pole (theta and phi components of
//! vectors) change sign.

use halo_arena::{FieldState, ScratchRegion};
use halo_core::{BoundaryError, Dir, Index3, Side, Staging, VarLayout};
use halo_grid::{BlockAxis, BlockGeometry, BoundaryType};

use crate::config::check_axis;
use crate::fill::{copy_from, mirror_source};
use crate::reconcile::{needs_reconstruction, reconstruct_side};
use crate::window::IndexWindow;

/// Ghost fill and field reconstruction across the polar axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisBoundary {
    full_turn: bool,
    signs: Vec<f64>,
}

impl AxisBoundary {
    /// Build the axis handler for `block`.
    pub fn new(block: &BlockGeometry, layout: &VarLayout) -> Result<Self, BoundaryError> {
        check_axis(block, Dir::X2)?;
        let flipped = [
            layout.vx(Dir::X2),
            layout.vx(Dir::X3),
            layout.bx(Dir::X2),
            layout.bx(Dir::X3),
        ];
        let signs = (0..layout.nvar())
            .map(|n| if flipped.contains(&Some(n)) { -1.0 } else { 1.0 })
            .collect();
        Ok(Self {
            full_turn: block.is_full_turn(),
            signs,
        })
    }

    /// Whether phi spans the full circle, so ghosts come from half a turn away.
    pub fn is_full_turn(&self) -> bool {
        self.full_turn
    }

    /// Sign applied to variable `n` across the pole.
    pub fn sign(&self, n: usize) -> f64 {
        self.signs.get(n).copied().unwrap_or(1.0)
    }

    fn azimuth_source(&self, az: &BlockAxis, k: usize) -> usize {
        if !self.full_turn {
            return k;
        }
        let n = az.cells as i64;
        let beg = az.beg() as i64;
        (beg + (k as i64 - beg + n / 2).rem_euclid(n)) as usize
    }

    /// Fill the ghosts beyond the pole on `side` of X2.
    pub fn enforce(
        &self,
        block: &BlockGeometry,
        state: &mut FieldState,
        scratch: &mut ScratchRegion,
        side: Side,
    ) {
        let polar = block.axis(Dir::X2);
        let azimuth = block.axis(Dir::X3);
        let source = |p: Index3| -> Index3 {
            [
                p[0],
                mirror_source(polar, side, p[1]),
                self.azimuth_source(azimuth, p[2]),
            ]
        };

        let shape = block.shape();
        let window = IndexWindow::ghost(block, Dir::X2, side, Staging::Cell);
        for n in 0..state.vc.nvar() {
            let s = self.sign(n);
            copy_from(state.vc.var_mut(n), shape, &window, scratch, source, |v| {
                s * v
            });
        }

        if let Some(vs) = state.vs.as_mut() {
            for comp in Dir::active(block.dims()).filter(|&c| c != Dir::X2) {
                let s = if comp == Dir::X3 { -1.0 } else { 1.0 };
                let window = IndexWindow::ghost(block, Dir::X2, side, Staging::Face(comp));
                if let Some(b) = vs.comp_mut(comp) {
                    let shape = b.shape();
                    copy_from(b.as_mut_slice(), shape, &window, scratch, source, |v| {
                        s * v
                    });
                }
            }
        }
    }

    /// Rebuild the X2 face field, treating the pole on axis sides.
    ///
    /// On axis sides the phi contribution enters with the opposite sign,
    /// and the face lying on the pole is then regularised: zero when phi
    /// covers part of the circle, the mean of its two neighbours when it
    /// covers the whole circle in three dimensions.
    pub fn reconstruct_bx2s(
        &self,
        block: &BlockGeometry,
        state: &mut FieldState,
        scratch: &mut ScratchRegion,
    ) {
        let Some(vs) = state.vs.as_mut() else {
            return;
        };
        let polar = block.axis(Dir::X2);
        for side in Side::BOTH {
            let bound = block.boundary(Dir::X2, side);
            if !needs_reconstruction(bound) {
                continue;
            }
            let on_axis = bound == BoundaryType::Axis;
            reconstruct_side(block, vs, scratch, Dir::X2, side, |e| {
                if on_axis && e == Dir::X3 {
                    -1.0
                } else {
                    1.0
                }
            });
        }

        let Some(b) = vs.comp_mut(Dir::X2) else {
            return;
        };
        let shape = b.shape();
        for side in Side::BOTH {
            if block.boundary(Dir::X2, side) != BoundaryType::Axis {
                continue;
            }
            let jaxis = match side {
                Side::Left => polar.beg(),
                Side::Right => polar.end(),
            };
            if self.full_turn {
                if block.dims() < 3 {
                    continue;
                }
                let az = block.axis(Dir::X3);
                for k in az.beg()..az.end() {
                    for i in 0..shape[0] {
                        b[[i, jaxis, k]] = 0.5 * (b[[i, jaxis - 1, k]] + b[[i, jaxis + 1, k]]);
                    }
                }
            } else {
                for k in 0..shape[2] {
                    for i in 0..shape[0] {
                        b[[i, jaxis, k]] = 0.0;
                    }
                }
            }
        }
    }
}
