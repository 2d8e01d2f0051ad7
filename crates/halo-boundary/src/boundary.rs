//! The per-block boundary driver.

use std::fmt;
use std::sync::Arc;

use halo_arena::{Array4, FieldState, ScratchRegion};
use halo_core::{BoundaryError, Dir, HookKind, Side, VarLayout};
use halo_grid::{BlockGeometry, BoundaryType};

use crate::axis::AxisBoundary;
use crate::config::BoundaryConfig;
use crate::exchange::HaloExchange;
use crate::fill::{enforce_outflow, enforce_periodic, enforce_reflective};
use crate::reconcile;
use crate::shearing::enforce_shearing_box;

/// Boundary enforcement for one block.
///
/// Owns everything that stays fixed between steps: the block geometry,
/// the variable layout, the enrolled callbacks and the scratch buffer
/// every pass stages through. Call [`set_boundaries`](Self::set_boundaries)
/// once per stage.
///
/// # Examples
///
/// ```
/// use halo_arena::FieldState;
/// use halo_boundary::{Boundary, BoundaryConfig};
/// use halo_core::{Dir, Physics};
/// use halo_grid::{AxisSpec, BoundaryType, Geometry, Grid};
///
/// let block = Grid::builder(Geometry::Cartesian, 1)
///     .axis(
///         Dir::X1,
///         AxisSpec::new(0.0, 1.0, 8).bounds(BoundaryType::Outflow, BoundaryType::Outflow),
///     )
///     .build()
///     .unwrap()
///     .single_block()
///     .unwrap();
/// let layout = Physics::hydro(1).layout().unwrap();
/// let mut boundary = Boundary::new(block, layout.clone(), &BoundaryConfig::default()).unwrap();
///
/// let mut state = FieldState::zeros(boundary.block().shape(), &layout);
/// state.vc[(0, [2, 0, 0])] = 1.5;
/// boundary.set_boundaries(&mut state, 0.0).unwrap();
/// assert_eq!(state.vc[(0, [0, 0, 0])], 1.5);
/// ```
pub struct Boundary {
    block: Arc<BlockGeometry>,
    layout: VarLayout,
    config: BoundaryConfig,
    axis: Option<AxisBoundary>,
    exchange: Option<Box<dyn HaloExchange>>,
    scratch: ScratchRegion,
}

impl Boundary {
    /// Validate `config` against the block and build the driver.
    pub fn new(
        block: impl Into<Arc<BlockGeometry>>,
        layout: VarLayout,
        config: &BoundaryConfig,
    ) -> Result<Self, BoundaryError> {
        let block = block.into();
        config.validate(&block, &layout)?;
        let has_axis = Side::BOTH
            .iter()
            .any(|&s| block.dims() >= 2 && block.boundary(Dir::X2, s) == BoundaryType::Axis);
        let axis = if has_axis {
            Some(AxisBoundary::new(&block, &layout)?)
        } else {
            None
        };

        let bounds: Vec<String> = Dir::active(block.dims())
            .map(|d| {
                format!(
                    "{d}=[{}, {}]",
                    block.boundary(d, Side::Left),
                    block.boundary(d, Side::Right)
                )
            })
            .collect();
        log::info!(
            "boundary: {} {}D block at {:?}, {} vars{}, {}",
            block.geometry(),
            block.dims(),
            block.rank_coords(),
            layout.nvar(),
            if layout.mhd() { " + staggered field" } else { "" },
            bounds.join(" ")
        );

        Ok(Self {
            block,
            layout,
            config: config.clone(),
            axis,
            exchange: None,
            scratch: ScratchRegion::default(),
        })
    }

    /// Attach the transport used for decomposed directions.
    pub fn with_exchange(mut self, exchange: impl HaloExchange + 'static) -> Self {
        self.exchange = Some(Box::new(exchange));
        self
    }

    /// Block geometry.
    pub fn block(&self) -> &BlockGeometry {
        &self.block
    }

    /// Variable layout.
    pub fn layout(&self) -> &VarLayout {
        &self.layout
    }

    /// Active configuration.
    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// Axis handler, present when X2 has an axis face.
    pub fn axis(&self) -> Option<&AxisBoundary> {
        self.axis.as_ref()
    }

    /// Scratch buffer shared by every pass.
    pub fn scratch(&self) -> &ScratchRegion {
        &self.scratch
    }

    // ── Enrollment ─────────────────────────────────────────────────

    /// Enroll the user-defined ghost fill, replacing any previous one.
    pub fn enroll_user_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut FieldState, &BlockGeometry, Dir, Side, f64) + Send + Sync + 'static,
    {
        self.config.enroll_user_boundary(f);
    }

    /// Enroll the internal boundary pass, replacing any previous one.
    pub fn enroll_internal_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut FieldState, &BlockGeometry, f64) + Send + Sync + 'static,
    {
        self.config.enroll_internal_boundary(f);
    }

    /// Enroll the flux-boundary fill, replacing any previous one.
    pub fn enroll_flux_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut Array4, &BlockGeometry, Dir, Side, f64) + Send + Sync + 'static,
    {
        self.config.enroll_flux_boundary(f);
    }

    // ── Enforcement ────────────────────────────────────────────────

    /// Fill every ghost of `state` at time `t` and reconcile the field.
    ///
    /// Order: the internal boundary pass, then for each active direction
    /// in turn the rank exchange, the local fills of both sides and the
    /// normal-field rebuild, and finally the cell-centered field average.
    /// Later directions overwrite the edge and corner ghosts of earlier
    /// ones.
    pub fn set_boundaries(&mut self, state: &mut FieldState, t: f64) -> Result<(), BoundaryError> {
        state.check_shape(self.block.shape(), &self.layout)?;

        if let Some(internal) = self.config.hooks.internal() {
            internal(state, self.block(), t);
        }

        for dir in Dir::active(self.block.dims()) {
            log::debug!(
                "set_boundaries {dir}: t={t} [{}, {}]",
                self.block.boundary(dir, Side::Left),
                self.block.boundary(dir, Side::Right)
            );
            if self.block.is_decomposed(dir) {
                let exchange = self
                    .exchange
                    .as_mut()
                    .ok_or(BoundaryError::MissingExchange {
                        dir,
                        procs: self.block.procs(dir),
                    })?;
                exchange.exchange_axis(dir, &self.block, state)?;
            }
            self.enforce_boundary_dir(state, t, dir)?;
            self.reconstruct_normal_field(state, dir);
        }

        self.reconstruct_vc_field(state);
        Ok(())
    }

    /// Apply the local fills of both sides of `dir`.
    ///
    /// Ghosts of `internal` faces, and of periodic faces of a decomposed
    /// direction, are left to the exchange.
    pub fn enforce_boundary_dir(
        &mut self,
        state: &mut FieldState,
        t: f64,
        dir: Dir,
    ) -> Result<(), BoundaryError> {
        let block = &*self.block;
        let scratch = &mut self.scratch;
        for side in Side::BOTH {
            match block.boundary(dir, side) {
                BoundaryType::Internal => {}
                BoundaryType::Periodic => {
                    if !block.is_decomposed(dir) {
                        enforce_periodic(block, state, scratch, dir, side);
                    }
                }
                BoundaryType::Reflective => {
                    enforce_reflective(block, &self.layout, state, scratch, dir, side);
                }
                BoundaryType::Outflow => {
                    enforce_outflow(block, &self.layout, state, scratch, dir, side);
                }
                BoundaryType::ShearingBox => {
                    let shear_rate =
                        self.config
                            .shear_rate
                            .ok_or_else(|| BoundaryError::InvalidShearingBox {
                                reason: "no shear rate configured".to_string(),
                            })?;
                    enforce_shearing_box(block, &self.layout, state, scratch, side, t, shear_rate)?;
                }
                BoundaryType::Axis => {
                    let axis = self.axis.as_ref().ok_or_else(|| BoundaryError::InvalidAxis {
                        reason: format!("axis boundary on {dir} {side}"),
                    })?;
                    if dir != Dir::X2 {
                        return Err(BoundaryError::InvalidAxis {
                            reason: format!("the polar axis runs along X2, not {dir}"),
                        });
                    }
                    axis.enforce(block, state, scratch, side);
                }
                BoundaryType::UserDef => {
                    let user = self
                        .config
                        .hooks
                        .user()
                        .ok_or(BoundaryError::MissingCallback {
                            hook: HookKind::UserDefined,
                            dir,
                            side,
                        })?;
                    user(state, block, dir, side, t);
                }
            }
        }
        Ok(())
    }

    /// Hand the fluxes through each non-internal face of `dir` to the
    /// enrolled flux callback.
    pub fn enforce_flux_boundaries(
        &self,
        fluxes: &mut Array4,
        dir: Dir,
        t: f64,
    ) -> Result<(), BoundaryError> {
        for side in Side::BOTH {
            if self.block.boundary(dir, side) == BoundaryType::Internal {
                continue;
            }
            let flux = self
                .config
                .hooks
                .flux()
                .ok_or(BoundaryError::MissingCallback {
                    hook: HookKind::Flux,
                    dir,
                    side,
                })?;
            flux(fluxes, self.block(), dir, side, t);
        }
        Ok(())
    }

    /// Rebuild the ghost faces normal to `dir` from the solenoidal constraint.
    pub fn reconstruct_normal_field(&mut self, state: &mut FieldState, dir: Dir) {
        if !self.layout.mhd() {
            return;
        }
        let on_axis = Side::BOTH
            .iter()
            .any(|&s| self.block.boundary(dir, s) == BoundaryType::Axis);
        match (&self.axis, on_axis && dir == Dir::X2) {
            (Some(axis), true) => axis.reconstruct_bx2s(&self.block, state, &mut self.scratch),
            _ => {
                if let Some(vs) = state.vs.as_mut() {
                    reconcile::reconstruct_normal_field(&self.block, vs, &mut self.scratch, dir);
                }
            }
        }
    }

    /// Refresh the cell-centered field from the face field.
    pub fn reconstruct_vc_field(&self, state: &mut FieldState) {
        if self.layout.mhd() {
            reconcile::reconstruct_vc_field(&self.block, &self.layout, state);
        }
    }
}

impl fmt::Debug for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Boundary")
            .field("geometry", &self.block.geometry())
            .field("dims", &self.block.dims())
            .field("nvar", &self.layout.nvar())
            .field("config", &self.config)
            .field("axis", &self.axis)
            .field("exchange", &self.exchange.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::Physics;
    use halo_grid::{AxisSpec, Geometry, Grid};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn block(x1: (BoundaryType, BoundaryType), procs: usize) -> BlockGeometry {
        Grid::builder(Geometry::Cartesian, 2)
            .axis(
                Dir::X1,
                AxisSpec::new(0.0, 1.0, 8).bounds(x1.0, x1.1).procs(procs),
            )
            .axis(Dir::X2, AxisSpec::new(0.0, 1.0, 4))
            .build()
            .unwrap()
            .single_block()
            .unwrap()
    }

    #[test]
    fn internal_hook_runs_first() {
        let b = block((BoundaryType::Outflow, BoundaryType::Outflow), 1);
        let layout = Physics::hydro(2).layout().unwrap();
        let mut boundary = Boundary::new(b, layout.clone(), &BoundaryConfig::default()).unwrap();
        // The hook writes the boundary cell; the outflow fill must see it.
        boundary.enroll_internal_boundary(|state, _, _| state.vc[(0, [2, 3, 0])] = 4.0);
        let mut state = FieldState::zeros(boundary.block().shape(), &layout);
        boundary.set_boundaries(&mut state, 0.0).unwrap();
        assert_eq!(state.vc[(0, [0, 3, 0])], 4.0);
    }

    #[test]
    fn userdef_hook_sees_each_side() {
        let b = block((BoundaryType::UserDef, BoundaryType::UserDef), 1);
        let layout = Physics::hydro(2).layout().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut config = BoundaryConfig::default();
        let seen = Arc::clone(&calls);
        config.enroll_user_boundary(move |_, _, dir, _, t| {
            assert_eq!(dir, Dir::X1);
            assert_eq!(t, 2.5);
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let mut boundary = Boundary::new(b, layout.clone(), &config).unwrap();
        let mut state = FieldState::zeros(boundary.block().shape(), &layout);
        boundary.set_boundaries(&mut state, 2.5).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn decomposed_direction_needs_an_exchange() {
        let b = block((BoundaryType::Periodic, BoundaryType::Periodic), 2);
        let layout = Physics::hydro(2).layout().unwrap();
        let mut boundary = Boundary::new(b, layout.clone(), &BoundaryConfig::default()).unwrap();
        let mut state = FieldState::zeros(boundary.block().shape(), &layout);
        assert_eq!(
            boundary.set_boundaries(&mut state, 0.0).unwrap_err(),
            BoundaryError::MissingExchange {
                dir: Dir::X1,
                procs: 2
            }
        );
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let b = block((BoundaryType::Outflow, BoundaryType::Outflow), 1);
        let layout = Physics::hydro(2).layout().unwrap();
        let mut boundary = Boundary::new(b, layout.clone(), &BoundaryConfig::default()).unwrap();
        let mut state = FieldState::zeros([3, 3, 1], &layout);
        assert!(matches!(
            boundary.set_boundaries(&mut state, 0.0),
            Err(BoundaryError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn flux_boundaries_need_a_callback() {
        let b = block((BoundaryType::Outflow, BoundaryType::Reflective), 1);
        let layout = Physics::hydro(2).layout().unwrap();
        let mut boundary = Boundary::new(b, layout.clone(), &BoundaryConfig::default()).unwrap();
        let mut fluxes = Array4::zeros(layout.nvar(), boundary.block().shape());
        assert_eq!(
            boundary
                .enforce_flux_boundaries(&mut fluxes, Dir::X1, 0.0)
                .unwrap_err(),
            BoundaryError::MissingCallback {
                hook: HookKind::Flux,
                dir: Dir::X1,
                side: Side::Left
            }
        );
        boundary.enroll_flux_boundary(|f, _, _, side, _| {
            let v = if side == Side::Left { 1.0 } else { 10.0 };
            f[(0, [0, 0, 0])] += v;
        });
        boundary
            .enforce_flux_boundaries(&mut fluxes, Dir::X1, 0.0)
            .unwrap();
        assert_eq!(fluxes[(0, [0, 0, 0])], 11.0);
    }
}
