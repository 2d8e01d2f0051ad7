//! Boundary configuration and its validation.

use halo_arena::{Array4, FieldState};
use halo_core::{BoundaryError, Dir, HookKind, Side, VarLayout};
use halo_grid::{BlockGeometry, BoundaryType, Geometry};

use crate::hooks::BoundaryHooks;

/// Everything boundary enforcement needs beyond the grid and the state.
///
/// Built once during setup and passed by reference to
/// [`Boundary::new`](crate::Boundary::new).
#[derive(Clone, Debug, Default)]
pub struct BoundaryConfig {
    /// Shear rate `S` of a shearing-box run. Required when any face is
    /// a shearing-box face.
    pub shear_rate: Option<f64>,
    /// Enrolled callbacks.
    pub hooks: BoundaryHooks,
}

impl BoundaryConfig {
    /// Set the shearing-box shear rate.
    pub fn with_shear_rate(mut self, shear_rate: f64) -> Self {
        self.shear_rate = Some(shear_rate);
        self
    }

    /// Enroll the user-defined ghost fill.
    pub fn enroll_user_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut FieldState, &BlockGeometry, Dir, Side, f64) + Send + Sync + 'static,
    {
        self.hooks.enroll_user_boundary(f);
    }

    /// Enroll the internal boundary pass.
    pub fn enroll_internal_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut FieldState, &BlockGeometry, f64) + Send + Sync + 'static,
    {
        self.hooks.enroll_internal_boundary(f);
    }

    /// Enroll the flux-boundary fill.
    pub fn enroll_flux_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut Array4, &BlockGeometry, Dir, Side, f64) + Send + Sync + 'static,
    {
        self.hooks.enroll_flux_boundary(f);
    }

    /// Check this configuration against a block and variable layout.
    ///
    /// The same conditions are checked again at dispatch; validating
    /// up front reports them before the first step.
    pub fn validate(&self, block: &BlockGeometry, layout: &VarLayout) -> Result<(), BoundaryError> {
        // 1. Physics and grid agree on dimensionality.
        if layout.dims() != block.dims() {
            return Err(BoundaryError::InvalidPhysics {
                reason: format!(
                    "physics has {} dimensions but the block has {}",
                    layout.dims(),
                    block.dims()
                ),
            });
        }
        // 2. Every face is enforceable.
        for dir in Dir::active(block.dims()) {
            for side in Side::BOTH {
                match block.boundary(dir, side) {
                    BoundaryType::ShearingBox => {
                        check_shearing_box(block, dir)?;
                        if self.shear_rate.is_none() {
                            return Err(BoundaryError::InvalidShearingBox {
                                reason: "no shear rate configured".to_string(),
                            });
                        }
                    }
                    BoundaryType::UserDef if self.hooks.user().is_none() => {
                        return Err(BoundaryError::MissingCallback {
                            hook: HookKind::UserDefined,
                            dir,
                            side,
                        });
                    }
                    BoundaryType::Axis => check_axis(block, dir)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

/// Conditions under which a shearing-box face along `dir` can be enforced.
pub(crate) fn check_shearing_box(block: &BlockGeometry, dir: Dir) -> Result<(), BoundaryError> {
    if dir != Dir::X1 {
        return Err(BoundaryError::ShearingBoxAxis { dir });
    }
    if block.dims() < 2 {
        return Err(BoundaryError::InvalidShearingBox {
            reason: "a cross-stream X2 axis is required".to_string(),
        });
    }
    if block.geometry() != Geometry::Cartesian {
        return Err(BoundaryError::InvalidShearingBox {
            reason: format!("{} geometry is not supported", block.geometry()),
        });
    }
    if block.is_decomposed(Dir::X2) {
        return Err(BoundaryError::ShearingBoxDecomposed {
            procs: block.procs(Dir::X2),
        });
    }
    Ok(())
}

/// Conditions under which an axis face along `dir` can be enforced.
pub(crate) fn check_axis(block: &BlockGeometry, dir: Dir) -> Result<(), BoundaryError> {
    if block.geometry() != Geometry::Spherical {
        return Err(BoundaryError::InvalidAxis {
            reason: format!("{} geometry has no polar axis", block.geometry()),
        });
    }
    if dir != Dir::X2 {
        return Err(BoundaryError::InvalidAxis {
            reason: format!("the polar axis runs along X2, not {dir}"),
        });
    }
    if block.is_full_turn() && block.is_decomposed(Dir::X3) {
        return Err(BoundaryError::InvalidAxis {
            reason: "a full-turn axis needs an undecomposed X3".to_string(),
        });
    }
    Ok(())
}
