//! Enrolled user callbacks.
//!
//! Setup code enrolls callbacks once; boundary enforcement invokes them
//! for the faces that ask for them. Enrolling again replaces the previous
//! callback. Callbacks are reference-counted so one configuration can be
//! shared by every rank of an in-process run.

use std::fmt;
use std::sync::Arc;

use halo_arena::{Array4, FieldState};
use halo_core::{Dir, Side};
use halo_grid::BlockGeometry;

/// Fills the ghosts beyond one `userdef` face at time `t`.
pub type UserBoundaryFn =
    Arc<dyn Fn(&mut FieldState, &BlockGeometry, Dir, Side, f64) + Send + Sync>;

/// Runs before any direction is processed, for boundaries that live
/// inside the domain.
pub type InternalBoundaryFn = Arc<dyn Fn(&mut FieldState, &BlockGeometry, f64) + Send + Sync>;

/// Adjusts the fluxes through one face of the domain.
pub type FluxBoundaryFn = Arc<dyn Fn(&mut Array4, &BlockGeometry, Dir, Side, f64) + Send + Sync>;

/// The set of enrolled callbacks. `None` means "not enrolled".
#[derive(Clone, Default)]
pub struct BoundaryHooks {
    user: Option<UserBoundaryFn>,
    internal: Option<InternalBoundaryFn>,
    flux: Option<FluxBoundaryFn>,
}

impl BoundaryHooks {
    /// Enroll the user-defined ghost fill.
    pub fn enroll_user_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut FieldState, &BlockGeometry, Dir, Side, f64) + Send + Sync + 'static,
    {
        self.user = Some(Arc::new(f));
    }

    /// Enroll the internal boundary pass.
    pub fn enroll_internal_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut FieldState, &BlockGeometry, f64) + Send + Sync + 'static,
    {
        self.internal = Some(Arc::new(f));
    }

    /// Enroll the flux-boundary fill.
    pub fn enroll_flux_boundary<F>(&mut self, f: F)
    where
        F: Fn(&mut Array4, &BlockGeometry, Dir, Side, f64) + Send + Sync + 'static,
    {
        self.flux = Some(Arc::new(f));
    }

    /// The user-defined ghost fill, if enrolled.
    pub fn user(&self) -> Option<&UserBoundaryFn> {
        self.user.as_ref()
    }

    /// The internal boundary pass, if enrolled.
    pub fn internal(&self) -> Option<&InternalBoundaryFn> {
        self.internal.as_ref()
    }

    /// The flux-boundary fill, if enrolled.
    pub fn flux(&self) -> Option<&FluxBoundaryFn> {
        self.flux.as_ref()
    }
}

impl fmt::Debug for BoundaryHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryHooks")
            .field("user", &self.user.is_some())
            .field("internal", &self.internal.is_some())
            .field("flux", &self.flux.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn nothing_enrolled_by_default() {
        let hooks = BoundaryHooks::default();
        assert!(hooks.user().is_none());
        assert!(hooks.internal().is_none());
        assert!(hooks.flux().is_none());
        assert_eq!(
            format!("{hooks:?}"),
            "BoundaryHooks { user: false, internal: false, flux: false }"
        );
    }

    #[test]
    fn re_enrolling_replaces() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut hooks = BoundaryHooks::default();
        hooks.enroll_internal_boundary(|_, _, _| panic!("replaced callback ran"));
        let c = calls.clone();
        hooks.enroll_internal_boundary(move |_, _, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let grid = halo_grid::Grid::builder(halo_grid::Geometry::Cartesian, 1)
            .axis(Dir::X1, halo_grid::AxisSpec::new(0.0, 1.0, 4))
            .build()
            .unwrap();
        let block = grid.single_block().unwrap();
        let layout = halo_core::Physics::hydro(1).layout().unwrap();
        let mut state = FieldState::zeros(block.shape(), &layout);
        (hooks.internal().unwrap())(&mut state, &block, 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
