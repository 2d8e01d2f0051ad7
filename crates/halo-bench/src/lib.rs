//! Benchmark profiles and utilities for the Halo boundary layer.
//!
//! Provides pre-built [`Profile`]s for benchmarking and examples:
//!
//! - [`cartesian_profile`]: 3D MHD box, outflow in X1, reflective in X2, periodic in X3
//! - [`shearing_box_profile`]: 2D MHD shearing box
//! - [`spherical_profile`]: 3D MHD sphere with both polar axes
//! - [`init_state`]: smooth, deterministic initial data for any profile

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::f64::consts::PI;
use std::fmt;

use halo_arena::{unflatten, FieldState};
use halo_boundary::{Boundary, BoundaryConfig};
use halo_core::{BoundaryError, Dir, Physics, VarLayout};
use halo_grid::{AxisSpec, BlockGeometry, BoundaryType, Geometry, Grid, GridError};

/// Errors raised while building a profile.
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileError {
    /// The grid description was rejected.
    Grid(GridError),
    /// The physics or boundary configuration was rejected.
    Boundary(BoundaryError),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Boundary(e) => write!(f, "boundary: {e}"),
        }
    }
}

impl std::error::Error for ProfileError {}

impl From<GridError> for ProfileError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<BoundaryError> for ProfileError {
    fn from(e: BoundaryError) -> Self {
        Self::Boundary(e)
    }
}

/// A single-rank block with its variables and boundary configuration.
#[derive(Debug)]
pub struct Profile {
    /// Block geometry.
    pub block: BlockGeometry,
    /// Variable layout.
    pub layout: VarLayout,
    /// Boundary configuration.
    pub config: BoundaryConfig,
}

impl Profile {
    fn new(grid: Grid, config: BoundaryConfig) -> Result<Self, ProfileError> {
        let block = grid.single_block()?;
        let layout = Physics::mhd(block.dims()).layout()?;
        Ok(Self {
            block,
            layout,
            config,
        })
    }

    /// A boundary driver for this profile.
    pub fn boundary(&self) -> Result<Boundary, BoundaryError> {
        Boundary::new(self.block.clone(), self.layout.clone(), &self.config)
    }

    /// Interior cells of the block.
    pub fn cell_count(&self) -> usize {
        Dir::ALL.iter().map(|&d| self.block.axis(d).cells).product()
    }
}

/// 3D Cartesian MHD box with `n` cells per axis.
///
/// X1 is outflow, X2 reflective, X3 periodic, so one call exercises
/// every local fill that needs no callback.
pub fn cartesian_profile(n: usize) -> Result<Profile, ProfileError> {
    let grid = Grid::builder(Geometry::Cartesian, 3)
        .axis(
            Dir::X1,
            AxisSpec::new(0.0, 1.0, n).bounds(BoundaryType::Outflow, BoundaryType::Outflow),
        )
        .axis(
            Dir::X2,
            AxisSpec::new(0.0, 1.0, n).bounds(BoundaryType::Reflective, BoundaryType::Reflective),
        )
        .axis(Dir::X3, AxisSpec::new(0.0, 1.0, n))
        .build()?;
    Profile::new(grid, BoundaryConfig::default())
}

/// 2D MHD shearing box on `[-0.5, 0.5] x [-2, 2]` with `n` radial cells.
///
/// Keplerian shear rate `q Omega = 1.5`.
pub fn shearing_box_profile(n: usize) -> Result<Profile, ProfileError> {
    let grid = Grid::builder(Geometry::Cartesian, 2)
        .axis(
            Dir::X1,
            AxisSpec::new(-0.5, 0.5, n).bounds(BoundaryType::ShearingBox, BoundaryType::ShearingBox),
        )
        .axis(Dir::X2, AxisSpec::new(-2.0, 2.0, 4 * n))
        .build()?;
    Profile::new(grid, BoundaryConfig::default().with_shear_rate(1.5))
}

/// 3D spherical MHD shell covering the whole sphere, `n` cells in r.
pub fn spherical_profile(n: usize) -> Result<Profile, ProfileError> {
    let grid = Grid::builder(Geometry::Spherical, 3)
        .axis(
            Dir::X1,
            AxisSpec::new(1.0, 2.0, n).bounds(BoundaryType::Outflow, BoundaryType::Outflow),
        )
        .axis(
            Dir::X2,
            AxisSpec::new(0.0, PI, n).bounds(BoundaryType::Axis, BoundaryType::Axis),
        )
        .axis(Dir::X3, AxisSpec::new(0.0, 2.0 * PI, 2 * n))
        .build()?;
    Profile::new(grid, BoundaryConfig::default())
}

/// Smooth initial data: density and pressure waves, a small velocity
/// perturbation and a uniform radial field.
///
/// Ghost values are left at zero. The uniform X1 field is divergence-free
/// only on Cartesian blocks; curvilinear profiles are for timing.
pub fn init_state(profile: &Profile) -> FieldState {
    let block = &profile.block;
    let layout = &profile.layout;
    let mut state = FieldState::zeros(block.shape(), layout);
    let shape = block.shape();
    let interior = |p: [usize; 3]| {
        Dir::ALL.iter().all(|&d| {
            let ax = block.axis(d);
            (ax.beg()..ax.end()).contains(&p[d.index()])
        })
    };

    for n in 0..layout.nvar() {
        let name = layout.name(n).unwrap_or("");
        for (flat, v) in state.vc.var_mut(n).iter_mut().enumerate() {
            let p = unflatten(shape, flat);
            if !interior(p) {
                continue;
            }
            let [x, y, z] = block.position(p);
            let wave = (2.0 * PI * x).sin() * (2.0 * PI * y).cos() + 0.1 * z.cos();
            *v = match name {
                "RHO" => 1.0 + 0.1 * wave,
                "PRS" => 0.6 + 0.05 * wave,
                "BX1" => 1.0,
                _ => 0.01 * wave,
            };
        }
    }
    if let Some(b1) = state.vs.as_mut().and_then(|vs| vs.comp_mut(Dir::X1)) {
        b1.fill(1.0);
    }
    log::debug!(
        "initialised {} cells, {} variables",
        profile.cell_count(),
        layout.nvar()
    );
    state
}
