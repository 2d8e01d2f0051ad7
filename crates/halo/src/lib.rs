//! Halo: boundary enforcement and constrained transport for
//! block-structured MHD grids.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Halo sub-crates. For most users, adding `halo` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use halo::prelude::*;
//!
//! // A 2D box: outflow in x, periodic in y.
//! let block = Grid::builder(Geometry::Cartesian, 2)
//!     .axis(
//!         Dir::X1,
//!         AxisSpec::new(0.0, 1.0, 16).bounds(BoundaryType::Outflow, BoundaryType::Outflow),
//!     )
//!     .axis(Dir::X2, AxisSpec::new(0.0, 1.0, 16))
//!     .build()
//!     .unwrap()
//!     .single_block()
//!     .unwrap();
//! let layout = Physics::mhd(2).layout().unwrap();
//! let mut state = FieldState::zeros(block.shape(), &layout);
//! let rho = layout.index_of("RHO").unwrap();
//! state.vc.var_mut(rho).fill(1.0);
//!
//! let mut boundary = Boundary::new(block, layout, &BoundaryConfig::default()).unwrap();
//! boundary.set_boundaries(&mut state, 0.0).unwrap();
//! assert_eq!(state.vc[(rho, [0, 5, 0])], 1.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `halo-core` | Directions, sides, physics layout, `BoundaryError` |
//! | [`arena`] | `halo-arena` | Field arrays, `FieldState`, scratch storage |
//! | [`grid`] | `halo-grid` | Grid description, block geometry, process topology |
//! | [`boundary`] | `halo-boundary` | Ghost fills, field reconstruction, the `Boundary` driver |
//! | [`exchange`] | `halo-exchange` | In-process ghost exchange over channels |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core identifiers and the error taxonomy (`halo-core`).
pub use halo_core as types;

/// Field storage (`halo-arena`).
///
/// [`arena::FieldState`] holds the cell-centered variables and the
/// staggered field of one block.
pub use halo_arena as arena;

/// Grids, blocks and process topology (`halo-grid`).
pub use halo_grid as grid;

/// Boundary enforcement (`halo-boundary`).
///
/// [`boundary::Boundary`] drives every fill; the per-kind functions in
/// [`boundary::fill`], [`boundary::shearing`] and [`boundary::reconcile`]
/// are available for custom drivers.
pub use halo_boundary as boundary;

/// Channel-based exchange between ranks in one process (`halo-exchange`).
pub use halo_exchange as exchange;

/// Common imports for typical Halo usage.
///
/// ```rust
/// use halo::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use halo_core::{BoundaryError, Dir, HookKind, Physics, Side, Staging, VarLayout};

    // Storage
    pub use halo_arena::{FaceField, FieldState};

    // Grid
    pub use halo_grid::{AxisSpec, BlockGeometry, BoundaryType, Geometry, Grid, GridError};

    // Boundary
    pub use halo_boundary::{check_nan, Boundary, BoundaryConfig, HaloExchange, NanReport};

    // Exchange
    pub use halo_exchange::{ChannelExchange, ChannelMesh};
}
