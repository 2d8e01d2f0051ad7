//! Ghost-cell boundary enforcement for Halo blocks.
//!
//! [`Boundary`] fills the ghost layers of a [`FieldState`](halo_arena::FieldState)
//! direction by direction: rank exchange through a [`HaloExchange`], then
//! the local fill selected by each face's boundary type, then the rebuild
//! of the normal magnetic field so that ghost cells stay divergence-free.
//!
//! The individual passes are public so that drivers with their own
//! ordering can call them directly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod axis;
pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod exchange;
pub mod fill;
pub mod hooks;
pub mod reconcile;
pub mod shearing;
pub mod window;

pub use axis::AxisBoundary;
pub use boundary::Boundary;
pub use config::BoundaryConfig;
pub use diagnostics::{check_nan, NanLocation, NanReport};
pub use exchange::{pack_slab, slab_len, unpack_slab, HaloExchange};
pub use hooks::{BoundaryHooks, FluxBoundaryFn, InternalBoundaryFn, UserBoundaryFn};
pub use shearing::{enforce_shearing_box, ShearShift};
pub use window::IndexWindow;
