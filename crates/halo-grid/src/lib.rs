//! Grid geometry for the Halo boundary layer.
//!
//! A [`Grid`] describes the whole domain: coordinate system, uniform
//! spacing per axis, boundary types and the process count per axis. Each
//! rank works on a [`BlockGeometry`] carved out of it, which adds ghost
//! layers, tags faces shared with other ranks as
//! [`BoundaryType::Internal`] and precomputes the face areas used by
//! divergence-preserving reconstruction.
//!
//! # Coordinate systems
//!
//! - [`Geometry::Cartesian`]
//! - [`Geometry::Cylindrical`] (axisymmetric R, z)
//! - [`Geometry::Polar`]
//! - [`Geometry::Spherical`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod boundary;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod topology;

pub use block::{BlockAxis, BlockGeometry};
pub use boundary::BoundaryType;
pub use error::GridError;
pub use geometry::{is_full_turn, Geometry};
pub use grid::{AxisSpec, Grid, GridBuilder};
pub use topology::CartTopology;
