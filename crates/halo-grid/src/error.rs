//! Error types for grid construction and decomposition.

use std::fmt;

use halo_core::{Dir, Index3};

use crate::geometry::Geometry;

/// Errors arising from grid construction or block extraction.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A boundary-type name that matches no known boundary.
    UnknownBoundary {
        /// The unrecognised name.
        name: String,
    },
    /// A geometry name that matches no known coordinate system.
    UnknownGeometry {
        /// The unrecognised name.
        name: String,
    },
    /// Dimension count outside `1..=3`.
    InvalidDims {
        /// The requested count.
        dims: usize,
    },
    /// The coordinate system cannot carry this many dimensions.
    UnsupportedGeometry {
        /// The coordinate system.
        geometry: Geometry,
        /// The requested count.
        dims: usize,
    },
    /// An active axis was never configured.
    MissingAxis {
        /// The unconfigured direction.
        dir: Dir,
    },
    /// An axis was configured beyond the active dimensions.
    InactiveAxis {
        /// The extra direction.
        dir: Dir,
    },
    /// An axis specification is inconsistent.
    InvalidAxis {
        /// The offending direction.
        dir: Dir,
        /// What went wrong.
        reason: String,
    },
    /// A wrapping boundary (periodic or shearing-box) on one side only.
    UnpairedBoundary {
        /// The offending direction.
        dir: Dir,
    },
    /// Rank coordinates outside the process topology.
    RankOutOfRange {
        /// The requested coordinates.
        coords: Index3,
        /// Processes per axis.
        procs: Index3,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBoundary { name } => write!(f, "unknown boundary type '{name}'"),
            Self::UnknownGeometry { name } => write!(f, "unknown geometry '{name}'"),
            Self::InvalidDims { dims } => write!(f, "dims must be 1, 2 or 3, got {dims}"),
            Self::UnsupportedGeometry { geometry, dims } => {
                write!(f, "{geometry} geometry does not support {dims} dimensions")
            }
            Self::MissingAxis { dir } => write!(f, "active axis {dir} is not configured"),
            Self::InactiveAxis { dir } => {
                write!(f, "axis {dir} configured beyond the active dimensions")
            }
            Self::InvalidAxis { dir, reason } => write!(f, "invalid axis {dir}: {reason}"),
            Self::UnpairedBoundary { dir } => {
                write!(f, "wrapping boundary on {dir} must be set on both sides")
            }
            Self::RankOutOfRange { coords, procs } => {
                write!(f, "rank coordinates {coords:?} outside topology {procs:?}")
            }
        }
    }
}

impl std::error::Error for GridError {}
