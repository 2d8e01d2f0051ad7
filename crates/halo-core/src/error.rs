//! Error types for boundary enforcement.
//!
//! Every variant is fatal to the run: boundary enforcement is
//! deterministic, so a retry cannot change the outcome. Numerical
//! anomalies (NaNs) are not errors; they are reported by the diagnostic
//! scan instead.

use std::error::Error;
use std::fmt;

use crate::id::{Dir, Side};

/// Which enrolled callback a [`BoundaryError::MissingCallback`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    /// The user-defined ghost fill.
    UserDefined,
    /// The flux-boundary fill.
    Flux,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserDefined => f.write_str("user-defined boundary"),
            Self::Flux => f.write_str("flux boundary"),
        }
    }
}

/// Errors arising from boundary configuration or enforcement.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryError {
    /// A face selected a callback-driven boundary with nothing enrolled.
    MissingCallback {
        /// The missing callback.
        hook: HookKind,
        /// Direction being enforced.
        dir: Dir,
        /// Side being enforced.
        side: Side,
    },
    /// Shearing-box selected on a direction other than `X1`.
    ShearingBoxAxis {
        /// The offending direction.
        dir: Dir,
    },
    /// Shearing-box with the cross-stream direction split across ranks.
    ShearingBoxDecomposed {
        /// Process count along `X2`.
        procs: usize,
    },
    /// Shearing-box requested on a block that cannot carry it.
    InvalidShearingBox {
        /// What went wrong.
        reason: String,
    },
    /// Axis boundary requested where no polar axis exists.
    InvalidAxis {
        /// What went wrong.
        reason: String,
    },
    /// A direction is decomposed but no halo exchange was provided.
    MissingExchange {
        /// The decomposed direction.
        dir: Dir,
        /// Process count along it.
        procs: usize,
    },
    /// The halo exchange failed.
    Exchange {
        /// Direction being exchanged.
        dir: Dir,
        /// What went wrong.
        reason: String,
    },
    /// A state array does not have the shape the block requires.
    ShapeMismatch {
        /// Which array.
        what: String,
        /// Expected `[ni, nj, nk]`.
        expected: [usize; 3],
        /// Actual `[ni, nj, nk]`.
        found: [usize; 3],
    },
    /// The physics capability is inconsistent.
    InvalidPhysics {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCallback { hook, dir, side } => {
                write!(f, "{hook} selected on {dir} {side} but no callback is enrolled")
            }
            Self::ShearingBoxAxis { dir } => {
                write!(f, "shearing-box boundary is only valid along X1, not {dir}")
            }
            Self::ShearingBoxDecomposed { procs } => {
                write!(
                    f,
                    "shearing-box boundary requires an undecomposed X2 axis, found {procs} processes"
                )
            }
            Self::InvalidShearingBox { reason } => {
                write!(f, "invalid shearing-box boundary: {reason}")
            }
            Self::InvalidAxis { reason } => write!(f, "invalid axis boundary: {reason}"),
            Self::MissingExchange { dir, procs } => {
                write!(
                    f,
                    "{dir} is split across {procs} processes but no halo exchange is configured"
                )
            }
            Self::Exchange { dir, reason } => {
                write!(f, "halo exchange along {dir} failed: {reason}")
            }
            Self::ShapeMismatch {
                what,
                expected,
                found,
            } => {
                write!(f, "{what} has shape {found:?}, expected {expected:?}")
            }
            Self::InvalidPhysics { reason } => write!(f, "invalid physics: {reason}"),
        }
    }
}

impl Error for BoundaryError {}
