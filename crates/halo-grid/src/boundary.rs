//! Boundary-type tags attached to each face of a block.

use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// How the ghost cells beyond one face of a block are filled.
///
/// The set is closed: boundary dispatch matches on it exhaustively, and
/// names that match no variant are rejected when parsed.
///
/// # Examples
///
/// ```
/// use halo_grid::BoundaryType;
///
/// let b: BoundaryType = "shearingbox".parse().unwrap();
/// assert_eq!(b, BoundaryType::ShearingBox);
/// assert!("sticky".parse::<BoundaryType>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryType {
    /// Face shared with another rank; ghosts come from the halo exchange.
    Internal,
    /// Ghosts wrap around to the opposite end of the domain.
    Periodic,
    /// Ghosts mirror the interior; normal components change sign.
    Reflective,
    /// Ghosts copy the last interior cell; inflow is suppressed.
    Outflow,
    /// Periodic in the shear direction with a time-dependent shift.
    ShearingBox,
    /// Coordinate pole of a spherical grid.
    Axis,
    /// Filled by an enrolled user callback.
    UserDef,
}

impl BoundaryType {
    /// Every boundary type.
    pub const ALL: [BoundaryType; 7] = [
        BoundaryType::Internal,
        BoundaryType::Periodic,
        BoundaryType::Reflective,
        BoundaryType::Outflow,
        BoundaryType::ShearingBox,
        BoundaryType::Axis,
        BoundaryType::UserDef,
    ];

    /// Canonical lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            BoundaryType::Internal => "internal",
            BoundaryType::Periodic => "periodic",
            BoundaryType::Reflective => "reflective",
            BoundaryType::Outflow => "outflow",
            BoundaryType::ShearingBox => "shearingbox",
            BoundaryType::Axis => "axis",
            BoundaryType::UserDef => "userdef",
        }
    }

    /// Whether the domain wraps around through this face, so that a
    /// decomposed axis links its first and last ranks.
    pub const fn wraps(self) -> bool {
        matches!(self, BoundaryType::Periodic | BoundaryType::ShearingBox)
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| GridError::UnknownBoundary { name: s.to_string() })
    }
}
