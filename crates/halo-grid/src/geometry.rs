//! Coordinate systems and their face-area metrics.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use halo_core::{Dir, Index3};

use crate::block::BlockAxis;
use crate::error::GridError;

/// The coordinate system a grid is laid out in.
///
/// | geometry | X1 | X2 | X3 |
/// |---|---|---|---|
/// | `Cartesian` | x | y | z |
/// | `Cylindrical` | R | z | (none) |
/// | `Polar` | R | phi | z |
/// | `Spherical` | r | theta | phi |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Geometry {
    /// Flat Cartesian coordinates.
    Cartesian,
    /// Axisymmetric (R, z); at most two dimensions.
    Cylindrical,
    /// (R, phi, z).
    Polar,
    /// (r, theta, phi).
    Spherical,
}

impl Geometry {
    /// Canonical lower-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Geometry::Cartesian => "cartesian",
            Geometry::Cylindrical => "cylindrical",
            Geometry::Polar => "polar",
            Geometry::Spherical => "spherical",
        }
    }

    /// Largest dimension count this coordinate system supports.
    pub const fn max_dims(self) -> usize {
        match self {
            Geometry::Cylindrical => 2,
            _ => 3,
        }
    }

    /// Direction along which the azimuthal angle runs, if any.
    pub const fn azimuth(self) -> Option<Dir> {
        match self {
            Geometry::Polar => Some(Dir::X2),
            Geometry::Spherical => Some(Dir::X3),
            _ => None,
        }
    }

    /// Area of a face normal to `dir`.
    ///
    /// `p[dir]` is a face index (`0..=total`), the other two entries are
    /// cell indices. Areas are taken as absolute values so that ghost
    /// cells reaching past a coordinate pole keep a positive metric.
    pub fn face_area(self, dir: Dir, axes: &[BlockAxis; 3], p: Index3) -> f64 {
        let [a1, a2, a3] = axes;
        let [i, j, k] = p;
        match (self, dir) {
            (Geometry::Cartesian, Dir::X1) => a2.dx[j] * a3.dx[k],
            (Geometry::Cartesian, Dir::X2) => a1.dx[i] * a3.dx[k],
            (Geometry::Cartesian, Dir::X3) => a1.dx[i] * a2.dx[j],

            (Geometry::Cylindrical, Dir::X1) => a1.face(i).abs() * a2.dx[j],
            (Geometry::Cylindrical, Dir::X2) => a1.x[i].abs() * a1.dx[i],
            (Geometry::Cylindrical, Dir::X3) => a1.dx[i] * a2.dx[j],

            (Geometry::Polar, Dir::X1) => a1.face(i).abs() * a2.dx[j] * a3.dx[k],
            (Geometry::Polar, Dir::X2) => a1.dx[i] * a3.dx[k],
            (Geometry::Polar, Dir::X3) => a1.x[i].abs() * a1.dx[i] * a2.dx[j],

            (Geometry::Spherical, Dir::X1) => {
                let r = a1.face(i);
                r * r * (a2.xl[j].cos() - a2.xr[j].cos()).abs() * a3.dx[k]
            }
            (Geometry::Spherical, Dir::X2) => {
                let shell = 0.5 * (a1.xr[i] * a1.xr[i] - a1.xl[i] * a1.xl[i]).abs();
                shell * a2.face(j).sin().abs() * a3.dx[k]
            }
            (Geometry::Spherical, Dir::X3) => {
                0.5 * (a1.xr[i] * a1.xr[i] - a1.xl[i] * a1.xl[i]).abs() * a2.dx[j]
            }
        }
    }
}

/// Whether `extent` covers a full turn.
pub fn is_full_turn(extent: f64) -> bool {
    (extent - 2.0 * PI).abs() < 1e-10
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Geometry {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Geometry::Cartesian,
            Geometry::Cylindrical,
            Geometry::Polar,
            Geometry::Spherical,
        ]
        .into_iter()
        .find(|g| g.name() == s)
        .ok_or_else(|| GridError::UnknownGeometry { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_geometry() {
        assert_eq!("polar".parse::<Geometry>().unwrap(), Geometry::Polar);
        assert!("toroidal".parse::<Geometry>().is_err());
    }

    #[test]
    fn full_turn_tolerance() {
        assert!(is_full_turn(2.0 * PI));
        assert!(is_full_turn(2.0 * PI + 1e-12));
        assert!(!is_full_turn(PI));
    }

    #[test]
    fn cylindrical_is_two_dimensional() {
        assert_eq!(Geometry::Cylindrical.max_dims(), 2);
        assert_eq!(Geometry::Spherical.azimuth(), Some(Dir::X3));
    }
}
