//! Direction, side and staging identifiers shared by every Halo layer.

use std::fmt;

/// A block index in axis order: `[i, j, k]`.
///
/// Arrays are stored with `i` varying fastest, but every index that
/// travels between modules uses this axis-ordered form so that code can
/// be written once for all three directions.
pub type Index3 = [usize; 3];

/// A spatial direction of the block.
///
/// Directions are processed in declaration order (`X1`, then `X2`, then
/// `X3`). Later directions rely on the ghost layers filled by earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dir {
    /// First axis (`i`): x, R or r depending on the geometry.
    X1,
    /// Second axis (`j`): y, z, phi or theta depending on the geometry.
    X2,
    /// Third axis (`k`): z or phi depending on the geometry.
    X3,
}

impl Dir {
    /// All three directions in processing order.
    pub const ALL: [Dir; 3] = [Dir::X1, Dir::X2, Dir::X3];

    /// Position of this direction in an [`Index3`].
    pub const fn index(self) -> usize {
        match self {
            Dir::X1 => 0,
            Dir::X2 => 1,
            Dir::X3 => 2,
        }
    }

    /// The direction at position `i`, if any.
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// The first `dims` directions, in processing order.
    pub fn active(dims: usize) -> impl Iterator<Item = Dir> {
        Self::ALL.into_iter().take(dims)
    }

    /// The unit offset along this direction.
    pub const fn unit(self) -> Index3 {
        match self {
            Dir::X1 => [1, 0, 0],
            Dir::X2 => [0, 1, 0],
            Dir::X3 => [0, 0, 1],
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{}", self.index() + 1)
    }
}

/// Which end of a direction a boundary sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Low-index end, ghosts before the interior.
    Left,
    /// High-index end, ghosts after the interior.
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// `0` for the left side, `1` for the right side.
    pub const fn offset(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// The opposite side.
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Where a quantity lives on the mesh.
///
/// A face-staged quantity has one more element than a cell-centered one
/// along its face axis and the same extent along the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Staging {
    /// Cell-centered.
    Cell,
    /// Face-centered, normal to the given direction.
    Face(Dir),
}

impl Staging {
    /// Extra elements this staging carries along `axis` (0 or 1).
    pub fn extra(self, axis: Dir) -> usize {
        match self {
            Staging::Face(d) if d == axis => 1,
            _ => 0,
        }
    }
}
