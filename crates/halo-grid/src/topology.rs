//! Cartesian process topology: rank numbering and neighbours.

use smallvec::SmallVec;

use halo_core::{Dir, Index3, Side};

/// Ranks laid out on a Cartesian lattice, `X1` varying fastest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartTopology {
    procs: Index3,
    wraps: [bool; 3],
}

impl CartTopology {
    /// Topology with `procs` ranks per axis; `wraps[a]` links the first
    /// and last rank along axis `a`.
    pub fn new(procs: Index3, wraps: [bool; 3]) -> Self {
        Self { procs, wraps }
    }

    /// Processes per axis.
    pub fn procs(&self) -> Index3 {
        self.procs
    }

    /// Total rank count.
    pub fn size(&self) -> usize {
        self.procs.iter().product()
    }

    /// Coordinates of `rank`.
    pub fn coords(&self, rank: usize) -> Option<Index3> {
        if rank >= self.size() {
            return None;
        }
        let [p0, p1, _] = self.procs;
        Some([rank % p0, (rank / p0) % p1, rank / (p0 * p1)])
    }

    /// Rank at `coords`.
    pub fn rank_of(&self, coords: Index3) -> Option<usize> {
        if (0..3).any(|a| coords[a] >= self.procs[a]) {
            return None;
        }
        let [p0, p1, _] = self.procs;
        Some(coords[0] + p0 * (coords[1] + p1 * coords[2]))
    }

    /// Rank across the `side` face of `rank` along `dir`, if any.
    pub fn neighbour(&self, rank: usize, dir: Dir, side: Side) -> Option<usize> {
        let mut c = self.coords(rank)?;
        let a = dir.index();
        let n = self.procs[a];
        c[a] = match side {
            Side::Left if c[a] > 0 => c[a] - 1,
            Side::Left if self.wraps[a] => n - 1,
            Side::Right if c[a] + 1 < n => c[a] + 1,
            Side::Right if self.wraps[a] => 0,
            _ => return None,
        };
        self.rank_of(c)
    }

    /// Every `(dir, side, neighbour)` of `rank` along decomposed axes.
    pub fn neighbours(&self, rank: usize) -> SmallVec<[(Dir, Side, usize); 6]> {
        let mut out = SmallVec::new();
        for dir in Dir::ALL {
            if self.procs[dir.index()] < 2 {
                continue;
            }
            for side in Side::BOTH {
                if let Some(nb) = self.neighbour(rank, dir, side) {
                    out.push((dir, side, nb));
                }
            }
        }
        out
    }
}
