//! Index windows: the exact box of indices a boundary pass touches.
//!
//! A window is three half-open ranges in axis order. The ghost window of
//! a face spans the ghost layer along the boundary direction and the full
//! staged extent (ghosts included) along the other two, so that edge and
//! corner ghosts are filled by whichever direction runs last.
//!
//! Windows are consumed by two primitives:
//!
//! - [`IndexWindow::gather`] evaluates an elementwise function over the
//!   window into a flat buffer. It runs in parallel with no ordering
//!   between elements.
//! - [`IndexWindow::scatter`] writes such a buffer back into an array.
//!
//! Keeping the two apart is what makes every boundary pass safe when its
//! sources overlap its destinations.

use std::ops::Range;

use rayon::prelude::*;

use halo_arena::flat_offset;
use halo_core::{Dir, Index3, Side, Staging};
use halo_grid::BlockGeometry;

/// A box of block indices, `[i, j, k]` ranges in axis order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexWindow {
    ranges: [Range<usize>; 3],
}

impl IndexWindow {
    /// Window from explicit ranges.
    pub fn new(ranges: [Range<usize>; 3]) -> Self {
        Self { ranges }
    }

    /// Every index of a quantity with the given staging.
    pub fn full(block: &BlockGeometry, staging: Staging) -> Self {
        let shape = block.staged_shape(staging);
        Self::new([0..shape[0], 0..shape[1], 0..shape[2]])
    }

    /// Interior indices of a quantity with the given staging. For a face
    /// staging this includes both boundary faces.
    pub fn interior(block: &BlockGeometry, staging: Staging) -> Self {
        let range = |d: Dir| {
            let ax = block.axis(d);
            ax.beg()..ax.end() + staging.extra(d)
        };
        Self::new([range(Dir::X1), range(Dir::X2), range(Dir::X3)])
    }

    /// Ghost region beyond the `side` face of `dir` for `staging`.
    ///
    /// For a face staging normal to `dir`, the boundary face itself
    /// belongs to the interior: the left window is `[0, ghosts)` and the
    /// right one is `[ghosts + cells + 1, total + 1)`.
    pub fn ghost(block: &BlockGeometry, dir: Dir, side: Side, staging: Staging) -> Self {
        let mut window = Self::full(block, staging);
        let ax = block.axis(dir);
        let g = ax.ghosts;
        let n = ax.cells + staging.extra(dir);
        window.ranges[dir.index()] = match side {
            Side::Left => 0..g,
            Side::Right => g + n..2 * g + n,
        };
        window
    }

    /// Range along `dir`.
    pub fn range(&self, dir: Dir) -> Range<usize> {
        self.ranges[dir.index()].clone()
    }

    /// Extent along each axis.
    pub fn extent(&self) -> Index3 {
        [
            self.ranges[0].len(),
            self.ranges[1].len(),
            self.ranges[2].len(),
        ]
    }

    /// Number of indices in the window.
    pub fn len(&self) -> usize {
        self.extent().iter().product()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `p` lies inside the window.
    pub fn contains(&self, p: Index3) -> bool {
        (0..3).all(|a| self.ranges[a].contains(&p[a]))
    }

    /// The `flat`-th index of the window, `i` varying fastest.
    #[inline]
    pub fn point(&self, flat: usize) -> Index3 {
        let [ni, nj, _] = self.extent();
        let i = flat % ni;
        let rest = flat / ni;
        [
            self.ranges[0].start + i,
            self.ranges[1].start + rest % nj,
            self.ranges[2].start + rest / nj,
        ]
    }

    /// Visit every index serially, `i` varying fastest.
    pub fn for_each(&self, mut f: impl FnMut(Index3)) {
        for k in self.ranges[2].clone() {
            for j in self.ranges[1].clone() {
                for i in self.ranges[0].clone() {
                    f([i, j, k]);
                }
            }
        }
    }

    /// Evaluate `f` at every index into `out`, in parallel.
    ///
    /// `out` must hold exactly [`len`](Self::len) elements; element `n`
    /// receives `f(self.point(n))`.
    pub fn gather<F>(&self, out: &mut [f64], f: F)
    where
        F: Fn(Index3) -> f64 + Sync + Send,
    {
        debug_assert_eq!(out.len(), self.len());
        out.par_iter_mut()
            .enumerate()
            .for_each(|(n, v)| *v = f(self.point(n)));
    }

    /// Write `values` (in [`gather`](Self::gather) order) into `target`,
    /// a flat array of `shape`.
    pub fn scatter(&self, target: &mut [f64], shape: Index3, values: &[f64]) {
        self.scatter_map(target, shape, values, |v| v);
    }

    /// Like [`scatter`](Self::scatter), applying `map` to each value.
    pub fn scatter_map(
        &self,
        target: &mut [f64],
        shape: Index3,
        values: &[f64],
        map: impl Fn(f64) -> f64,
    ) {
        let mut n = 0;
        self.for_each(|p| {
            target[flat_offset(shape, p)] = map(values[n]);
            n += 1;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_grid::{AxisSpec, Geometry, Grid};
    use proptest::prelude::*;

    fn block_2d(nx: usize, ny: usize, ghosts: usize) -> BlockGeometry {
        Grid::builder(Geometry::Cartesian, 2)
            .axis(Dir::X1, AxisSpec::new(0.0, 1.0, nx).ghosts(ghosts))
            .axis(Dir::X2, AxisSpec::new(0.0, 1.0, ny).ghosts(ghosts))
            .build()
            .unwrap()
            .single_block()
            .unwrap()
    }

    #[test]
    fn cell_ghost_windows() {
        let block = block_2d(8, 6, 2);
        let left = IndexWindow::ghost(&block, Dir::X1, Side::Left, Staging::Cell);
        let right = IndexWindow::ghost(&block, Dir::X1, Side::Right, Staging::Cell);
        assert_eq!(left.range(Dir::X1), 0..2);
        assert_eq!(right.range(Dir::X1), 10..12);
        assert_eq!(left.range(Dir::X2), 0..10);
        assert_eq!(left.range(Dir::X3), 0..1);
    }

    #[test]
    fn normal_face_windows_skip_boundary_faces() {
        let block = block_2d(8, 6, 2);
        let s = Staging::Face(Dir::X1);
        let left = IndexWindow::ghost(&block, Dir::X1, Side::Left, s);
        let right = IndexWindow::ghost(&block, Dir::X1, Side::Right, s);
        assert_eq!(left.range(Dir::X1), 0..2);
        assert_eq!(right.range(Dir::X1), 11..13);
        assert!(!left.contains([2, 0, 0]));
        assert!(!right.contains([10, 0, 0]));
    }

    #[test]
    fn tangential_face_windows_widen_their_own_axis() {
        let block = block_2d(8, 6, 2);
        let w = IndexWindow::ghost(&block, Dir::X1, Side::Right, Staging::Face(Dir::X2));
        assert_eq!(w.range(Dir::X1), 10..12);
        assert_eq!(w.range(Dir::X2), 0..11);
    }

    #[test]
    fn interior_face_window_includes_both_faces() {
        let block = block_2d(8, 6, 2);
        let w = IndexWindow::interior(&block, Staging::Face(Dir::X2));
        assert_eq!(w.range(Dir::X2), 2..9);
        assert_eq!(w.range(Dir::X1), 2..10);
    }

    #[test]
    fn gather_then_scatter_writes_only_the_window() {
        let block = block_2d(4, 4, 1);
        let shape = block.shape();
        let w = IndexWindow::ghost(&block, Dir::X2, Side::Left, Staging::Cell);
        let mut data = vec![-1.0; shape.iter().product()];
        let mut buf = vec![0.0; w.len()];
        w.gather(&mut buf, |p| (p[0] + 10 * p[1]) as f64);
        w.scatter(&mut data, shape, &buf);
        for k in 0..shape[2] {
            for j in 0..shape[1] {
                for i in 0..shape[0] {
                    let v = data[flat_offset(shape, [i, j, k])];
                    if j == 0 {
                        assert_eq!(v, i as f64);
                    } else {
                        assert_eq!(v, -1.0);
                    }
                }
            }
        }
    }

    proptest! {
        #[test]
        fn point_enumerates_for_each_order(nx in 1usize..6, ny in 1usize..6, g in 1usize..3) {
            let block = block_2d(nx, ny, g);
            for side in Side::BOTH {
                let w = IndexWindow::ghost(&block, Dir::X2, side, Staging::Face(Dir::X1));
                let mut seen = Vec::new();
                w.for_each(|p| seen.push(p));
                prop_assert_eq!(seen.len(), w.len());
                for (n, p) in seen.iter().enumerate() {
                    prop_assert_eq!(w.point(n), *p);
                    prop_assert!(w.contains(*p));
                }
            }
        }

        #[test]
        fn ghost_windows_lie_inside_the_staged_array(nx in 1usize..8, g in 1usize..4) {
            let block = block_2d(nx, nx, g);
            for dir in [Dir::X1, Dir::X2] {
                for staging in [Staging::Cell, Staging::Face(Dir::X1), Staging::Face(Dir::X2)] {
                    let shape = block.staged_shape(staging);
                    for side in Side::BOTH {
                        let w = IndexWindow::ghost(&block, dir, side, staging);
                        prop_assert_eq!(w.range(dir).len(), g);
                        for a in 0..3 {
                            prop_assert!(w.ranges[a].end <= shape[a]);
                        }
                    }
                }
            }
        }
    }
}
