//! Global grid description, validation and block extraction.

use halo_core::{Dir, Index3};

use crate::block::{BlockAxis, BlockGeometry};
use crate::boundary::BoundaryType;
use crate::error::GridError;
use crate::geometry::Geometry;
use crate::topology::CartTopology;

// ── AxisSpec ───────────────────────────────────────────────────────

/// Uniform spacing along one axis of the whole domain.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisSpec {
    /// Domain start.
    pub start: f64,
    /// Domain end.
    pub end: f64,
    /// Interior cells across the whole domain.
    pub cells: usize,
    /// Ghost cells on each side of every block. Default: 2.
    ///
    /// At most the per-block cell count when either side is reflective
    /// or a polar axis.
    pub ghosts: usize,
    /// Boundary at the low-index end. Default: periodic.
    pub left: BoundaryType,
    /// Boundary at the high-index end. Default: periodic.
    pub right: BoundaryType,
    /// Processes sharing this axis. Default: 1.
    pub procs: usize,
}

impl AxisSpec {
    /// Periodic axis over `[start, end]` with `cells` interior cells.
    pub fn new(start: f64, end: f64, cells: usize) -> Self {
        Self {
            start,
            end,
            cells,
            ghosts: 2,
            left: BoundaryType::Periodic,
            right: BoundaryType::Periodic,
            procs: 1,
        }
    }

    /// Set the ghost-layer thickness.
    pub fn ghosts(mut self, ghosts: usize) -> Self {
        self.ghosts = ghosts;
        self
    }

    /// Set both boundary types.
    pub fn bounds(mut self, left: BoundaryType, right: BoundaryType) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Split the axis across `procs` processes.
    pub fn procs(mut self, procs: usize) -> Self {
        self.procs = procs;
        self
    }

    fn inactive() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
            cells: 1,
            ghosts: 0,
            left: BoundaryType::Periodic,
            right: BoundaryType::Periodic,
            procs: 1,
        }
    }

    fn validate(&self, dir: Dir) -> Result<(), GridError> {
        let invalid = |reason: String| GridError::InvalidAxis { dir, reason };
        // 1. Extent.
        if !(self.start.is_finite() && self.end.is_finite()) || self.end <= self.start {
            return Err(invalid(format!(
                "extent [{}, {}] is empty or not finite",
                self.start, self.end
            )));
        }
        // 2. Cell counts.
        if self.cells == 0 {
            return Err(invalid("at least one interior cell is required".to_string()));
        }
        if self.ghosts == 0 {
            return Err(invalid("at least one ghost cell is required".to_string()));
        }
        // 3. Decomposition.
        if self.procs == 0 || self.cells % self.procs != 0 {
            return Err(invalid(format!(
                "{} cells cannot be split evenly across {} processes",
                self.cells, self.procs
            )));
        }
        if self.procs > 1 && self.cells / self.procs < self.ghosts {
            return Err(invalid(format!(
                "{} cells per process is thinner than {} ghost layers",
                self.cells / self.procs,
                self.ghosts
            )));
        }
        // 4. Mirror sources stay inside the block's own interior.
        let mirrors = |b: BoundaryType| matches!(b, BoundaryType::Reflective | BoundaryType::Axis);
        if (mirrors(self.left) || mirrors(self.right)) && self.cells / self.procs < self.ghosts {
            return Err(invalid(format!(
                "{} ghost layers reach past {} cells mirrored at a wall or pole",
                self.ghosts,
                self.cells / self.procs
            )));
        }
        // 5. Wrapping boundaries come in pairs.
        if self.left.wraps() != self.right.wraps() {
            return Err(GridError::UnpairedBoundary { dir });
        }
        Ok(())
    }
}

// ── Grid ───────────────────────────────────────────────────────────

/// The whole computational domain, before decomposition.
///
/// # Examples
///
/// ```
/// use halo_core::Dir;
/// use halo_grid::{AxisSpec, BoundaryType, Geometry, Grid};
///
/// let grid = Grid::builder(Geometry::Cartesian, 2)
///     .axis(Dir::X1, AxisSpec::new(0.0, 1.0, 16).procs(2))
///     .axis(
///         Dir::X2,
///         AxisSpec::new(0.0, 2.0, 8).bounds(BoundaryType::Outflow, BoundaryType::Reflective),
///     )
///     .build()
///     .unwrap();
/// let block = grid.block([1, 0, 0]).unwrap();
/// assert_eq!(block.axis(Dir::X1).cells, 8);
/// assert_eq!(block.boundary(Dir::X1, halo_core::Side::Left), BoundaryType::Internal);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    geometry: Geometry,
    dims: usize,
    axes: [AxisSpec; 3],
}

impl Grid {
    /// Start describing a grid.
    pub fn builder(geometry: Geometry, dims: usize) -> GridBuilder {
        GridBuilder {
            geometry,
            dims,
            axes: [None, None, None],
        }
    }

    /// Coordinate system.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Active dimension count.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Specification of one axis.
    pub fn axis(&self, dir: Dir) -> &AxisSpec {
        &self.axes[dir.index()]
    }

    /// Processes per axis.
    pub fn procs(&self) -> Index3 {
        [self.axes[0].procs, self.axes[1].procs, self.axes[2].procs]
    }

    /// The Cartesian process topology, wrapping along periodic axes.
    pub fn topology(&self) -> CartTopology {
        CartTopology::new(
            self.procs(),
            [
                self.axes[0].left.wraps(),
                self.axes[1].left.wraps(),
                self.axes[2].left.wraps(),
            ],
        )
    }

    /// The block owned by the rank at `coords`.
    pub fn block(&self, coords: Index3) -> Result<BlockGeometry, GridError> {
        let procs = self.procs();
        if (0..3).any(|a| coords[a] >= procs[a]) {
            return Err(GridError::RankOutOfRange { coords, procs });
        }
        let axes = [
            BlockAxis::carve(&self.axes[0], coords[0]),
            BlockAxis::carve(&self.axes[1], coords[1]),
            BlockAxis::carve(&self.axes[2], coords[2]),
        ];
        Ok(BlockGeometry::new(self.geometry, self.dims, axes, coords))
    }

    /// The block of the first rank; the whole domain when undecomposed.
    pub fn single_block(&self) -> Result<BlockGeometry, GridError> {
        self.block([0, 0, 0])
    }
}

// ── GridBuilder ────────────────────────────────────────────────────

/// Builder for [`Grid`]. Every active axis must be configured.
#[derive(Clone, Debug)]
pub struct GridBuilder {
    geometry: Geometry,
    dims: usize,
    axes: [Option<AxisSpec>; 3],
}

impl GridBuilder {
    /// Configure one axis.
    pub fn axis(mut self, dir: Dir, spec: AxisSpec) -> Self {
        self.axes[dir.index()] = Some(spec);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Grid, GridError> {
        if !(1..=3).contains(&self.dims) {
            return Err(GridError::InvalidDims { dims: self.dims });
        }
        if self.dims > self.geometry.max_dims() {
            return Err(GridError::UnsupportedGeometry {
                geometry: self.geometry,
                dims: self.dims,
            });
        }
        let mut axes = [AxisSpec::inactive(), AxisSpec::inactive(), AxisSpec::inactive()];
        for dir in Dir::ALL {
            let active = dir.index() < self.dims;
            match (self.axes[dir.index()].clone(), active) {
                (Some(spec), true) => {
                    spec.validate(dir)?;
                    axes[dir.index()] = spec;
                }
                (None, true) => return Err(GridError::MissingAxis { dir }),
                (Some(_), false) => return Err(GridError::InactiveAxis { dir }),
                (None, false) => {}
            }
        }
        Ok(Grid {
            geometry: self.geometry,
            dims: self.dims,
            axes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::Side;
    use proptest::prelude::*;

    fn line(cells: usize, procs: usize) -> Result<Grid, GridError> {
        Grid::builder(Geometry::Cartesian, 1)
            .axis(Dir::X1, AxisSpec::new(0.0, 1.0, cells).procs(procs))
            .build()
    }

    #[test]
    fn inactive_axes_are_single_cells() {
        let block = line(8, 1).unwrap().single_block().unwrap();
        assert_eq!(block.shape(), [12, 1, 1]);
        assert_eq!(block.axis(Dir::X2).ghosts, 0);
        assert_eq!(block.area(Dir::X2), None);
    }

    #[test]
    fn ghost_coordinates_extend_uniformly() {
        let block = line(4, 1).unwrap().single_block().unwrap();
        let ax = block.axis(Dir::X1);
        assert!((ax.dx[0] - 0.25).abs() < 1e-15);
        assert!((ax.xl[0] + 0.5).abs() < 1e-15);
        assert!((ax.x[ax.beg()] - 0.125).abs() < 1e-15);
        assert!((ax.face(ax.total) - 1.5).abs() < 1e-15);
    }

    #[test]
    fn decomposed_blocks_get_internal_faces() {
        let grid = line(16, 4).unwrap();
        let first = grid.block([0, 0, 0]).unwrap();
        let middle = grid.block([2, 0, 0]).unwrap();
        let last = grid.block([3, 0, 0]).unwrap();
        assert_eq!(first.boundary(Dir::X1, Side::Left), BoundaryType::Periodic);
        assert_eq!(first.boundary(Dir::X1, Side::Right), BoundaryType::Internal);
        assert_eq!(middle.boundary(Dir::X1, Side::Left), BoundaryType::Internal);
        assert_eq!(last.boundary(Dir::X1, Side::Right), BoundaryType::Periodic);
        assert_eq!(middle.axis(Dir::X1).offset, 8);
        assert!((middle.axis(Dir::X1).x[2] - (8.5 / 16.0)).abs() < 1e-14);
        assert_eq!(middle.axis(Dir::X1).length(), 1.0);
    }

    #[test]
    fn rejects_uneven_split() {
        assert!(matches!(line(10, 4), Err(GridError::InvalidAxis { .. })));
    }

    #[test]
    fn rejects_unpaired_periodic() {
        let err = Grid::builder(Geometry::Cartesian, 1)
            .axis(
                Dir::X1,
                AxisSpec::new(0.0, 1.0, 8).bounds(BoundaryType::Periodic, BoundaryType::Outflow),
            )
            .build()
            .unwrap_err();
        assert_eq!(err, GridError::UnpairedBoundary { dir: Dir::X1 });
    }

    #[test]
    fn mirrored_axes_need_as_many_cells_as_ghosts() {
        let axis = |bound: BoundaryType, ghosts: usize| {
            Grid::builder(Geometry::Cartesian, 1)
                .axis(
                    Dir::X1,
                    AxisSpec::new(0.0, 1.0, 2).ghosts(ghosts).bounds(bound, BoundaryType::Outflow),
                )
                .build()
        };
        assert!(matches!(
            axis(BoundaryType::Reflective, 3),
            Err(GridError::InvalidAxis { dir: Dir::X1, .. })
        ));
        assert!(axis(BoundaryType::Reflective, 2).is_ok());
        // Copies from the boundary cell only, so thick ghosts are fine.
        assert!(axis(BoundaryType::Outflow, 3).is_ok());
    }

    #[test]
    fn rejects_missing_and_extra_axes() {
        let missing = Grid::builder(Geometry::Cartesian, 2)
            .axis(Dir::X1, AxisSpec::new(0.0, 1.0, 8))
            .build();
        assert_eq!(missing.unwrap_err(), GridError::MissingAxis { dir: Dir::X2 });
        let extra = Grid::builder(Geometry::Cartesian, 1)
            .axis(Dir::X1, AxisSpec::new(0.0, 1.0, 8))
            .axis(Dir::X3, AxisSpec::new(0.0, 1.0, 8))
            .build();
        assert_eq!(extra.unwrap_err(), GridError::InactiveAxis { dir: Dir::X3 });
    }

    #[test]
    fn cylindrical_is_limited_to_two_dimensions() {
        let err = Grid::builder(Geometry::Cylindrical, 3).build().unwrap_err();
        assert!(matches!(err, GridError::UnsupportedGeometry { dims: 3, .. }));
    }

    #[test]
    fn rank_out_of_range() {
        let grid = line(8, 2).unwrap();
        assert!(matches!(
            grid.block([2, 0, 0]),
            Err(GridError::RankOutOfRange { .. })
        ));
    }

    proptest! {
        #[test]
        fn blocks_tile_the_domain(cells_per in 2usize..10, procs in 1usize..5) {
            let grid = line(cells_per * procs, procs).unwrap();
            let mut covered = 0;
            for r in 0..procs {
                let block = grid.block([r, 0, 0]).unwrap();
                let ax = block.axis(Dir::X1);
                prop_assert_eq!(ax.offset, covered);
                let expected_start = covered as f64 / (cells_per * procs) as f64;
                prop_assert!((ax.xl[ax.beg()] - expected_start).abs() < 1e-12);
                covered += ax.cells;
            }
            prop_assert_eq!(covered, cells_per * procs);
        }
    }
}
