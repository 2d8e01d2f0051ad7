//! The rank-local view of a grid: extents, coordinates, boundary tags
//! and face areas of one block, ghosts included.

use halo_arena::{staged_shape, Array3};
use halo_core::{Dir, Index3, Side, Staging};

use crate::boundary::BoundaryType;
use crate::geometry::{is_full_turn, Geometry};
use crate::grid::AxisSpec;

/// One axis of a block.
///
/// Cell arrays (`x`, `xl`, `xr`, `dx`) have `total` entries: `ghosts`
/// cells on each side of `cells` interior cells. On inactive axes
/// `cells == 1` and `ghosts == 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockAxis {
    /// Interior cell count on this block.
    pub cells: usize,
    /// Ghost cells on each side.
    pub ghosts: usize,
    /// `cells + 2 * ghosts`.
    pub total: usize,
    /// Boundary type at the low-index end.
    pub left: BoundaryType,
    /// Boundary type at the high-index end.
    pub right: BoundaryType,
    /// Processes sharing this axis.
    pub procs: usize,
    /// Global index of the first interior cell (ghosts excluded).
    pub offset: usize,
    /// Interior cell count of the whole domain.
    pub global_cells: usize,
    /// Domain start and end (whole grid, not this block).
    pub domain: (f64, f64),
    /// Cell centers.
    pub x: Vec<f64>,
    /// Left cell faces.
    pub xl: Vec<f64>,
    /// Right cell faces.
    pub xr: Vec<f64>,
    /// Cell widths.
    pub dx: Vec<f64>,
}

impl BlockAxis {
    /// Carve the slice of `spec` owned by the rank at `coord` along this axis.
    pub(crate) fn carve(spec: &AxisSpec, coord: usize) -> Self {
        let cells = spec.cells / spec.procs;
        let ghosts = spec.ghosts;
        let total = cells + 2 * ghosts;
        let dx = (spec.end - spec.start) / spec.cells as f64;
        let offset = coord * cells;
        let start = spec.start + offset as f64 * dx;
        let xl: Vec<f64> = (0..total)
            .map(|c| start + (c as f64 - ghosts as f64) * dx)
            .collect();
        let xr: Vec<f64> = xl.iter().map(|l| l + dx).collect();
        let x = xl.iter().map(|l| l + 0.5 * dx).collect();
        let left = if coord > 0 {
            BoundaryType::Internal
        } else {
            spec.left
        };
        let right = if coord + 1 < spec.procs {
            BoundaryType::Internal
        } else {
            spec.right
        };
        Self {
            cells,
            ghosts,
            total,
            left,
            right,
            procs: spec.procs,
            offset,
            global_cells: spec.cells,
            domain: (spec.start, spec.end),
            x,
            xl,
            xr,
            dx: vec![dx; total],
        }
    }

    /// First interior index.
    pub fn beg(&self) -> usize {
        self.ghosts
    }

    /// One past the last interior index.
    pub fn end(&self) -> usize {
        self.ghosts + self.cells
    }

    /// Boundary type on `side`.
    pub fn bound(&self, side: Side) -> BoundaryType {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Position of face `f` (`0..=total`).
    pub fn face(&self, f: usize) -> f64 {
        if f < self.total {
            self.xl[f]
        } else {
            self.xr[self.total - 1]
        }
    }

    /// Length of the whole domain along this axis.
    pub fn length(&self) -> f64 {
        self.domain.1 - self.domain.0
    }
}

/// Geometry of one block, as seen by boundary enforcement.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockGeometry {
    geometry: Geometry,
    dims: usize,
    axes: [BlockAxis; 3],
    areas: Vec<Array3>,
    rank_coords: Index3,
}

impl BlockGeometry {
    pub(crate) fn new(
        geometry: Geometry,
        dims: usize,
        axes: [BlockAxis; 3],
        rank_coords: Index3,
    ) -> Self {
        let cells = [axes[0].total, axes[1].total, axes[2].total];
        let areas = Dir::active(dims)
            .map(|d| {
                Array3::from_fn(staged_shape(cells, Staging::Face(d)), |p| {
                    geometry.face_area(d, &axes, p)
                })
            })
            .collect();
        Self {
            geometry,
            dims,
            axes,
            areas,
            rank_coords,
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

    /// One axis.
    pub fn axis(&self, dir: Dir) -> &BlockAxis {
        &self.axes[dir.index()]
    }

    /// All three axes.
    pub fn axes(&self) -> &[BlockAxis; 3] {
        &self.axes
    }

    /// Cell-centered shape, ghosts included.
    pub fn shape(&self) -> Index3 {
        [self.axes[0].total, self.axes[1].total, self.axes[2].total]
    }

    /// Shape of a quantity with the given staging.
    pub fn staged_shape(&self, staging: Staging) -> Index3 {
        staged_shape(self.shape(), staging)
    }

    /// Boundary type of one face.
    pub fn boundary(&self, dir: Dir, side: Side) -> BoundaryType {
        self.axis(dir).bound(side)
    }

    /// Processes sharing `dir`.
    pub fn procs(&self, dir: Dir) -> usize {
        self.axis(dir).procs
    }

    /// Whether `dir` is split across ranks.
    pub fn is_decomposed(&self, dir: Dir) -> bool {
        self.procs(dir) > 1
    }

    /// Face areas normal to `dir`, staged like the face field.
    pub fn area(&self, dir: Dir) -> Option<&Array3> {
        self.areas.get(dir.index())
    }

    /// Cartesian coordinates of this block's rank.
    pub fn rank_coords(&self) -> Index3 {
        self.rank_coords
    }

    /// Whether the azimuthal direction spans a full turn.
    pub fn is_full_turn(&self) -> bool {
        self.geometry
            .azimuth()
            .is_some_and(|d| is_full_turn(self.axis(d).length()))
    }

    /// Physical position of cell `p`, with inactive axes at their centers.
    pub fn position(&self, p: Index3) -> [f64; 3] {
        [
            self.axes[0].x[p[0]],
            self.axes[1].x[p[1]],
            self.axes[2].x[p[2]],
        ]
    }
}
