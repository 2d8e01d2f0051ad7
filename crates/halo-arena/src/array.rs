//! Dense 3D and 4D arrays over a block.
//!
//! Storage is row-major with `i` varying fastest, then `j`, then `k`.
//! All indexing goes through [`Index3`] in axis order (`[i, j, k]`), so a
//! kernel written for one direction works for the others by permuting
//! the index, not the code.

use std::ops::{Index, IndexMut};

use halo_core::Index3;

/// Flat offset of `p` in an array of `shape`.
#[inline]
pub fn flat_offset(shape: Index3, p: Index3) -> usize {
    (p[2] * shape[1] + p[1]) * shape[0] + p[0]
}

/// Inverse of [`flat_offset`].
#[inline]
pub fn unflatten(shape: Index3, flat: usize) -> Index3 {
    let i = flat % shape[0];
    let rest = flat / shape[0];
    [i, rest % shape[1], rest / shape[1]]
}

/// A dense scalar array over `[ni, nj, nk]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Array3 {
    shape: Index3,
    data: Vec<f64>,
}

impl Array3 {
    /// Zero-filled array of the given shape.
    pub fn zeros(shape: Index3) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Array of the given shape with every element set to `value`.
    pub fn filled(shape: Index3, value: f64) -> Self {
        Self {
            shape,
            data: vec![value; shape.iter().product()],
        }
    }

    /// Array whose element at `p` is `f(p)`.
    pub fn from_fn(shape: Index3, mut f: impl FnMut(Index3) -> f64) -> Self {
        let len = shape.iter().product();
        let data = (0..len).map(|flat| f(unflatten(shape, flat))).collect();
        Self { shape, data }
    }

    /// Extent along each axis.
    pub fn shape(&self) -> Index3 {
        self.shape
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `p`, or `None` outside the array.
    pub fn get(&self, p: Index3) -> Option<f64> {
        if (0..3).all(|a| p[a] < self.shape[a]) {
            Some(self.data[flat_offset(self.shape, p)])
        } else {
            None
        }
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Flat view of the storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat view of the storage.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl Index<Index3> for Array3 {
    type Output = f64;

    #[inline]
    fn index(&self, p: Index3) -> &f64 {
        &self.data[flat_offset(self.shape, p)]
    }
}

impl IndexMut<Index3> for Array3 {
    #[inline]
    fn index_mut(&mut self, p: Index3) -> &mut f64 {
        let offset = flat_offset(self.shape, p);
        &mut self.data[offset]
    }
}

/// A stack of `nvar` scalar arrays sharing one shape: `V[var][k][j][i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Array4 {
    nvar: usize,
    shape: Index3,
    data: Vec<f64>,
}

impl Array4 {
    /// Zero-filled array with `nvar` variables.
    pub fn zeros(nvar: usize, shape: Index3) -> Self {
        Self {
            nvar,
            shape,
            data: vec![0.0; nvar * shape.iter().product::<usize>()],
        }
    }

    /// Number of variables.
    pub fn nvar(&self) -> usize {
        self.nvar
    }

    /// Spatial extent along each axis.
    pub fn shape(&self) -> Index3 {
        self.shape
    }

    fn stride(&self) -> usize {
        self.shape.iter().product()
    }

    /// Flat view of variable `n`.
    pub fn var(&self, n: usize) -> &[f64] {
        let s = self.stride();
        &self.data[n * s..(n + 1) * s]
    }

    /// Mutable flat view of variable `n`.
    pub fn var_mut(&mut self, n: usize) -> &mut [f64] {
        let s = self.stride();
        &mut self.data[n * s..(n + 1) * s]
    }

    /// Set every element of every variable to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Flat view of all variables.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, Index3)> for Array4 {
    type Output = f64;

    #[inline]
    fn index(&self, (n, p): (usize, Index3)) -> &f64 {
        &self.data[n * self.stride() + flat_offset(self.shape, p)]
    }
}

impl IndexMut<(usize, Index3)> for Array4 {
    #[inline]
    fn index_mut(&mut self, (n, p): (usize, Index3)) -> &mut f64 {
        let offset = n * self.stride() + flat_offset(self.shape, p);
        &mut self.data[offset]
    }
}
