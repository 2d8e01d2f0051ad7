//! Reusable scratch space for double-buffered boundary passes.
//!
//! [`ScratchRegion`] is a bump allocator over a `Vec<f64>`. Boundary
//! kernels that must not read and write the live array in the same pass
//! (the shearing-box remap above all) compute into a scratch slab first,
//! then copy it back. The backing allocation is reused across calls.

/// Bump-allocated scratch space for ghost-slab sized temporaries.
///
/// Unlike a zeroing allocator, slabs handed out here have unspecified
/// contents: every user writes a slab completely before reading it.
pub struct ScratchRegion {
    /// Backing storage. Grows on demand, never shrinks.
    data: Vec<f64>,
    /// Number of f64 elements handed out since the last reset.
    cursor: usize,
}

impl ScratchRegion {
    /// Create a scratch region with the given initial capacity (in f64 elements).
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            data: vec![0.0; initial_capacity],
            cursor: 0,
        }
    }

    /// Allocate `len` elements after any live allocation.
    pub fn alloc(&mut self, len: usize) -> &mut [f64] {
        let start = self.cursor;
        let end = start + len;
        if end > self.data.len() {
            let new_cap = end.max(self.data.len() * 2);
            self.data.resize(new_cap, 0.0);
        }
        self.cursor = end;
        &mut self.data[start..end]
    }

    /// Reset and hand out a single slab of `len` elements.
    pub fn slab(&mut self, len: usize) -> &mut [f64] {
        self.reset();
        self.alloc(len)
    }

    /// Release every allocation. Storage is kept.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Number of elements currently allocated.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity of the backing storage in elements.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f64>()
    }
}

impl Default for ScratchRegion {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_allocs_dont_overlap() {
        let mut scratch = ScratchRegion::new(16);
        let a = scratch.alloc(5);
        a.fill(1.0);
        let a_ptr = a.as_ptr();
        let b = scratch.alloc(3);
        b.fill(2.0);
        assert_ne!(a_ptr, b.as_ptr());
        assert_eq!(scratch.used(), 8);
    }

    #[test]
    fn grows_beyond_initial_capacity() {
        let mut scratch = ScratchRegion::new(4);
        let s = scratch.alloc(100);
        assert_eq!(s.len(), 100);
        assert!(scratch.capacity() >= 100);
        assert_eq!(scratch.memory_bytes(), scratch.capacity() * 8);
    }

    #[test]
    fn slab_resets_and_reuses_storage() {
        let mut scratch = ScratchRegion::new(64);
        scratch.alloc(40);
        let cap = scratch.capacity();
        let s = scratch.slab(32);
        assert_eq!(s.len(), 32);
        assert_eq!(scratch.used(), 32);
        assert_eq!(scratch.capacity(), cap);
    }

    #[test]
    fn zero_length_alloc() {
        let mut scratch = ScratchRegion::default();
        assert!(scratch.alloc(0).is_empty());
        assert_eq!(scratch.used(), 0);
    }
}
