//! ## llubench-core::alloc::stats
//! **Allocation statistics**
//!
//! The benchmark is single-threaded, so these are plain counters owned by
//! the allocator instance rather than process-wide atomics.

use serde::Serialize;

/// Counters maintained by [`super::SlabAllocator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocStats {
    allocated: u64,
    slabs: u64,
    bytes_reserved: u64,
}

impl AllocStats {
    /// Creates a new `AllocStats` instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_allocation(&mut self) {
        self.allocated += 1;
    }

    #[inline]
    pub(crate) fn record_slab(&mut self, bytes: usize) {
        self.slabs += 1;
        self.bytes_reserved += bytes as u64;
    }

    /// Number of elements handed out so far.
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    /// Number of slabs acquired from the system allocator.
    pub fn slabs(&self) -> u64 {
        self.slabs
    }

    /// Total bytes reserved across all slabs.
    pub fn bytes_reserved(&self) -> u64 {
        self.bytes_reserved
    }
}
