//! ## llubench-core::alloc::slab
//! **Bump-pointer slab allocator**
//!
//! Elements are carved out of slabs holding exactly [`SLAB_CAPACITY`]
//! elements each. The element size is used as-is for the stride, without
//! rounding it up to any alignment, and the slab capacity is odd, so
//! consecutive allocations do not line up with page or cache-line
//! boundaries.

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::mem::align_of;
use std::ptr::NonNull;

use tracing::trace;

use super::stats::AllocStats;
use crate::element::{ElementHeader, ElementPtr, MIN_ELEMENT_SIZE};
use crate::error::BenchError;
use crate::trace::TraceSink;

/// Elements per slab.
pub const SLAB_CAPACITY: usize = 127;

struct Slab {
    base: NonNull<u8>,
    layout: Layout,
}

impl Slab {
    fn new(layout: Layout) -> Self {
        // SAFETY: `layout` has a non-zero size (checked in `SlabAllocator::new`).
        let ptr = unsafe { alloc_zeroed(layout) };
        match NonNull::new(ptr) {
            Some(base) => Self { base, layout },
            None => handle_alloc_error(layout),
        }
    }
}

impl Drop for Slab {
    fn drop(&mut self) {
        // SAFETY: `base` was allocated with exactly this layout.
        unsafe { dealloc(self.base.as_ptr(), self.layout) }
    }
}

/// Hands out fixed-size, zero-initialised elements and never frees them.
pub struct SlabAllocator {
    element_size: usize,
    slab_layout: Layout,
    slabs: Vec<Slab>,
    next_free: usize,
    stats: AllocStats,
}

impl SlabAllocator {
    /// Creates an allocator for elements of `element_size` bytes.
    ///
    /// No memory is reserved until the first allocation.
    pub fn new(element_size: usize) -> Result<Self, BenchError> {
        if element_size <= MIN_ELEMENT_SIZE {
            return Err(BenchError::Precondition(format!(
                "element size {element_size} must be larger than {MIN_ELEMENT_SIZE} bytes"
            )));
        }
        let slab_layout = SLAB_CAPACITY
            .checked_mul(element_size)
            .and_then(|bytes| Layout::from_size_align(bytes, align_of::<ElementHeader>()).ok())
            .ok_or_else(|| {
                BenchError::Precondition(format!("element size {element_size} is too large"))
            })?;

        Ok(Self {
            element_size,
            slab_layout,
            slabs: Vec::new(),
            next_free: SLAB_CAPACITY,
            stats: AllocStats::new(),
        })
    }

    /// Allocates one element, recording its address in the allocation stream.
    ///
    /// Running out of memory aborts the process through
    /// [`handle_alloc_error`].
    pub fn allocate<T: TraceSink>(&mut self, sink: &mut T) -> Result<ElementPtr, BenchError> {
        if self.next_free == SLAB_CAPACITY {
            self.slabs.push(Slab::new(self.slab_layout));
            self.stats.record_slab(self.slab_layout.size());
            self.next_free = 0;
            trace!(slabs = self.slabs.len(), "acquired slab");
        }

        let base = match self.slabs.last() {
            Some(slab) => slab.base,
            None => unreachable!("a slab is pushed whenever the cursor is exhausted"),
        };
        // SAFETY: `next_free < SLAB_CAPACITY`, so the offset stays inside the
        // slab and leaves at least `element_size` bytes after it.
        let element = unsafe {
            let raw = base.as_ptr().add(self.next_free * self.element_size);
            ElementPtr::from_raw(NonNull::new_unchecked(raw))
        };
        self.next_free += 1;
        self.stats.record_allocation();

        sink.record_alloc(element.addr())?;
        Ok(element)
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn stats(&self) -> AllocStats {
        self.stats
    }

    /// Total number of elements handed out.
    pub fn num_allocated(&self) -> u64 {
        self.stats.allocated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{MemoryTrace, NullTrace};

    #[test]
    fn test_slab_allocator_rejects_small_elements() {
        assert!(matches!(
            SlabAllocator::new(MIN_ELEMENT_SIZE),
            Err(BenchError::Precondition(_))
        ));
        assert!(SlabAllocator::new(MIN_ELEMENT_SIZE + 1).is_ok());
    }

    #[test]
    fn test_slab_allocator_rejects_overflowing_slab() {
        assert!(matches!(
            SlabAllocator::new(usize::MAX / 2),
            Err(BenchError::Precondition(_))
        ));
    }

    #[test]
    fn test_slab_allocator_is_lazy() {
        let alloc = SlabAllocator::new(64).unwrap();
        assert_eq!(alloc.stats().slabs(), 0);
        assert_eq!(alloc.num_allocated(), 0);
    }

    #[test]
    fn test_slab_allocator_strides_by_element_size() {
        let mut alloc = SlabAllocator::new(37).unwrap();
        let mut trace = NullTrace;
        let first = alloc.allocate(&mut trace).unwrap();
        let second = alloc.allocate(&mut trace).unwrap();
        assert_eq!(second.addr() - first.addr(), 37);
    }

    #[test]
    fn test_slab_allocator_elements_start_zeroed() {
        let mut alloc = SlabAllocator::new(24).unwrap();
        let element = alloc.allocate(&mut NullTrace).unwrap();
        assert_eq!(element.count(), 0);
        assert_eq!(element.next(), None);
    }

    #[test]
    fn test_slab_allocator_rolls_over_to_new_slab() {
        let mut alloc = SlabAllocator::new(64).unwrap();
        let mut trace = NullTrace;
        for _ in 0..SLAB_CAPACITY {
            alloc.allocate(&mut trace).unwrap();
        }
        assert_eq!(alloc.stats().slabs(), 1);

        alloc.allocate(&mut trace).unwrap();
        let stats = alloc.stats();
        assert_eq!(stats.slabs(), 2);
        assert_eq!(stats.allocated(), SLAB_CAPACITY as u64 + 1);
        assert_eq!(stats.bytes_reserved(), 2 * (SLAB_CAPACITY * 64) as u64);
    }

    #[test]
    fn test_slab_allocator_records_every_allocation() {
        let mut alloc = SlabAllocator::new(32).unwrap();
        let mut trace = MemoryTrace::default();
        let addrs: Vec<usize> = (0..5)
            .map(|_| alloc.allocate(&mut trace).unwrap().addr())
            .collect();
        assert_eq!(trace.allocations(), addrs.as_slice());
        assert!(trace.accesses().is_empty());
    }
}
