//! ## llubench-core::element
//! **List element layout inside slab memory**
//!
//! Every element starts with an [`ElementHeader`] (forward link + counter);
//! the rest of the configured element size is padding. Elements are placed at
//! `slab_base + offset * element_size` with no rounding, so a header may sit
//! at any byte address. All header accesses therefore go through unaligned
//! raw-pointer reads and writes.

use std::mem::size_of;
use std::ptr::{self, NonNull};

#[repr(C)]
pub(crate) struct ElementHeader {
    next: *mut ElementHeader,
    count: u32,
}

/// Bytes taken by the element header. The configured element size must be
/// strictly larger than this.
pub const MIN_ELEMENT_SIZE: usize = size_of::<ElementHeader>();

/// Handle to an element carved out of a slab.
///
/// Handles are only created by [`crate::alloc::SlabAllocator`] and are only
/// dereferenced by code that also holds the allocator, which keeps the slab
/// memory alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementPtr(NonNull<ElementHeader>);

impl ElementPtr {
    /// # Safety
    ///
    /// `raw` must point to at least `MIN_ELEMENT_SIZE` bytes of initialised
    /// slab memory that outlives every use of the returned handle.
    #[inline]
    pub(crate) unsafe fn from_raw(raw: NonNull<u8>) -> Self {
        Self(raw.cast())
    }

    /// Address of the element, as written to the trace streams.
    #[inline]
    pub fn addr(self) -> usize {
        self.0.as_ptr() as usize
    }

    #[inline]
    pub(crate) fn next(self) -> Option<ElementPtr> {
        // SAFETY: the handle points into live slab memory (see `from_raw`).
        let raw = unsafe { ptr::addr_of!((*self.0.as_ptr()).next).read_unaligned() };
        NonNull::new(raw).map(ElementPtr)
    }

    #[inline]
    pub(crate) fn set_next(self, next: Option<ElementPtr>) {
        let raw = next.map_or(ptr::null_mut(), |e| e.0.as_ptr());
        // SAFETY: see `next`.
        unsafe { ptr::addr_of_mut!((*self.0.as_ptr()).next).write_unaligned(raw) }
    }

    #[inline]
    pub(crate) fn count(self) -> u32 {
        // SAFETY: see `next`.
        unsafe { ptr::addr_of!((*self.0.as_ptr()).count).read_unaligned() }
    }

    #[inline]
    pub(crate) fn set_count(self, count: u32) {
        // SAFETY: see `next`.
        unsafe { ptr::addr_of_mut!((*self.0.as_ptr()).count).write_unaligned(count) }
    }
}
