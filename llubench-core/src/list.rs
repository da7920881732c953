//! ## llubench-core::list
//! **Set of independent singly linked lists**
//!
//! Each list is a forward chain of elements living in slab memory; the set
//! keeps one head per list index and owns the allocator the elements came
//! from, so every element outlives every handle the set gives out.
//! Lists only ever grow.

use tracing::debug;

use crate::alloc::SlabAllocator;
use crate::element::ElementPtr;
use crate::error::BenchError;
use crate::trace::TraceSink;

/// Where newly grown elements are linked into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    /// New element becomes the head. O(1).
    #[default]
    Head,
    /// New element becomes the terminal element. Walks the whole list.
    Tail,
}

pub struct ListSet {
    heads: Vec<Option<ElementPtr>>,
    alloc: SlabAllocator,
}

impl ListSet {
    /// Creates `num_lists` empty lists backed by `alloc`.
    pub fn new(num_lists: usize, alloc: SlabAllocator) -> Self {
        Self {
            heads: vec![None; num_lists],
            alloc,
        }
    }

    /// Builds `num_lists` lists of `initial_length` elements each.
    ///
    /// Construction runs `initial_length` rounds; every round allocates one
    /// element per list, in list order, and links it in as the new head. The
    /// round-robin order only shows in how allocation addresses interleave.
    pub fn build<T: TraceSink>(
        num_lists: usize,
        initial_length: usize,
        alloc: SlabAllocator,
        sink: &mut T,
    ) -> Result<Self, BenchError> {
        if initial_length == 0 {
            return Err(BenchError::Precondition(
                "initial list length must be positive".into(),
            ));
        }

        let mut lists = Self::new(num_lists, alloc);
        for _ in 0..initial_length {
            for list in 0..num_lists {
                lists.push_front(list, sink)?;
            }
        }
        debug!(
            num_lists,
            initial_length,
            allocated = lists.alloc.num_allocated(),
            "built initial lists"
        );
        Ok(lists)
    }

    /// Allocates an element and links it in front of `list`'s head.
    ///
    /// # Panics
    ///
    /// Panics if `list >= self.num_lists()`.
    pub fn push_front<T: TraceSink>(
        &mut self,
        list: usize,
        sink: &mut T,
    ) -> Result<ElementPtr, BenchError> {
        let head = self.heads[list];
        let element = self.alloc.allocate(sink)?;
        element.set_next(head);
        self.heads[list] = Some(element);
        Ok(element)
    }

    /// Allocates an element and links it after `list`'s last element.
    ///
    /// The walk to the last element records every element it steps past in
    /// the access stream; the last element itself is not recorded.
    ///
    /// # Panics
    ///
    /// Panics if `list >= self.num_lists()`.
    pub fn push_back<T: TraceSink>(
        &mut self,
        list: usize,
        sink: &mut T,
    ) -> Result<ElementPtr, BenchError> {
        let head = self.heads[list];
        let element = self.alloc.allocate(sink)?;
        element.set_next(None);

        match head {
            None => self.heads[list] = Some(element),
            Some(mut last) => {
                while let Some(next) = last.next() {
                    sink.record_access(last.addr())?;
                    last = next;
                }
                last.set_next(Some(element));
            }
        }
        Ok(element)
    }

    /// Allocates an element and links it in at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `list >= self.num_lists()`.
    pub fn insert<T: TraceSink>(
        &mut self,
        list: usize,
        position: InsertPosition,
        sink: &mut T,
    ) -> Result<ElementPtr, BenchError> {
        match position {
            InsertPosition::Head => self.push_front(list, sink),
            InsertPosition::Tail => self.push_back(list, sink),
        }
    }

    pub fn num_lists(&self) -> usize {
        self.heads.len()
    }

    /// Head of `list`, or `None` if it is empty.
    ///
    /// # Panics
    ///
    /// Panics if `list >= self.num_lists()`.
    pub fn head(&self, list: usize) -> Option<ElementPtr> {
        self.heads[list]
    }

    /// Terminal element of `list`. Panics like [`ListSet::iter`].
    pub fn tail(&self, list: usize) -> Option<ElementPtr> {
        self.iter(list).last().map(|(element, _)| element)
    }

    /// Elements of `list` from head to terminal, with their counters.
    ///
    /// # Panics
    ///
    /// Panics if `list >= self.num_lists()`.
    pub fn iter(&self, list: usize) -> Iter<'_> {
        Iter {
            cursor: self.heads[list],
            _lists: self,
        }
    }

    /// Number of elements in `list`. Panics like [`ListSet::iter`].
    pub fn len(&self, list: usize) -> usize {
        self.iter(list).count()
    }

    /// Panics like [`ListSet::head`].
    pub fn is_empty(&self, list: usize) -> bool {
        self.heads[list].is_none()
    }

    /// Lengths of all lists, in index order.
    pub fn lengths(&self) -> Vec<usize> {
        (0..self.num_lists()).map(|list| self.len(list)).collect()
    }

    pub fn total_elements(&self) -> usize {
        (0..self.num_lists()).map(|list| self.len(list)).sum()
    }

    pub fn allocator(&self) -> &SlabAllocator {
        &self.alloc
    }

    pub(crate) fn heads(&self) -> &[Option<ElementPtr>] {
        &self.heads
    }
}

/// Read-only walk over one list. Yields each element with its counter.
pub struct Iter<'a> {
    cursor: Option<ElementPtr>,
    _lists: &'a ListSet,
}

impl Iterator for Iter<'_> {
    type Item = (ElementPtr, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.cursor?;
        self.cursor = element.next();
        Some((element, element.count()))
    }
}
