//! ## llubench-core::traverse
//! **Full-list traversal**
//!
//! Walks every list head to terminal, lists in index order. Each visit adds
//! the element's counter to a running checksum and, when dirtying, bumps the
//! counter so the cache line has to be written back on eviction.

use std::hint::black_box;

use crate::error::BenchError;
use crate::list::ListSet;
use crate::trace::TraceSink;

/// Result of one traversal pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Traversal {
    /// Wrapping sum of every counter read during the pass.
    pub checksum: u64,
    /// Number of elements visited.
    pub visits: u64,
}

/// Traverses every list once.
pub fn traverse<T: TraceSink>(
    lists: &mut ListSet,
    dirty: bool,
    sink: &mut T,
) -> Result<Traversal, BenchError> {
    let mut pass = Traversal::default();

    for &head in lists.heads() {
        let mut cursor = head;
        while let Some(element) = cursor {
            let count = element.count();
            pass.checksum = pass.checksum.wrapping_add(u64::from(count));
            if dirty {
                element.set_count(count.wrapping_add(1));
            }
            sink.record_access(element.addr())?;
            pass.visits += 1;
            cursor = element.next();
        }
    }

    pass.checksum = black_box(pass.checksum);
    Ok(pass)
}
