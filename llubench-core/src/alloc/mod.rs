//! ## llubench-core::alloc
//! **Bump-pointer slab allocation for list elements**
//!
//! ### Key Submodules:
//! - `slab/`: fixed-capacity slabs carved into elements by a monotonic cursor
//! - `stats/`: allocation counters reported at the end of a run
//!
//! Nothing handed out here is ever freed individually. Slabs are released in
//! one go when the allocator is dropped at the end of the benchmark.

pub mod slab;
pub mod stats;

pub use slab::{SlabAllocator, SLAB_CAPACITY};
pub use stats::AllocStats;
