//! # llubench-core
//!
//! Linked-list traversal micro-benchmark modelled on the "Health" workload.
//! A fixed number of singly linked lists is walked once per iteration,
//! optionally dirtying every element, and optionally grown at the head or
//! tail. Element addresses can be recorded for offline cache and TLB
//! analysis.
//!
//! ### Key Submodules:
//! - `alloc`: bump-pointer slab allocator that never frees
//! - `list`: the set of lists and the initial build
//! - `growth`: per-iteration growth scheduling (fractional rates)
//! - `traverse`: the pointer-chasing pass
//! - `trace`: allocation/access address streams
//! - `bench`: the iteration driver
//!
//! Everything runs on one thread; the access pattern of that thread is the
//! thing being measured.

pub mod alloc;
pub mod bench;
pub mod element;
pub mod error;
pub mod growth;
pub mod list;
pub mod trace;
pub mod traverse;

pub mod prelude {
    pub use crate::alloc::*;
    pub use crate::bench::*;
    pub use crate::error::*;
    pub use crate::growth::*;
    pub use crate::list::*;
    pub use crate::trace::*;
    pub use crate::traverse::*;
}

pub use bench::{BenchParams, Benchmark, RunReport};
pub use element::MIN_ELEMENT_SIZE;
pub use error::BenchError;
