//! ## llubench-core::bench
//! **Benchmark driver**
//!
//! Builds the initial lists, then alternates a traversal pass and a growth
//! step for the configured number of iterations. Progress goes to the
//! supplied writer in the classic format (iteration index every tenth
//! iteration, then `num allocated <count>`).
//!
//! Each run also produces a BLAKE3 digest over its parameters and the
//! per-iteration schedule (elements grown, traversal checksum). Element
//! addresses are not part of it, so identical settings give identical
//! digests across processes.

use std::io::Write;

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::alloc::{AllocStats, SlabAllocator};
use crate::error::BenchError;
use crate::growth::{GrowthMode, GrowthScheduler};
use crate::list::{InsertPosition, ListSet};
use crate::trace::TraceSink;
use crate::traverse::{traverse, Traversal};

/// Iterations between progress lines.
pub const PROGRESS_INTERVAL: u64 = 10;

/// Fully resolved benchmark parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchParams {
    pub iterations: u64,
    pub num_lists: usize,
    pub element_size: usize,
    pub initial_length: usize,
    pub growth_rate: f64,
    pub growth_mode: GrowthMode,
    pub dirty: bool,
    pub tail: bool,
}

impl BenchParams {
    /// Parameters with the stock defaults: one list of one 64-byte element,
    /// no growth, clean head-insertion.
    pub fn new(iterations: u64) -> Self {
        Self {
            iterations,
            num_lists: 1,
            element_size: 64,
            initial_length: 1,
            growth_rate: 0.0,
            growth_mode: GrowthMode::Synchronized,
            dirty: false,
            tail: false,
        }
    }

    pub fn insert_position(&self) -> InsertPosition {
        if self.tail {
            InsertPosition::Tail
        } else {
            InsertPosition::Head
        }
    }

    fn hash_into(&self, hasher: &mut Hasher) {
        hasher.update(&self.iterations.to_le_bytes());
        hasher.update(&(self.num_lists as u64).to_le_bytes());
        hasher.update(&(self.element_size as u64).to_le_bytes());
        hasher.update(&(self.initial_length as u64).to_le_bytes());
        hasher.update(&self.growth_rate.to_bits().to_le_bytes());
        match self.growth_mode {
            GrowthMode::Synchronized => hasher.update(&[0]),
            GrowthMode::Independent { seed } => hasher.update(&[1]).update(&seed.to_le_bytes()),
        };
        hasher.update(&[u8::from(self.dirty), u8::from(self.tail)]);
    }
}

/// What happened in one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationSummary {
    pub iteration: u64,
    pub traversal: Traversal,
    pub elements_added: u64,
    pub num_allocated: u64,
}

/// End-of-run figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub iterations: u64,
    pub num_allocated: u64,
    pub checksum: u64,
    pub elements_visited: u64,
    pub elements_grown: u64,
    pub alloc: AllocStats,
    pub digest: String,
}

impl RunReport {
    /// Compares the run digest against `expected` (hex, case-insensitive).
    pub fn verify_digest(&self, expected: &str) -> Result<(), BenchError> {
        if self.digest.eq_ignore_ascii_case(expected.trim()) {
            Ok(())
        } else {
            Err(BenchError::HashMismatch {
                expected: expected.trim().to_owned(),
                actual: self.digest.clone(),
            })
        }
    }
}

pub struct Benchmark<T: TraceSink> {
    params: BenchParams,
    lists: ListSet,
    growth: GrowthScheduler,
    sink: T,
    hasher: Hasher,
    iteration: u64,
    checksum: u64,
    visits: u64,
    grown: u64,
}

impl<T: TraceSink> Benchmark<T> {
    /// Validates `params` and builds the initial lists.
    ///
    /// Every precondition is checked before the first element is allocated,
    /// so a rejected configuration leaves the trace streams empty.
    #[instrument(level = "debug", skip(sink))]
    pub fn new(params: BenchParams, mut sink: T) -> Result<Self, BenchError> {
        let alloc = SlabAllocator::new(params.element_size)?;
        let growth = GrowthScheduler::new(params.growth_rate, params.growth_mode)?;
        let lists = ListSet::build(params.num_lists, params.initial_length, alloc, &mut sink)?;

        let mut hasher = Hasher::new();
        params.hash_into(&mut hasher);

        info!(
            lists = params.num_lists,
            initial_length = params.initial_length,
            element_size = params.element_size,
            growth_rate = params.growth_rate,
            dirty = params.dirty,
            tail = params.tail,
            "initial lists built"
        );

        Ok(Self {
            params,
            lists,
            growth,
            sink,
            hasher,
            iteration: 0,
            checksum: 0,
            visits: 0,
            grown: 0,
        })
    }

    /// Runs one iteration: a traversal pass followed by a growth step.
    pub fn step(&mut self) -> Result<IterationSummary, BenchError> {
        let traversal = traverse(&mut self.lists, self.params.dirty, &mut self.sink)?;

        let plan = self.growth.plan(self.lists.num_lists());
        let elements_added = GrowthScheduler::apply(
            &plan,
            &mut self.lists,
            self.params.insert_position(),
            &mut self.sink,
        )?;

        let summary = IterationSummary {
            iteration: self.iteration,
            traversal,
            elements_added,
            num_allocated: self.lists.allocator().num_allocated(),
        };

        self.hasher.update(&summary.iteration.to_le_bytes());
        self.hasher.update(&elements_added.to_le_bytes());
        self.hasher.update(&traversal.checksum.to_le_bytes());
        self.checksum = self.checksum.wrapping_add(traversal.checksum);
        self.visits += traversal.visits;
        self.grown += elements_added;
        self.iteration += 1;

        debug!(
            iteration = summary.iteration,
            visits = traversal.visits,
            added = elements_added,
            "iteration complete"
        );
        Ok(summary)
    }

    /// Runs the remaining iterations, writing progress to `out` and handing
    /// each iteration's summary to `observe`.
    pub fn run<W, F>(&mut self, out: &mut W, mut observe: F) -> Result<RunReport, BenchError>
    where
        W: Write,
        F: FnMut(&IterationSummary),
    {
        while self.iteration < self.params.iterations {
            if self.iteration % PROGRESS_INTERVAL == 0 {
                writeln!(out, "{}", self.iteration)?;
            }
            let summary = self.step()?;
            observe(&summary);
        }

        let report = self.report();
        writeln!(out, "num allocated {}", report.num_allocated)?;
        info!(
            num_allocated = report.num_allocated,
            checksum = report.checksum,
            digest = %report.digest,
            "benchmark complete"
        );
        Ok(report)
    }

    /// Figures for the iterations run so far.
    pub fn report(&self) -> RunReport {
        RunReport {
            iterations: self.iteration,
            num_allocated: self.lists.allocator().num_allocated(),
            checksum: self.checksum,
            elements_visited: self.visits,
            elements_grown: self.grown,
            alloc: self.lists.allocator().stats(),
            digest: hex::encode(self.hasher.finalize().as_bytes()),
        }
    }

    pub fn params(&self) -> &BenchParams {
        &self.params
    }

    pub fn lists(&self) -> &ListSet {
        &self.lists
    }

    /// Flushes the trace sink and hands it back.
    pub fn finish(mut self) -> Result<T, BenchError> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
