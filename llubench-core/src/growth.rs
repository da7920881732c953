//! ## llubench-core::growth
//! **Per-iteration list growth**
//!
//! Two modes are supported:
//! - `Synchronized`: one shared `f64` accumulator. Each iteration adds the
//!   rate, takes the whole part as the number of rounds and keeps the
//!   fraction. Every round adds one element to every list, so all lists
//!   always have the same length.
//! - `Independent`: each list grows by `floor(rate)` plus one more element
//!   with probability `frac(rate)`, drawn from a seeded `SmallRng`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::BenchError;
use crate::list::{InsertPosition, ListSet};
use crate::trace::TraceSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GrowthMode {
    #[default]
    Synchronized,
    Independent {
        seed: u64,
    },
}

/// How many elements each list receives in one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrowthPlan {
    /// The same number of rounds for every list.
    Uniform(u64),
    /// One count per list index.
    PerList(Vec<u64>),
}

impl GrowthPlan {
    /// Elements this plan adds across `num_lists` lists.
    pub fn elements(&self, num_lists: usize) -> u64 {
        match self {
            GrowthPlan::Uniform(rounds) => rounds * num_lists as u64,
            GrowthPlan::PerList(counts) => counts.iter().sum(),
        }
    }

    fn rounds(&self) -> u64 {
        match self {
            GrowthPlan::Uniform(rounds) => *rounds,
            GrowthPlan::PerList(counts) => counts.iter().copied().max().unwrap_or(0),
        }
    }

    fn grows(&self, list: usize, round: u64) -> bool {
        match self {
            GrowthPlan::Uniform(_) => true,
            GrowthPlan::PerList(counts) => counts[list] > round,
        }
    }
}

enum Source {
    Accumulator(f64),
    Random(SmallRng),
}

pub struct GrowthScheduler {
    rate: f64,
    source: Source,
}

impl GrowthScheduler {
    /// Creates a scheduler adding `rate` elements per list per iteration on
    /// average. The rate must be finite and non-negative.
    pub fn new(rate: f64, mode: GrowthMode) -> Result<Self, BenchError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(BenchError::Precondition(format!(
                "growth rate must be a non-negative number, got {rate}"
            )));
        }
        let source = match mode {
            GrowthMode::Synchronized => Source::Accumulator(0.0),
            GrowthMode::Independent { seed } => Source::Random(SmallRng::seed_from_u64(seed)),
        };
        Ok(Self { rate, source })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Advances the shared accumulator by one iteration and returns the
    /// number of whole rounds due.
    ///
    /// Returns `None` in `Independent` mode, where there is no shared round
    /// count; use [`GrowthScheduler::plan`] there.
    pub fn next_rounds(&mut self) -> Option<u64> {
        match &mut self.source {
            Source::Accumulator(acc) => Some(advance(acc, self.rate)),
            Source::Random(_) => None,
        }
    }

    /// Plans one iteration of growth for `num_lists` lists.
    pub fn plan(&mut self, num_lists: usize) -> GrowthPlan {
        let rate = self.rate;
        match &mut self.source {
            Source::Accumulator(acc) => GrowthPlan::Uniform(advance(acc, rate)),
            Source::Random(rng) => {
                let whole = rate.floor();
                let fraction = rate - whole;
                let counts = (0..num_lists)
                    .map(|_| whole as u64 + u64::from(fraction > 0.0 && rng.random_bool(fraction)))
                    .collect();
                GrowthPlan::PerList(counts)
            }
        }
    }

    /// Carries out `plan`, returning the number of elements added.
    ///
    /// Round by round, each growing list (in index order) gets one freshly
    /// allocated element linked in at `position`.
    pub fn apply<T: TraceSink>(
        plan: &GrowthPlan,
        lists: &mut ListSet,
        position: InsertPosition,
        sink: &mut T,
    ) -> Result<u64, BenchError> {
        let mut added = 0;
        for round in 0..plan.rounds() {
            for list in 0..lists.num_lists() {
                if plan.grows(list, round) {
                    lists.insert(list, position, sink)?;
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}

fn advance(acc: &mut f64, rate: f64) -> u64 {
    *acc += rate;
    let whole = acc.floor();
    *acc -= whole;
    whole as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::SlabAllocator;
    use crate::trace::NullTrace;
    use proptest::prelude::*;

    fn synchronized(rate: f64) -> GrowthScheduler {
        GrowthScheduler::new(rate, GrowthMode::Synchronized).unwrap()
    }

    #[test]
    fn test_rejects_negative_and_non_finite_rates() {
        for rate in [-0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                GrowthScheduler::new(rate, GrowthMode::Synchronized),
                Err(BenchError::Precondition(_))
            ));
        }
    }

    #[test]
    fn test_half_rate_fires_every_other_iteration() {
        let mut growth = synchronized(0.5);
        let rounds: Vec<Option<u64>> = (0..3).map(|_| growth.next_rounds()).collect();
        assert_eq!(rounds, vec![Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_whole_rates_fire_every_iteration() {
        let mut growth = synchronized(2.0);
        assert!((0..10).all(|_| growth.next_rounds() == Some(2)));
    }

    #[test]
    fn test_zero_rate_never_fires() {
        let mut growth = synchronized(0.0);
        assert!((0..100).all(|_| growth.plan(4) == GrowthPlan::Uniform(0)));
    }

    #[test]
    fn test_uniform_plan_grows_every_list() {
        let alloc = SlabAllocator::new(64).unwrap();
        let mut lists = ListSet::build(3, 2, alloc, &mut NullTrace).unwrap();
        let plan = GrowthPlan::Uniform(2);
        let added =
            GrowthScheduler::apply(&plan, &mut lists, InsertPosition::Head, &mut NullTrace)
                .unwrap();
        assert_eq!(added, 6);
        assert_eq!(plan.elements(3), 6);
        assert_eq!(lists.lengths(), vec![4, 4, 4]);
    }

    #[test]
    fn test_per_list_plan_grows_selected_lists() {
        let alloc = SlabAllocator::new(64).unwrap();
        let mut lists = ListSet::build(3, 1, alloc, &mut NullTrace).unwrap();
        let plan = GrowthPlan::PerList(vec![0, 2, 1]);
        let added =
            GrowthScheduler::apply(&plan, &mut lists, InsertPosition::Tail, &mut NullTrace)
                .unwrap();
        assert_eq!(added, 3);
        assert_eq!(lists.lengths(), vec![1, 3, 2]);
    }

    #[test]
    fn test_independent_mode_is_reproducible() {
        let mode = GrowthMode::Independent { seed: 7 };
        let mut a = GrowthScheduler::new(0.333, mode).unwrap();
        let mut b = GrowthScheduler::new(0.333, mode).unwrap();
        for _ in 0..50 {
            assert_eq!(a.plan(16), b.plan(16));
        }
    }

    #[test]
    fn test_independent_mode_has_no_shared_rounds() {
        let mut growth = GrowthScheduler::new(1.5, GrowthMode::Independent { seed: 5 }).unwrap();
        assert_eq!(growth.next_rounds(), None);
        assert!(matches!(growth.plan(8), GrowthPlan::PerList(counts) if counts.len() == 8));
    }

    #[test]
    fn test_independent_mode_whole_rate_is_exact() {
        let mut growth = GrowthScheduler::new(1.0, GrowthMode::Independent { seed: 3 }).unwrap();
        assert_eq!(growth.plan(4), GrowthPlan::PerList(vec![1; 4]));
    }

    proptest! {
        #[test]
        fn prop_round_sequence_is_deterministic(rate in 0.0f64..4.0, iterations in 0usize..500) {
            let mut a = synchronized(rate);
            let mut b = synchronized(rate);
            let first: Vec<Option<u64>> = (0..iterations).map(|_| a.next_rounds()).collect();
            let second: Vec<Option<u64>> = (0..iterations).map(|_| b.next_rounds()).collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_total_rounds_track_rate(rate in 0.0f64..4.0, iterations in 0usize..2000) {
            let mut growth = synchronized(rate);
            let total: u64 = (0..iterations).filter_map(|_| growth.next_rounds()).sum();
            let expected = iterations as f64 * rate;
            prop_assert!((total as f64 - expected).abs() <= 1.0 + 1e-6);
        }
    }
}
