use std::collections::HashSet;
use std::path::PathBuf;

use llubench_core::growth::{GrowthMode, GrowthScheduler};
use llubench_core::prelude::*;
use proptest::prelude::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("llubench-it-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn read_addresses(path: PathBuf) -> Vec<usize> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| parse_address(line).expect("trace line is an address"))
        .collect()
}

#[test]
fn traced_tail_growth_writes_every_event() {
    let dir = scratch_dir("tail");
    let params = BenchParams {
        num_lists: 2,
        initial_length: 3,
        growth_rate: 1.0,
        tail: true,
        ..BenchParams::new(5)
    };

    let trace = FileTrace::create(&dir).unwrap();
    let mut bench = Benchmark::new(params, trace).unwrap();
    let report = bench.run(&mut std::io::sink(), |_| {}).unwrap();
    bench.finish().unwrap().finish().unwrap();

    let allocs = read_addresses(dir.join(ALLOC_TRACE_FILE));
    let accesses = read_addresses(dir.join(ACCESS_TRACE_FILE));

    assert_eq!(report.num_allocated, 16);
    assert_eq!(allocs.len(), 16);
    assert_eq!(allocs.iter().collect::<HashSet<_>>().len(), 16);

    // Traversal visits 2 * (3 + k) elements in iteration k; the tail search
    // that follows steps past 3 + k - 1 elements per list.
    assert_eq!(report.elements_visited, 50);
    assert_eq!(accesses.len(), 50 + 40);
    assert!(accesses.iter().all(|addr| allocs.contains(addr)));

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn traced_head_growth_has_no_tail_walk() {
    let params = BenchParams {
        num_lists: 3,
        initial_length: 2,
        growth_rate: 2.0,
        ..BenchParams::new(4)
    };
    let mut trace = MemoryTrace::default();
    let mut bench = Benchmark::new(params, &mut trace).unwrap();
    let report = bench.run(&mut std::io::sink(), |_| {}).unwrap();
    let lengths = bench.lists().lengths();
    drop(bench);

    assert_eq!(lengths, vec![10, 10, 10]);
    assert_eq!(trace.allocations().len() as u64, report.num_allocated);
    assert_eq!(trace.accesses().len() as u64, report.elements_visited);
    // Lengths 2, 4, 6, 8 during the four traversals.
    assert_eq!(report.elements_visited, 3 * (2 + 4 + 6 + 8));
}

#[test]
fn independent_growth_lets_lists_diverge() {
    let params = BenchParams {
        num_lists: 64,
        growth_rate: 0.5,
        growth_mode: GrowthMode::Independent { seed: 11 },
        ..BenchParams::new(50)
    };
    let mut bench = Benchmark::new(params.clone(), NullTrace).unwrap();
    let report = bench.run(&mut std::io::sink(), |_| {}).unwrap();
    let lengths = bench.lists().lengths();

    assert_eq!(
        lengths.iter().map(|&len| len as u64).sum::<u64>(),
        report.num_allocated
    );
    assert!(lengths.iter().collect::<HashSet<_>>().len() > 1);

    let mut again = Benchmark::new(params, NullTrace).unwrap();
    let repeat = again.run(&mut std::io::sink(), |_| {}).unwrap();
    assert_eq!(again.lists().lengths(), lengths);
    assert_eq!(repeat.digest, report.digest);
}

#[test]
fn small_elements_are_rejected() {
    let params = BenchParams {
        element_size: llubench_core::MIN_ELEMENT_SIZE,
        ..BenchParams::new(1)
    };
    assert!(matches!(
        Benchmark::new(params, NullTrace),
        Err(BenchError::Precondition(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn allocations_follow_growth_schedule(
        num_lists in 1usize..6,
        initial_length in 1usize..6,
        rate in 0.0f64..2.5,
        iterations in 0u64..40,
        tail in any::<bool>(),
    ) {
        let params = BenchParams {
            num_lists,
            initial_length,
            growth_rate: rate,
            tail,
            ..BenchParams::new(iterations)
        };
        let mut bench = Benchmark::new(params, NullTrace).unwrap();
        let report = bench.run(&mut std::io::sink(), |_| {}).unwrap();

        let mut schedule = GrowthScheduler::new(rate, GrowthMode::Synchronized).unwrap();
        let rounds: u64 = (0..iterations).filter_map(|_| schedule.next_rounds()).sum();
        let per_list = initial_length as u64 + rounds;

        prop_assert_eq!(report.num_allocated, num_lists as u64 * per_list);
        prop_assert!(bench.lists().lengths().iter().all(|&len| len as u64 == per_list));
    }

    #[test]
    fn dirty_counters_match_visit_count(
        num_lists in 1usize..4,
        initial_length in 1usize..5,
        iterations in 1u64..20,
    ) {
        let params = BenchParams {
            num_lists,
            initial_length,
            dirty: true,
            ..BenchParams::new(iterations)
        };
        let mut bench = Benchmark::new(params, NullTrace).unwrap();
        bench.run(&mut std::io::sink(), |_| {}).unwrap();
        for list in 0..num_lists {
            prop_assert!(bench.lists().iter(list).all(|(_, count)| count as u64 == iterations));
        }
    }
}
