#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use llubench_core::prelude::*;

/// Benchmark traversal passes over the "Health" approximation
/// (341 lists, growth 0.333, dirty, tail insertion).
fn benchmark_health_iterations(c: &mut Criterion) {
    let params = BenchParams {
        num_lists: 341,
        growth_rate: 0.333,
        dirty: true,
        tail: true,
        ..BenchParams::new(50)
    };

    c.bench_function("health_50_iterations", |b| {
        b.iter(|| {
            let mut bench = Benchmark::new(params.clone(), NullTrace).unwrap();
            black_box(bench.run(&mut std::io::sink(), |_| {}).unwrap());
        })
    });
}

/// Benchmark a single clean traversal over long lists.
fn benchmark_clean_traversal(c: &mut Criterion) {
    let alloc = SlabAllocator::new(64).unwrap();
    let mut lists = ListSet::build(16, 1_000, alloc, &mut NullTrace).unwrap();

    c.bench_function("traverse_16x1000", |b| {
        b.iter(|| black_box(traverse(&mut lists, false, &mut NullTrace).unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_health_iterations,
    benchmark_clean_traversal
);
criterion_main!(benches);
