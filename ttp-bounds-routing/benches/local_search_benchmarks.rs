//! Criterion benchmarks for the local search routing backend.
//!
//! Measures solve time for each metaheuristic across away-set sizes that
//! arise late in a tournament (4, 8 and 12 opponents left).
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package ttp-bounds-routing
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ttp_bounds_core::heuristic::VehicleSpec;
use ttp_bounds_core::{
    FirstSolutionStrategy, HeuristicConfig, LocalSearchMetaheuristic, RoutingInstance,
    RoutingSolver,
};
use ttp_bounds_routing::LocalSearchSolver;

/// Seed for deterministic instance generation.
const BENCHMARK_SEED: u64 = 42;

/// Opponents left to visit.
const AWAY_SET_SIZES: &[usize] = &[4, 8, 12];

/// Games per trip.
const CAPACITY: usize = 3;

const METAHEURISTICS: [LocalSearchMetaheuristic; 4] = [
    LocalSearchMetaheuristic::GreedyDescent,
    LocalSearchMetaheuristic::GuidedLocalSearch,
    LocalSearchMetaheuristic::SimulatedAnnealing,
    LocalSearchMetaheuristic::TabuSearch,
];

/// Venues scattered over a 100 by 100 grid with Manhattan distances.
fn generate_instance(
    jobs: usize,
    metaheuristic: LocalSearchMetaheuristic,
) -> Option<RoutingInstance> {
    let mut rng = ChaCha8Rng::seed_from_u64(BENCHMARK_SEED);
    let points: Vec<(u64, u64)> = (0..=jobs)
        .map(|_| (rng.gen_range(0..100), rng.gen_range(0..100)))
        .collect();
    let arcs = points
        .iter()
        .map(|&(ax, ay)| {
            points
                .iter()
                .map(|&(bx, by)| ax.abs_diff(bx) + ay.abs_diff(by))
                .collect()
        })
        .collect();
    let demands = (0..=jobs).map(|node| usize::from(node > 0)).collect();
    let vehicle = VehicleSpec {
        capacity: CAPACITY,
        start: 0,
        end: 0,
    };
    let config = HeuristicConfig {
        first_solution: FirstSolutionStrategy::Savings,
        metaheuristic,
        solution_limit: Some(200),
        seed: BENCHMARK_SEED,
        ..HeuristicConfig::default()
    };
    RoutingInstance::new(
        arcs,
        demands,
        vec![vehicle; jobs],
        0,
        config.search_parameters(false),
    )
    .ok()
}

fn bench_metaheuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(5));

    let solver = LocalSearchSolver::new();
    for &size in AWAY_SET_SIZES {
        for metaheuristic in METAHEURISTICS {
            let Some(instance) = generate_instance(size, metaheuristic) else {
                continue;
            };
            let throughput_size = u64::try_from(size).unwrap_or(u64::MAX);
            group.throughput(Throughput::Elements(throughput_size));
            group.bench_with_input(
                BenchmarkId::new(metaheuristic.name(), size),
                &instance,
                |b, routed| {
                    b.iter(|| {
                        #[expect(
                            clippy::let_underscore_must_use,
                            reason = "Benchmarking solve performance, result is intentionally discarded"
                        )]
                        let _ = solver.solve(routed);
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_metaheuristics);
criterion_main!(benches);
