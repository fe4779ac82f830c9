#![expect(
    clippy::expect_used,
    reason = "property tests use expect for readable failures"
)]
//! Property-based tests for the local search routing backend.
//!
//! # Invariants tested
//!
//! - **Validity:** every returned plan serves each job once within capacity
//!   and uses every required vehicle.
//! - **Determinism:** equal instances and seeds give equal plans.
//! - **Optimality gap:** no plan is cheaper than the exhaustive optimum, and
//!   an unsolvable instance is never reported solved.
//!
//! Some fleets continue an open trip: vehicle 0 then starts at node 1, which
//! already carries part of its capacity and is not a job.

use proptest::collection::vec;
use proptest::prelude::*;
use ttp_bounds_core::heuristic::VehicleSpec;
use ttp_bounds_core::test_support::ExhaustiveRoutingSolver;
use ttp_bounds_core::{
    FirstSolutionStrategy, HeuristicConfig, LocalSearchMetaheuristic, RoutingInstance,
    RoutingSolver,
};
use ttp_bounds_routing::LocalSearchSolver;

const STRATEGIES: [FirstSolutionStrategy; 6] = [
    FirstSolutionStrategy::Automatic,
    FirstSolutionStrategy::PathCheapestArc,
    FirstSolutionStrategy::LocalCheapestArc,
    FirstSolutionStrategy::FirstUnboundMinValue,
    FirstSolutionStrategy::Savings,
    FirstSolutionStrategy::ParallelCheapestInsertion,
];

const METAHEURISTICS: [LocalSearchMetaheuristic; 5] = [
    LocalSearchMetaheuristic::Automatic,
    LocalSearchMetaheuristic::GreedyDescent,
    LocalSearchMetaheuristic::GuidedLocalSearch,
    LocalSearchMetaheuristic::SimulatedAnnealing,
    LocalSearchMetaheuristic::TabuSearch,
];

/// Symmetric instances on points of a small grid, with unit job demands.
fn instance() -> impl Strategy<Value = RoutingInstance> {
    (
        1_usize..=5,
        vec((0_u64..10, 0_u64..10), 6),
        1_usize..=3,
        1_usize..=4,
        0_usize..=2,
        0_usize..STRATEGIES.len(),
        0_usize..METAHEURISTICS.len(),
        any::<u64>(),
        (any::<bool>(), 1_usize..=3),
    )
        .prop_map(
            |(
                jobs,
                points,
                capacity,
                fleet,
                required,
                strategy,
                metaheuristic,
                seed,
                (continues, streak),
            )| {
                let size = jobs + 1;
                let opened = continues && size > 1;
                let point = |node: usize| points.get(node).copied().unwrap_or((0, 0));
                let arcs = (0..size)
                    .map(|from| {
                        (0..size)
                            .map(|to| {
                                let (ax, ay) = point(from);
                                let (bx, by) = point(to);
                                ax.abs_diff(bx) + ay.abs_diff(by)
                            })
                            .collect()
                    })
                    .collect();
                let demands = (0..size)
                    .map(|node| match node {
                        0 => 0,
                        1 if opened => streak.clamp(1, capacity),
                        _ => 1,
                    })
                    .collect();
                let vehicles = (0..fleet)
                    .map(|vehicle| VehicleSpec {
                        capacity,
                        start: usize::from(vehicle == 0 && opened),
                        end: 0,
                    })
                    .collect();
                let config = HeuristicConfig {
                    first_solution: STRATEGIES
                        .get(strategy)
                        .copied()
                        .unwrap_or(FirstSolutionStrategy::Automatic),
                    metaheuristic: METAHEURISTICS
                        .get(metaheuristic)
                        .copied()
                        .unwrap_or(LocalSearchMetaheuristic::Automatic),
                    solution_limit: Some(30),
                    seed,
                    ..HeuristicConfig::default()
                };
                RoutingInstance::new(
                    arcs,
                    demands,
                    vehicles,
                    required.min(fleet),
                    config.search_parameters(false),
                )
                .expect("generated instances are consistent")
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn plans_are_valid_and_never_beat_the_optimum(instance in instance()) {
        let found = LocalSearchSolver::new().solve(&instance).expect("solver runs");
        let optimum = ExhaustiveRoutingSolver::default()
            .solve(&instance)
            .expect("small instance");
        match (found, optimum) {
            (Some(plan), Some(best)) => {
                prop_assert_eq!(plan.validate(&instance), Ok(()));
                prop_assert!(plan.cost(&instance) >= best.cost(&instance));
            }
            (Some(plan), None) => {
                prop_assert!(false, "routes {:?} reported for an unsolvable instance", plan.routes());
            }
            (None, _) => {}
        }
    }

    #[test]
    fn equal_seeds_give_equal_plans(instance in instance()) {
        let solver = LocalSearchSolver::new();
        let first = solver.solve(&instance).expect("solver runs");
        let second = solver.solve(&instance).expect("solver runs");
        prop_assert_eq!(first, second);
    }
}
