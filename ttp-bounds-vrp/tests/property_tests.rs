#![expect(
    clippy::expect_used,
    reason = "property tests use expect for readable failures"
)]
//! Property-based tests for the `vrp-core` routing backend.
//!
//! Every plan it returns must be valid and no cheaper than the exhaustive
//! optimum. Some fleets continue an open trip: vehicle 0 then starts at node
//! 1, which already carries part of its capacity.

use proptest::collection::vec;
use proptest::prelude::*;
use ttp_bounds_core::heuristic::VehicleSpec;
use ttp_bounds_core::test_support::ExhaustiveRoutingSolver;
use ttp_bounds_core::{HeuristicConfig, RoutingInstance, RoutingSolver};
use ttp_bounds_vrp::{VrpRoutingConfig, VrpRoutingSolver};

fn instance() -> impl Strategy<Value = RoutingInstance> {
    (
        1_usize..=4,
        vec((0_u64..10, 0_u64..10), 5),
        1_usize..=3,
        1_usize..=3,
        0_usize..=1,
        any::<bool>(),
        1_usize..=3,
    )
        .prop_map(|(jobs, points, capacity, fleet, required, continues, streak)| {
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
            RoutingInstance::new(
                arcs,
                demands,
                vehicles,
                required.min(fleet),
                HeuristicConfig::default().search_parameters(required > 0),
            )
            .expect("generated instances are consistent")
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn plans_are_valid_and_never_beat_the_optimum(instance in instance()) {
        let solver = VrpRoutingSolver::with_config(VrpRoutingConfig {
            default_generations: 20,
        })
        .expect("valid config");
        let found = solver.solve(&instance).expect("vrp-core runs");
        let optimum = ExhaustiveRoutingSolver::default()
            .solve(&instance)
            .expect("small instance");
        if let Some(plan) = found {
            let best = optimum.expect("a plan exists, so the optimum does too");
            prop_assert_eq!(plan.validate(&instance), Ok(()));
            prop_assert!(plan.cost(&instance) >= best.cost(&instance));
        }
    }
}
