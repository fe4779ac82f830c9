#![expect(
    clippy::expect_used,
    reason = "property tests use expect for readable failures"
)]
//! Property tests relating the exact and heuristic bounds on small tours.

use proptest::collection::vec;
use proptest::prelude::*;
use ttp_bounds_core::test_support::{ExhaustiveExactSolver, ExhaustiveRoutingSolver};
use ttp_bounds_core::{
    CutStrategy, DistanceMatrix, ExactBoundBuilder, ExactBoundConfig, ExactOutcome,
    HeuristicBoundBuilder, HeuristicOutcome, Team, TourState, TripConstraints,
};

const MAX_TEAMS: usize = 5;
const MAX_AWAY: usize = 3;

#[derive(Debug)]
struct Tour {
    distances: DistanceMatrix,
    state: TourState,
    constraints: TripConstraints,
}

fn tour() -> impl Strategy<Value = Tour> {
    (
        3..=MAX_TEAMS,
        vec(1_u32..20, MAX_TEAMS * MAX_TEAMS),
        0..MAX_TEAMS,
        0_u8..16,
        1_usize..=3,
        1_usize..=3,
        0_usize..=2,
        0_usize..=2,
    )
        .prop_map(
            |(teams, weights, position_pick, away_mask, capacity, streak_pick, min, extra)| {
                let distances = DistanceMatrix::from_fn(teams, |from, to| {
                    if from == to {
                        return 0;
                    }
                    let cell = from.min(to) * MAX_TEAMS + from.max(to);
                    weights.get(cell).copied().unwrap_or(1)
                })
                .expect("non-empty matrix");
                let position: Team = if position_pick < teams { position_pick } else { 0 };
                let away: Vec<Team> = (1..teams)
                    .filter(|&team| team != position)
                    .filter(|&team| away_mask & (1 << team) != 0)
                    .take(MAX_AWAY)
                    .collect();
                let streak = if position == 0 {
                    0
                } else {
                    streak_pick.min(capacity)
                };
                Tour {
                    distances,
                    state: TourState::new(0, position, away).expect("valid tour state"),
                    constraints: TripConstraints::new(capacity, min, min + extra, streak)
                        .expect("valid trip rules"),
                }
            },
        )
}

fn exact(tour: &Tour, cut_strategy: CutStrategy) -> ExactOutcome {
    let solver = ExhaustiveExactSolver::default();
    let config = ExactBoundConfig {
        cut_strategy,
        ..ExactBoundConfig::default()
    };
    ExactBoundBuilder::with_config(&solver, config)
        .expect("valid config")
        .solve(&tour.distances, &tour.state, &tour.constraints)
        .expect("exact bound computed")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn exact_trips_respect_the_rules(tour in tour()) {
        let outcome = exact(&tour, CutStrategy::Enumerate);
        if let ExactOutcome::Bound { cost, decomposition } = outcome {
            prop_assert_eq!(decomposition.check(&tour.state, &tour.constraints), Ok(()));
            prop_assert_eq!(decomposition.cost(&tour.distances), cost);
            if !tour.state.away_teams().is_empty() {
                let trips = decomposition.trip_count();
                prop_assert!(trips >= tour.constraints.min_trips());
                prop_assert!(trips <= tour.constraints.max_trips());
            }
            if tour.state.is_away() {
                prop_assert!(decomposition.open.is_some());
            }
        }
    }

    #[test]
    fn lazy_cuts_agree_with_enumeration(tour in tour()) {
        let enumerated = exact(&tour, CutStrategy::Enumerate);
        let lazy = exact(&tour, CutStrategy::Lazy);
        prop_assert_eq!(enumerated.cost(), lazy.cost());
    }

    #[test]
    fn exact_bound_never_exceeds_heuristic(tour in tour()) {
        let exact_outcome = exact(&tour, CutStrategy::Enumerate);
        let solver = ExhaustiveRoutingSolver::default();
        let heuristic = HeuristicBoundBuilder::new(&solver)
            .solve_with_trip_bounds(&tour.distances, &tour.state, &tour.constraints)
            .expect("heuristic bound computed");
        match (exact_outcome.cost(), heuristic) {
            (Some(lower), HeuristicOutcome::Bound { cost }) => prop_assert!(lower <= cost),
            (None, outcome) => prop_assert_eq!(outcome, HeuristicOutcome::NoSolution),
            (Some(lower), HeuristicOutcome::NoSolution) => {
                prop_assert!(false, "exact bound {lower} but no routes found");
            }
        }
    }
}
