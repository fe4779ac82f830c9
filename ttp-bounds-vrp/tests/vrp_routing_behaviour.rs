#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
//! Behaviour tests for the `vrp-core` routing backend.

use std::cell::{Cell, RefCell};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use ttp_bounds_core::test_support::matrix_from_rows;
use ttp_bounds_core::{
    ContinuationStart, Cost, DistanceMatrix, HeuristicBoundBuilder, HeuristicConfig,
    HeuristicOutcome, Team, TourState, TripConstraints,
};
use ttp_bounds_vrp::VrpRoutingSolver;

#[derive(Debug, Default)]
struct VrpWorld {
    distances: RefCell<Option<DistanceMatrix>>,
    trip_rules: Cell<Option<(usize, usize, usize)>>,
    config: Cell<HeuristicConfig>,
    streak: Cell<usize>,
    state: RefCell<Option<TourState>>,
    outcome: Cell<Option<HeuristicOutcome>>,
}

impl VrpWorld {
    fn place(&self, position: Team, streak: usize, away: Vec<Team>) {
        let state = TourState::new(0, position, away).expect("valid tour state");
        self.streak.set(streak);
        self.state.replace(Some(state));
    }

    fn compute(&self, with_trip_bounds: bool) {
        let (capacity, min, max) = self.trip_rules.get().expect("trip rules must be given");
        let constraints =
            TripConstraints::new(capacity, min, max, self.streak.get()).expect("valid trip rules");
        let solver = VrpRoutingSolver::new();
        let builder =
            HeuristicBoundBuilder::with_config(&solver, self.config.get()).expect("valid config");
        let matrix = self.distances.borrow();
        let distances = matrix.as_ref().expect("distances must be given");
        let tour = self.state.borrow();
        let state = tour.as_ref().expect("tour state must be given");
        let outcome = if with_trip_bounds {
            builder.solve_with_trip_bounds(distances, state, &constraints)
        } else {
            builder.solve(distances, state, &constraints)
        };
        self.outcome
            .set(Some(outcome.expect("vrp-core bound computed")));
    }

    fn outcome(&self) -> HeuristicOutcome {
        self.outcome.get().expect("the bound must be computed first")
    }
}

#[fixture]
fn world() -> VrpWorld {
    VrpWorld::default()
}

#[given("venues one unit from home and two units apart")]
fn triangle(world: &VrpWorld) {
    world
        .distances
        .replace(Some(matrix_from_rows(&[&[0, 1, 1], &[1, 0, 2], &[1, 2, 0]])));
}

#[given("venues on a line leading away from home")]
fn line(world: &VrpWorld) {
    world
        .distances
        .replace(Some(matrix_from_rows(&[&[0, 1, 5], &[1, 0, 1], &[5, 1, 0]])));
}

#[given("venues far from home and close to each other")]
fn cluster(world: &VrpWorld) {
    world.distances.replace(Some(matrix_from_rows(&[
        &[0, 10, 10, 10],
        &[10, 0, 1, 2],
        &[10, 1, 0, 1],
        &[10, 2, 1, 0],
    ])));
}

#[given("a trip capacity of {capacity} with between {min} and {max} trips")]
fn trip_rules(world: &VrpWorld, capacity: usize, min: usize, max: usize) {
    world.trip_rules.set(Some((capacity, min, max)));
}

#[given("the team is at home with opponents {first} and {second} left")]
fn at_home(world: &VrpWorld, first: Team, second: Team) {
    world.place(0, 0, vec![first, second]);
}

#[given("the team is away at venue {venue} after {streak} games with opponent {opponent} left")]
fn away_with_opponent(world: &VrpWorld, venue: Team, streak: usize, opponent: Team) {
    world.place(venue, streak, vec![opponent]);
}

#[given("the team is away at venue {venue} after {streak} games facing {first} and {second}")]
fn away_facing_two(world: &VrpWorld, venue: Team, streak: usize, first: Team, second: Team) {
    world.place(venue, streak, vec![first, second]);
}

#[given("the continuing trip starts from the current venue")]
fn start_at_current_venue(world: &VrpWorld) {
    world.config.set(HeuristicConfig {
        continuation_start: ContinuationStart::CurrentVenue,
        ..HeuristicConfig::default()
    });
}

#[when("the vrp-core bound is computed without trip bounds")]
fn compute_unbounded(world: &VrpWorld) {
    world.compute(false);
}

#[when("the vrp-core bound is computed with trip bounds")]
fn compute_bounded(world: &VrpWorld) {
    world.compute(true);
}

#[then("the vrp-core bound is {expected}")]
fn bound_is(world: &VrpWorld, expected: Cost) {
    assert_eq!(world.outcome(), HeuristicOutcome::Bound { cost: expected });
}

#[then("no vrp-core solution is reported")]
fn no_solution(world: &VrpWorld) {
    assert_eq!(world.outcome(), HeuristicOutcome::NoSolution);
}

#[scenario(path = "tests/features/vrp_routing.feature", index = 0)]
fn one_trip(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_routing.feature", index = 1)]
fn separate_trips(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_routing.feature", index = 2)]
fn open_trip(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_routing.feature", index = 3)]
fn no_fleet(world: VrpWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/vrp_routing.feature", index = 4)]
fn continuing_trip_from_current_venue(world: VrpWorld) {
    let _ = world;
}
