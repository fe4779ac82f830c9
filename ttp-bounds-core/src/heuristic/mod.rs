//! Heuristic remaining-travel bound.
//!
//! [`HeuristicBoundBuilder`] states the remaining travel as a capacitated
//! vehicle routing instance: home is the depot, every away venue is a job of
//! demand one, and an open trip becomes a continuation node carrying the
//! games already played on it. A [`RoutingSolver`] routes the fleet; the bound
//! is the total route length.

mod config;
mod instance;
pub mod plan;
mod solver;

use log::{debug, error, warn};

pub use config::{
    ContinuationStart, FirstSolutionStrategy, HeuristicConfig, LocalSearchMetaheuristic,
};
pub use instance::{RoutingInstance, SearchParameters, VehicleSpec};
pub use solver::{RoutingError, RoutingSolution, RoutingSolver};

use crate::{BoundError, ConfigError, Cost, DistanceMatrix, Team, TourState, TripConstraints};

/// Cost of arcs a route must never use.
///
/// Any total at or above this value means such an arc was selected.
pub const PENALTY_COST: Cost = 1 << 40;

/// Result of a heuristic bound computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicOutcome {
    /// Total length of the routes found.
    Bound {
        /// Remaining travel cost.
        cost: Cost,
    },
    /// The solver found no routes.
    NoSolution,
}

impl HeuristicOutcome {
    /// The bound, if routes were found.
    #[must_use]
    pub const fn cost(self) -> Option<Cost> {
        match self {
            Self::Bound { cost } => Some(cost),
            Self::NoSolution => None,
        }
    }

    /// The bound, reporting a missing solution as `0`.
    #[must_use]
    pub const fn legacy_value(self) -> Cost {
        match self {
            Self::Bound { cost } => cost,
            Self::NoSolution => 0,
        }
    }
}

/// Fleet sizing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fleet {
    /// One vehicle per away team, plus the continuation vehicle.
    PerAwayTeam,
    /// Exactly as many vehicles as trips allowed, a minimum of them used.
    TripBounds,
}

/// An instance together with the cost of legs forced before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInstance {
    /// The routing instance.
    pub instance: RoutingInstance,
    /// Cost added to every solution, for a trip that must end first.
    pub forced_cost: Cost,
    /// Venue of each instance node.
    pub venues: Vec<Team>,
}

/// Builds routing instances and sums the routes a solver returns.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::test_support::ExhaustiveRoutingSolver;
/// use ttp_bounds_core::{DistanceMatrix, HeuristicBoundBuilder, TourState, TripConstraints};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let distances = DistanceMatrix::new(vec![vec![0, 1, 1], vec![1, 0, 2], vec![1, 2, 0]])?;
/// let state = TourState::new(0, 0, [1, 2])?;
/// let constraints = TripConstraints::new(1, 2, 2, 0)?;
/// let solver = ExhaustiveRoutingSolver::default();
/// let outcome = HeuristicBoundBuilder::new(&solver).solve(&distances, &state, &constraints)?;
/// assert_eq!(outcome.cost(), Some(4));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HeuristicBoundBuilder<'s, S: ?Sized> {
    solver: &'s S,
    config: HeuristicConfig,
}

impl<'s, S> HeuristicBoundBuilder<'s, S>
where
    S: RoutingSolver + ?Sized,
{
    /// Construct a builder using default configuration.
    #[must_use]
    pub fn new(solver: &'s S) -> Self {
        Self {
            solver,
            config: HeuristicConfig::default(),
        }
    }

    /// Construct a builder with explicit, validated configuration.
    pub fn with_config(solver: &'s S, config: HeuristicConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { solver, config })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Bound the remaining travel with no limit on the number of trips.
    ///
    /// The trip bounds of `constraints` are ignored.
    pub fn solve(
        &self,
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Result<HeuristicOutcome, BoundError> {
        self.solve_fleet(distances, state, constraints, Fleet::PerAwayTeam)
    }

    /// Bound the remaining travel using between `min_trips` and `max_trips`
    /// trips.
    pub fn solve_with_trip_bounds(
        &self,
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Result<HeuristicOutcome, BoundError> {
        self.solve_fleet(distances, state, constraints, Fleet::TripBounds)
    }

    /// Build the instance [`Self::solve`] would hand to the solver.
    ///
    /// Returns `None` when no fleet can serve the away set.
    pub fn prepare(
        &self,
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Result<Option<PreparedInstance>, BoundError> {
        state.validate(distances, constraints)?;
        prepare_instance(
            distances,
            state,
            constraints,
            Fleet::PerAwayTeam,
            &self.config,
        )
    }

    /// Build the instance [`Self::solve_with_trip_bounds`] would hand to the
    /// solver.
    ///
    /// Returns `None` when no fleet can serve the away set.
    pub fn prepare_with_trip_bounds(
        &self,
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Result<Option<PreparedInstance>, BoundError> {
        state.validate(distances, constraints)?;
        prepare_instance(
            distances,
            state,
            constraints,
            Fleet::TripBounds,
            &self.config,
        )
    }

    fn solve_fleet(
        &self,
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
        fleet: Fleet,
    ) -> Result<HeuristicOutcome, BoundError> {
        state.validate(distances, constraints)?;
        if state.away_teams().is_empty() {
            let cost = Cost::from(distances.cost(state.position(), state.home()));
            return Ok(HeuristicOutcome::Bound { cost });
        }
        let Some(prepared) = prepare_instance(distances, state, constraints, fleet, &self.config)?
        else {
            warn!("no fleet within the trip bounds can serve the away set");
            return Ok(HeuristicOutcome::NoSolution);
        };
        let instance = &prepared.instance;
        debug!(
            "routing {} nodes with {} vehicles ({} required) using {} and {}",
            instance.node_count(),
            instance.vehicles().len(),
            instance.required_vehicles(),
            instance.search().first_solution.name(),
            instance.search().metaheuristic.name()
        );

        let Some(solution) = self.solver.solve(instance)? else {
            warn!("routing solver found no solution");
            return Ok(HeuristicOutcome::NoSolution);
        };
        solution.validate(instance)?;
        let routed = solution.cost(instance);
        if routed >= PENALTY_COST {
            error!("routes cost {routed}, at or above the penalty sentinel {PENALTY_COST}");
            return Err(BoundError::PenaltyArcSelected {
                cost: routed,
                sentinel: PENALTY_COST,
            });
        }
        let cost = routed + prepared.forced_cost;
        debug!("heuristic bound {cost}");
        Ok(HeuristicOutcome::Bound { cost })
    }
}

fn prepare_instance(
    distances: &DistanceMatrix,
    state: &TourState,
    constraints: &TripConstraints,
    fleet: Fleet,
    config: &HeuristicConfig,
) -> Result<Option<PreparedInstance>, BoundError> {
    let home = state.home();
    let position = state.position();
    let capacity = constraints.capacity();
    let continuation = constraints.continues_open_trip();
    let full_trip = state.is_away() && !continuation;

    let venues: Vec<Team> = std::iter::once(home)
        .chain(continuation.then_some(position))
        .chain(state.away_teams().iter().copied())
        .collect();
    let arcs = venues
        .iter()
        .enumerate()
        .map(|(from_index, &from)| {
            venues
                .iter()
                .enumerate()
                .map(|(to_index, &to)| match (continuation, from_index, to_index) {
                    (true, 0, 1) => 0,
                    (true, _, 1) if from_index > 1 => PENALTY_COST,
                    _ => Cost::from(distances.cost(from, to)),
                })
                .collect()
        })
        .collect();
    let demands: Vec<usize> = (0..venues.len())
        .map(|node| match node {
            0 => 0,
            1 if continuation => constraints.streak(),
            _ => 1,
        })
        .collect();

    let forced_trips = usize::from(full_trip);
    let (count, required) = match fleet {
        Fleet::PerAwayTeam => (state.away_teams().len() + usize::from(continuation), 0),
        Fleet::TripBounds => (
            constraints.max_trips().saturating_sub(forced_trips),
            constraints.min_trips().saturating_sub(forced_trips),
        ),
    };
    if count == 0 {
        return Ok(None);
    }
    let start_at_venue = continuation && config.continuation_start == ContinuationStart::CurrentVenue;
    let vehicles = (0..count)
        .map(|vehicle| VehicleSpec {
            capacity,
            start: usize::from(vehicle == 0 && start_at_venue),
            end: RoutingInstance::DEPOT,
        })
        .collect();
    let search = config.search_parameters(fleet == Fleet::TripBounds);
    let instance = RoutingInstance::new(arcs, demands, vehicles, required.min(count), search)?;
    let forced_cost = if full_trip {
        Cost::from(distances.cost(position, home))
    } else {
        0
    };
    Ok(Some(PreparedInstance {
        instance,
        forced_cost,
        venues,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ExhaustiveRoutingSolver, matrix_from_rows};
    use rstest::{fixture, rstest};

    #[fixture]
    fn square() -> DistanceMatrix {
        matrix_from_rows(&[
            &[0, 2, 3, 4],
            &[2, 0, 1, 5],
            &[3, 1, 0, 2],
            &[4, 5, 2, 0],
        ])
    }

    fn constraints(capacity: usize, min: usize, max: usize, streak: usize) -> TripConstraints {
        TripConstraints::new(capacity, min, max, streak).expect("valid constraints")
    }

    fn builder(solver: &ExhaustiveRoutingSolver) -> HeuristicBoundBuilder<'_, ExhaustiveRoutingSolver> {
        HeuristicBoundBuilder::new(solver)
    }

    #[rstest]
    fn continuation_node_follows_the_depot(square: DistanceMatrix) {
        let solver = ExhaustiveRoutingSolver::default();
        let state = TourState::new(0, 1, [2, 3]).expect("valid state");
        let prepared = builder(&solver)
            .prepare(&square, &state, &constraints(3, 0, 3, 1))
            .expect("valid input")
            .expect("non-empty fleet");
        let instance = &prepared.instance;
        assert_eq!(prepared.venues, vec![0, 1, 2, 3]);
        assert_eq!(instance.demands(), &[0, 1, 1, 1]);
        assert_eq!(instance.arc(0, 1), Some(0));
        assert_eq!(instance.arc(2, 1), Some(PENALTY_COST));
        assert_eq!(instance.arc(1, 2), Some(1));
        assert_eq!(instance.vehicles().len(), 3);
        assert_eq!(prepared.forced_cost, 0);
    }

    #[rstest]
    fn full_trip_is_forced_home(square: DistanceMatrix) {
        let solver = ExhaustiveRoutingSolver::default();
        let state = TourState::new(0, 1, [2, 3]).expect("valid state");
        let prepared = builder(&solver)
            .prepare_with_trip_bounds(&square, &state, &constraints(2, 2, 3, 2))
            .expect("valid input")
            .expect("non-empty fleet");
        assert_eq!(prepared.venues, vec![0, 2, 3]);
        assert_eq!(prepared.forced_cost, 2);
        assert_eq!(prepared.instance.vehicles().len(), 2);
        assert_eq!(prepared.instance.required_vehicles(), 1);
    }

    #[rstest]
    fn vehicle_may_start_at_the_current_venue(square: DistanceMatrix) {
        let solver = ExhaustiveRoutingSolver::default();
        let config = HeuristicConfig {
            continuation_start: ContinuationStart::CurrentVenue,
            ..HeuristicConfig::default()
        };
        let builder = HeuristicBoundBuilder::with_config(&solver, config).expect("valid config");
        let state = TourState::new(0, 1, [2, 3]).expect("valid state");
        let prepared = builder
            .prepare(&square, &state, &constraints(3, 0, 3, 1))
            .expect("valid input")
            .expect("non-empty fleet");
        assert_eq!(prepared.instance.vehicles().first().map(|v| v.start), Some(1));
        assert_eq!(prepared.instance.jobs().collect::<Vec<_>>(), vec![2, 3]);
        let outcome = builder
            .solve(&square, &state, &constraints(3, 0, 3, 1))
            .expect("solved");
        assert_eq!(outcome.cost(), Some(7));
    }

    #[rstest]
    #[case(ContinuationStart::Depot)]
    #[case(ContinuationStart::CurrentVenue)]
    fn open_trip_continues_before_returning(square: DistanceMatrix, #[case] start: ContinuationStart) {
        let solver = ExhaustiveRoutingSolver::default();
        let config = HeuristicConfig {
            continuation_start: start,
            ..HeuristicConfig::default()
        };
        let builder = HeuristicBoundBuilder::with_config(&solver, config).expect("valid config");
        let state = TourState::new(0, 1, [2, 3]).expect("valid state");
        let outcome = builder
            .solve(&square, &state, &constraints(3, 0, 3, 1))
            .expect("solved");
        assert_eq!(outcome, HeuristicOutcome::Bound { cost: 7 });
    }

    #[rstest]
    fn trip_bounds_force_extra_trips(square: DistanceMatrix) {
        let solver = ExhaustiveRoutingSolver::default();
        let state = TourState::new(0, 0, [2, 3]).expect("valid state");
        let one_trip = builder(&solver)
            .solve_with_trip_bounds(&square, &state, &constraints(2, 1, 1, 0))
            .expect("solved");
        let two_trips = builder(&solver)
            .solve_with_trip_bounds(&square, &state, &constraints(2, 2, 2, 0))
            .expect("solved");
        assert_eq!(one_trip.cost(), Some(9));
        assert_eq!(two_trips.cost(), Some(14));
    }

    #[rstest]
    fn zero_trips_allowed_has_no_solution(square: DistanceMatrix) {
        let solver = ExhaustiveRoutingSolver::default();
        let state = TourState::new(0, 1, [2]).expect("valid state");
        let outcome = builder(&solver)
            .solve_with_trip_bounds(&square, &state, &constraints(1, 0, 1, 1))
            .expect("solved");
        assert_eq!(outcome, HeuristicOutcome::NoSolution);
        assert_eq!(outcome.legacy_value(), 0);
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(3, 1, 4)]
    fn empty_away_set_returns_the_trip_home(
        square: DistanceMatrix,
        #[case] position: Team,
        #[case] streak: usize,
        #[case] expected: Cost,
    ) {
        let solver = ExhaustiveRoutingSolver::default();
        let state = TourState::new(0, position, []).expect("valid state");
        let outcome = builder(&solver)
            .solve(&square, &state, &constraints(2, 0, 2, streak))
            .expect("solved");
        assert_eq!(outcome.cost(), Some(expected));
        assert_eq!(solver.calls(), 0);
    }
}
