//! The improvement loop shared by every metaheuristic.

use std::time::Instant;

use log::{debug, trace};
use rand_chacha::ChaCha8Rng;
use ttp_bounds_core::heuristic::plan;
use ttp_bounds_core::{Cost, RoutingInstance, SearchParameters};

use crate::metaheuristic::{Context, Metaheuristic, Step};

/// When the improvement loop must stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limits {
    iterations: Option<u64>,
    deadline: Option<Instant>,
}

impl Limits {
    /// Derive limits from the instance's search parameters.
    ///
    /// A metaheuristic that never stops by itself falls back to
    /// `default_iterations` when neither limit is set.
    pub(crate) fn new(search: &SearchParameters, default_iterations: u64, started: Instant) -> Self {
        let open_ended = search.metaheuristic.needs_limit() && search.time_limit.is_none();
        Self {
            iterations: search
                .solution_limit
                .or_else(|| open_ended.then_some(default_iterations)),
            deadline: search
                .time_limit
                .and_then(|limit| started.checked_add(limit)),
        }
    }

    fn reached(&self, iteration: u64) -> bool {
        self.iterations.is_some_and(|limit| iteration >= limit)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Total travel cost of a plan.
pub(crate) fn plan_cost(instance: &RoutingInstance, routes: &[Vec<usize>]) -> Cost {
    routes
        .iter()
        .enumerate()
        .map(|(vehicle, visits)| plan::route_cost(instance, vehicle, visits))
        .fold(0, Cost::saturating_add)
}

/// Run `strategy` from `routes` and return the cheapest plan visited.
pub(crate) fn improve(
    instance: &RoutingInstance,
    routes: Vec<Vec<usize>>,
    strategy: &mut dyn Metaheuristic,
    limits: &Limits,
    rng: &mut ChaCha8Rng,
) -> Vec<Vec<usize>> {
    let mut current = routes;
    let mut current_cost = plan_cost(instance, &current);
    let mut best = current.clone();
    let mut best_cost = current_cost;
    let mut iteration = 0_u64;
    while !limits.reached(iteration) {
        let step = strategy.step(Context {
            instance,
            routes: &current,
            current_cost,
            best_cost,
            iteration,
            rng: &mut *rng,
        });
        iteration = iteration.saturating_add(1);
        match step {
            Step::Move(candidate) => {
                trace!("{}: {}", strategy.name(), candidate.kind);
                candidate.apply(&mut current);
                current_cost = plan_cost(instance, &current);
                if current_cost < best_cost {
                    best_cost = current_cost;
                    best.clone_from(&current);
                }
            }
            Step::Idle => {}
            Step::Stop => break,
        }
    }
    debug!(
        "{} finished after {iteration} iterations with cost {best_cost}",
        strategy.name()
    );
    best
}
