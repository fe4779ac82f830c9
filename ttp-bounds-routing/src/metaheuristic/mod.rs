//! Improvement strategies driven by [`crate::search::improve`].
//!
//! A [`Metaheuristic`] looks at the current plan and chooses the next move,
//! idles for an iteration, or ends the search. The driver owns the plan and
//! keeps the cheapest one seen.

mod annealing;
mod greedy;
mod guided;
mod tabu;

use rand_chacha::ChaCha8Rng;
use ttp_bounds_core::{Cost, LocalSearchMetaheuristic, RoutingInstance};

use crate::neighbourhood::Candidate;

pub(crate) use annealing::SimulatedAnnealing;
pub(crate) use greedy::GreedyDescent;
pub(crate) use guided::GuidedLocalSearch;
pub(crate) use tabu::TabuSearch;

/// What the search sees when choosing its next step.
pub(crate) struct Context<'a> {
    pub(crate) instance: &'a RoutingInstance,
    pub(crate) routes: &'a [Vec<usize>],
    pub(crate) current_cost: Cost,
    pub(crate) best_cost: Cost,
    pub(crate) iteration: u64,
    pub(crate) rng: &'a mut ChaCha8Rng,
}

/// Outcome of one iteration.
#[derive(Debug)]
pub(crate) enum Step {
    /// Apply the candidate.
    Move(Candidate),
    /// Keep the plan, for instance after updating penalties.
    Idle,
    /// Nothing left to try.
    Stop,
}

pub(crate) trait Metaheuristic {
    fn name(&self) -> &'static str;

    fn step(&mut self, context: Context<'_>) -> Step;
}

/// The strategy named by `kind`.
pub(crate) fn select(kind: LocalSearchMetaheuristic, instance: &RoutingInstance) -> Box<dyn Metaheuristic> {
    match kind {
        LocalSearchMetaheuristic::Automatic | LocalSearchMetaheuristic::GreedyDescent => {
            Box::new(GreedyDescent)
        }
        LocalSearchMetaheuristic::GuidedLocalSearch => {
            Box::new(GuidedLocalSearch::new(instance.node_count()))
        }
        LocalSearchMetaheuristic::SimulatedAnnealing => Box::new(SimulatedAnnealing::default()),
        LocalSearchMetaheuristic::TabuSearch => Box::new(TabuSearch::default()),
    }
}
