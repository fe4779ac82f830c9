//! Steepest descent.

use super::{Context, Metaheuristic, Step};
use crate::neighbourhood::{candidates, travel_cost};

/// Take the most improving move until none improves.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GreedyDescent;

impl Metaheuristic for GreedyDescent {
    fn name(&self) -> &'static str {
        "GREEDY_DESCENT"
    }

    fn step(&mut self, context: Context<'_>) -> Step {
        let cost = travel_cost(context.instance);
        let best = candidates(context.instance, context.routes)
            .into_iter()
            .map(|candidate| (candidate.delta(context.routes, &cost), candidate))
            .filter(|(delta, _)| *delta < 0)
            .min_by_key(|(delta, _)| *delta);
        best.map_or(Step::Stop, |(_, candidate)| Step::Move(candidate))
    }
}
