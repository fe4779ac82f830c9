//! Tabu search over moved nodes.

use std::collections::BTreeMap;

use super::{Context, Metaheuristic, Step};
use crate::neighbourhood::{candidates, travel_cost};

/// Iterations a moved node stays tabu.
const TENURE: u64 = 7;

/// Take the best move whose nodes are not tabu, even when it worsens the
/// plan. A tabu move is still allowed when it beats the best plan found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TabuSearch {
    tabu_until: BTreeMap<usize, u64>,
}

impl TabuSearch {
    fn is_tabu(&self, node: usize, iteration: u64) -> bool {
        self.tabu_until
            .get(&node)
            .is_some_and(|&until| iteration < until)
    }
}

impl Metaheuristic for TabuSearch {
    fn name(&self) -> &'static str {
        "TABU_SEARCH"
    }

    fn step(&mut self, context: Context<'_>) -> Step {
        let cost = travel_cost(context.instance);
        let current = i128::from(context.current_cost);
        let best = i128::from(context.best_cost);
        let chosen = candidates(context.instance, context.routes)
            .into_iter()
            .map(|candidate| (candidate.delta(context.routes, &cost), candidate))
            .filter(|(delta, candidate)| {
                current + delta < best
                    || !candidate
                        .moved
                        .iter()
                        .any(|&node| self.is_tabu(node, context.iteration))
            })
            .min_by_key(|(delta, _)| *delta);
        let Some((_, candidate)) = chosen else {
            return Step::Stop;
        };
        let until = context.iteration.saturating_add(TENURE);
        for &node in &candidate.moved {
            self.tabu_until.insert(node, until);
        }
        Step::Move(candidate)
    }
}
