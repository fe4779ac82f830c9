//! Guided local search.
//!
//! Descends on the augmented cost `c(s) + λ·Σ p(a)·c(a)` over the arcs `a` of
//! plan `s`, with `λ = 0.1`. At a local optimum of the augmented cost the
//! arcs of highest utility `c(a) / (1 + p(a))` gain one penalty unit. Costs
//! are scaled by `1/λ` so that the arithmetic stays integral.

use ttp_bounds_core::RoutingInstance;

use super::{Context, Metaheuristic, Step};
use crate::neighbourhood::candidates;

/// `1/λ`.
const LAMBDA_INVERSE: i128 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GuidedLocalSearch {
    size: usize,
    penalties: Vec<u64>,
}

impl GuidedLocalSearch {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            size,
            penalties: vec![0; size.saturating_mul(size)],
        }
    }

    fn index(&self, from: usize, to: usize) -> Option<usize> {
        (from < self.size && to < self.size).then(|| from * self.size + to)
    }

    fn penalty(&self, from: usize, to: usize) -> u64 {
        self.index(from, to)
            .and_then(|index| self.penalties.get(index))
            .copied()
            .unwrap_or(0)
    }

    fn augmented_cost(&self, instance: &RoutingInstance, vehicle: usize, visits: &[usize]) -> i128 {
        arcs(instance, vehicle, visits)
            .map(|(from, to)| {
                let cost = i128::from(instance.travel(from, to));
                cost * (LAMBDA_INVERSE + i128::from(self.penalty(from, to)))
            })
            .sum()
    }

    /// Add a penalty unit to every arc of maximal utility in the plan.
    fn penalise(&mut self, instance: &RoutingInstance, routes: &[Vec<usize>]) {
        let used: Vec<(usize, usize)> = routes
            .iter()
            .enumerate()
            .flat_map(|(vehicle, visits)| arcs(instance, vehicle, visits).collect::<Vec<_>>())
            .collect();
        let utility = |&(from, to): &(usize, usize)| {
            (
                i128::from(instance.travel(from, to)),
                1 + i128::from(self.penalty(from, to)),
            )
        };
        let Some(top) = used.iter().map(utility).reduce(|best, next| {
            if next.0 * best.1 > best.0 * next.1 {
                next
            } else {
                best
            }
        }) else {
            return;
        };
        let chosen: Vec<(usize, usize)> = used
            .iter()
            .copied()
            .filter(|arc| {
                let (cost, weight) = utility(arc);
                cost * top.1 == top.0 * weight
            })
            .collect();
        for (from, to) in chosen {
            if let Some(slot) = self
                .index(from, to)
                .and_then(|index| self.penalties.get_mut(index))
            {
                *slot = slot.saturating_add(1);
            }
        }
    }
}

impl Metaheuristic for GuidedLocalSearch {
    fn name(&self) -> &'static str {
        "GUIDED_LOCAL_SEARCH"
    }

    fn step(&mut self, context: Context<'_>) -> Step {
        let instance = context.instance;
        let best = {
            let augmented =
                |vehicle: usize, visits: &[usize]| self.augmented_cost(instance, vehicle, visits);
            candidates(instance, context.routes)
                .into_iter()
                .map(|candidate| (candidate.delta(context.routes, augmented), candidate))
                .filter(|(delta, _)| *delta < 0)
                .min_by_key(|(delta, _)| *delta)
        };
        if let Some((_, candidate)) = best {
            return Step::Move(candidate);
        }
        self.penalise(instance, context.routes);
        Step::Idle
    }
}

/// Arcs travelled by one vehicle, from its start to its end.
fn arcs<'r>(
    instance: &RoutingInstance,
    vehicle: usize,
    visits: &'r [usize],
) -> impl Iterator<Item = (usize, usize)> + 'r {
    let (start, end) = instance
        .vehicles()
        .get(vehicle)
        .map_or((RoutingInstance::DEPOT, RoutingInstance::DEPOT), |spec| {
            (spec.start, spec.end)
        });
    let stops = std::iter::once(start)
        .chain(visits.iter().copied())
        .chain(std::iter::once(end));
    stops.clone().zip(stops.skip(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;
    use ttp_bounds_core::HeuristicConfig;
    use ttp_bounds_core::heuristic::VehicleSpec;

    fn instance() -> RoutingInstance {
        let vehicle = VehicleSpec {
            capacity: 2,
            start: 0,
            end: 0,
        };
        RoutingInstance::new(
            vec![vec![0, 1, 4], vec![1, 0, 1], vec![4, 1, 0]],
            vec![0, 1, 1],
            vec![vehicle],
            0,
            HeuristicConfig::default().search_parameters(false),
        )
        .expect("valid instance")
    }

    #[rstest]
    fn penalises_the_most_useful_arcs_at_a_local_optimum() {
        let instance = instance();
        let mut search = GuidedLocalSearch::new(instance.node_count());
        let routes = vec![vec![1, 2]];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let step = search.step(Context {
            instance: &instance,
            routes: &routes,
            current_cost: 6,
            best_cost: 6,
            iteration: 0,
            rng: &mut rng,
        });
        assert!(matches!(step, Step::Idle));
        assert_eq!(search.penalty(2, 0), 1);
        assert_eq!(search.penalty(0, 1), 0);
        assert_eq!(search.augmented_cost(&instance, 0, &[1, 2]), 10 + 10 + 40 + 4);
    }
}
