//! First-plan construction.
//!
//! Each [`FirstSolutionStrategy`] maps to a deterministic builder. When the
//! requested builder cannot place every job, the fallbacks are tried in
//! order before the instance is declared unsolvable.

mod cheapest_arc;
mod insertion;
mod savings;

use std::collections::BTreeSet;

use log::debug;
use ttp_bounds_core::heuristic::plan;
use ttp_bounds_core::{Cost, FirstSolutionStrategy, RoutingInstance};

/// Builders tried after the requested one fails.
const FALLBACKS: [FirstSolutionStrategy; 2] = [
    FirstSolutionStrategy::ParallelCheapestInsertion,
    FirstSolutionStrategy::FirstUnboundMinValue,
];

/// Build a plan that passes [`plan::check_routes`], or `None` when no builder
/// finds one.
pub(crate) fn build(
    instance: &RoutingInstance,
    strategy: FirstSolutionStrategy,
) -> Option<Vec<Vec<usize>>> {
    std::iter::once(strategy)
        .chain(FALLBACKS)
        .find_map(|candidate| {
            let mut routes = construct(instance, candidate)?;
            if !plan::repair_required_vehicles(instance, &mut routes) {
                debug!("{} left a required vehicle unused", candidate.name());
                return None;
            }
            match plan::check_routes(instance, &routes) {
                Ok(()) => Some(routes),
                Err(reason) => {
                    debug!("{} built an invalid plan: {reason}", candidate.name());
                    None
                }
            }
        })
}

fn construct(
    instance: &RoutingInstance,
    strategy: FirstSolutionStrategy,
) -> Option<Vec<Vec<usize>>> {
    match strategy {
        FirstSolutionStrategy::Automatic | FirstSolutionStrategy::PathCheapestArc => {
            cheapest_arc::path(instance)
        }
        FirstSolutionStrategy::LocalCheapestArc => cheapest_arc::local(instance),
        FirstSolutionStrategy::FirstUnboundMinValue => first_unbound(instance),
        FirstSolutionStrategy::Savings => savings::merge(instance),
        FirstSolutionStrategy::ParallelCheapestInsertion => insertion::parallel(instance),
    }
}

/// Fill each vehicle in turn with the lowest-numbered jobs that fit.
fn first_unbound(instance: &RoutingInstance) -> Option<Vec<Vec<usize>>> {
    let mut partial = Partial::new(instance);
    for vehicle in 0..instance.vehicles().len() {
        loop {
            let next = partial
                .unrouted()
                .find(|&candidate| partial.has_room(vehicle, candidate));
            let Some(node) = next else {
                break;
            };
            partial.push(vehicle, node);
        }
    }
    partial.finish()
}

/// Routes under construction.
#[derive(Debug)]
struct Partial<'i> {
    instance: &'i RoutingInstance,
    routes: Vec<Vec<usize>>,
    loads: Vec<usize>,
    unrouted: BTreeSet<usize>,
}

impl<'i> Partial<'i> {
    fn new(instance: &'i RoutingInstance) -> Self {
        let fleet = instance.vehicles().len();
        Self {
            instance,
            routes: vec![Vec::new(); fleet],
            loads: (0..fleet)
                .map(|vehicle| plan::route_load(instance, vehicle, &[]))
                .collect(),
            unrouted: instance.jobs().collect(),
        }
    }

    fn unrouted(&self) -> impl Iterator<Item = usize> + '_ {
        self.unrouted.iter().copied()
    }

    /// Load `vehicle` can still take on.
    fn room(&self, vehicle: usize) -> usize {
        let capacity = self.instance.vehicles().get(vehicle).map_or(0, |spec| spec.capacity);
        self.loads
            .get(vehicle)
            .map_or(0, |&load| capacity.saturating_sub(load))
    }

    fn has_room(&self, vehicle: usize, node: usize) -> bool {
        self.instance.demand(node) <= self.room(vehicle)
    }

    /// Node the vehicle currently stands at.
    fn end(&self, vehicle: usize) -> usize {
        self.routes
            .get(vehicle)
            .and_then(|route| route.last().copied())
            .or_else(|| self.instance.vehicles().get(vehicle).map(|spec| spec.start))
            .unwrap_or(RoutingInstance::DEPOT)
    }

    /// Cheapest job that still fits `vehicle`, measured from its current end.
    fn nearest(&self, vehicle: usize) -> Option<(Cost, usize)> {
        let from = self.end(vehicle);
        self.unrouted()
            .filter(|&node| self.has_room(vehicle, node))
            .map(|node| (self.instance.travel(from, node), node))
            .min()
    }

    fn insert(&mut self, vehicle: usize, position: usize, node: usize) {
        let demand = self.instance.demand(node);
        if let (Some(route), Some(load)) = (self.routes.get_mut(vehicle), self.loads.get_mut(vehicle))
        {
            route.insert(position.min(route.len()), node);
            *load += demand;
            self.unrouted.remove(&node);
        }
    }

    fn push(&mut self, vehicle: usize, node: usize) {
        let position = self.routes.get(vehicle).map_or(0, Vec::len);
        self.insert(vehicle, position, node);
    }

    /// The routes, if every job was placed.
    fn finish(self) -> Option<Vec<Vec<usize>>> {
        self.unrouted.is_empty().then_some(self.routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use ttp_bounds_core::HeuristicConfig;
    use ttp_bounds_core::heuristic::VehicleSpec;

    fn vehicles(count: usize, capacity: usize) -> Vec<VehicleSpec> {
        vec![
            VehicleSpec {
                capacity,
                start: 0,
                end: 0,
            };
            count
        ]
    }

    #[fixture]
    fn square() -> RoutingInstance {
        RoutingInstance::new(
            vec![
                vec![0, 2, 3, 4],
                vec![2, 0, 1, 5],
                vec![3, 1, 0, 2],
                vec![4, 5, 2, 0],
            ],
            vec![0, 1, 1, 1],
            vehicles(3, 2),
            2,
            HeuristicConfig::default().search_parameters(true),
        )
        .expect("valid instance")
    }

    #[rstest]
    #[case(FirstSolutionStrategy::Automatic)]
    #[case(FirstSolutionStrategy::PathCheapestArc)]
    #[case(FirstSolutionStrategy::LocalCheapestArc)]
    #[case(FirstSolutionStrategy::FirstUnboundMinValue)]
    #[case(FirstSolutionStrategy::Savings)]
    #[case(FirstSolutionStrategy::ParallelCheapestInsertion)]
    fn every_strategy_builds_a_valid_plan(
        square: RoutingInstance,
        #[case] strategy: FirstSolutionStrategy,
    ) {
        let routes = build(&square, strategy).expect("feasible instance");
        assert_eq!(plan::check_routes(&square, &routes), Ok(()));
    }

    #[rstest]
    fn first_unbound_fills_vehicles_in_order(square: RoutingInstance) {
        let routes = first_unbound(&square).expect("every job placed");
        assert_eq!(routes, vec![vec![1, 2], vec![3], vec![]]);
    }

    #[rstest]
    fn too_small_fleet_has_no_plan() {
        let instance = RoutingInstance::new(
            vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]],
            vec![0, 1, 1],
            vehicles(1, 1),
            0,
            HeuristicConfig::default().search_parameters(false),
        )
        .expect("valid instance");
        assert_eq!(build(&instance, FirstSolutionStrategy::Savings), None);
    }

    #[rstest]
    fn required_vehicles_beyond_the_jobs_have_no_plan() {
        let instance = RoutingInstance::new(
            vec![vec![0, 1], vec![1, 0]],
            vec![0, 1],
            vehicles(2, 1),
            2,
            HeuristicConfig::default().search_parameters(true),
        )
        .expect("valid instance");
        assert_eq!(build(&instance, FirstSolutionStrategy::PathCheapestArc), None);
    }
}
