//! Route evaluation shared by routing backends.
//!
//! Routes are visit lists indexed by vehicle; the vehicle's start and end
//! nodes are implied.

use std::collections::BTreeSet;

use crate::Cost;
use crate::heuristic::instance::RoutingInstance;

/// Travel cost of one vehicle's route.
///
/// An empty route still pays for the leg from its start to its end.
#[must_use]
pub fn route_cost(instance: &RoutingInstance, vehicle: usize, visits: &[usize]) -> Cost {
    let Some(spec) = instance.vehicles().get(vehicle) else {
        return 0;
    };
    let stops = std::iter::once(spec.start)
        .chain(visits.iter().copied())
        .chain(std::iter::once(spec.end));
    stops
        .clone()
        .zip(stops.skip(1))
        .map(|(from, to)| instance.travel(from, to))
        .fold(0, Cost::saturating_add)
}

/// Load carried by one vehicle, including the demand of its start node.
#[must_use]
pub fn route_load(instance: &RoutingInstance, vehicle: usize, visits: &[usize]) -> usize {
    let start = instance
        .vehicles()
        .get(vehicle)
        .map_or(0, |spec| instance.demand(spec.start));
    start + visits.iter().map(|&node| instance.demand(node)).sum::<usize>()
}

/// Whether a route fits its vehicle's capacity.
#[must_use]
pub fn fits(instance: &RoutingInstance, vehicle: usize, visits: &[usize]) -> bool {
    instance
        .vehicles()
        .get(vehicle)
        .is_some_and(|spec| route_load(instance, vehicle, visits) <= spec.capacity)
}

/// Whether a vehicle counts as used.
#[must_use]
pub fn is_used(instance: &RoutingInstance, vehicle: usize, visits: &[usize]) -> bool {
    route_load(instance, vehicle, visits) > 0
}

/// Check routes serve every job once within capacities and required vehicles.
///
/// Returns a description of the first defect found.
pub fn check_routes(instance: &RoutingInstance, routes: &[Vec<usize>]) -> Result<(), String> {
    let fleet = instance.vehicles().len();
    if routes.len() != fleet {
        return Err(format!("{} routes for {fleet} vehicles", routes.len()));
    }
    let mut served = BTreeSet::new();
    for (vehicle, visits) in routes.iter().enumerate() {
        for &node in visits {
            if !instance.is_job(node) {
                return Err(format!("vehicle {vehicle} visits non-job node {node}"));
            }
            if !served.insert(node) {
                return Err(format!("node {node} is visited twice"));
            }
        }
        if !fits(instance, vehicle, visits) {
            return Err(format!("vehicle {vehicle} exceeds its capacity"));
        }
        if vehicle < instance.required_vehicles() && !is_used(instance, vehicle, visits) {
            return Err(format!("required vehicle {vehicle} is unused"));
        }
    }
    if let Some(job) = instance.jobs().find(|job| !served.contains(job)) {
        return Err(format!("node {job} is never visited"));
    }
    Ok(())
}

/// Give every unused required vehicle one visit taken from another route.
///
/// Each move takes the visit whose transfer adds the least cost, without
/// leaving its donor unused if the donor is itself required. Returns `false`
/// when some required vehicle cannot be filled.
pub fn repair_required_vehicles(instance: &RoutingInstance, routes: &mut [Vec<usize>]) -> bool {
    for target in 0..instance.required_vehicles() {
        let Some(visits) = routes.get(target) else {
            return false;
        };
        if is_used(instance, target, visits) {
            continue;
        }
        let Some((donor, position)) = cheapest_donation(instance, routes, target) else {
            return false;
        };
        let Some(node) = routes
            .get_mut(donor)
            .filter(|route| position < route.len())
            .map(|route| route.remove(position))
        else {
            return false;
        };
        let Some(route) = routes.get_mut(target) else {
            return false;
        };
        route.push(node);
    }
    true
}

fn cheapest_donation(
    instance: &RoutingInstance,
    routes: &[Vec<usize>],
    target: usize,
) -> Option<(usize, usize)> {
    let target_route = routes.get(target)?;
    let target_before = i128::from(route_cost(instance, target, target_route));
    let mut best: Option<(i128, usize, usize)> = None;
    for (donor, visits) in routes.iter().enumerate() {
        if donor == target {
            continue;
        }
        let donor_before = i128::from(route_cost(instance, donor, visits));
        for (position, &node) in visits.iter().enumerate() {
            let mut remaining = visits.clone();
            remaining.remove(position);
            if donor < instance.required_vehicles() && !is_used(instance, donor, &remaining) {
                continue;
            }
            let mut received = target_route.clone();
            received.push(node);
            if !fits(instance, target, &received) {
                continue;
            }
            let delta = i128::from(route_cost(instance, target, &received)) - target_before
                + i128::from(route_cost(instance, donor, &remaining))
                - donor_before;
            if best.is_none_or(|(cost, _, _)| delta < cost) {
                best = Some((delta, donor, position));
            }
        }
    }
    best.map(|(_, donor, position)| (donor, position))
}
