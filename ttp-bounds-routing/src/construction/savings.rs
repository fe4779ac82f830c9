//! Clarke-Wright savings over asymmetric arcs.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use ttp_bounds_core::RoutingInstance;
use ttp_bounds_core::heuristic::plan;

use super::Partial;

/// Merge single-job segments in order of decreasing savings, then hand the
/// segments to the vehicles.
pub(super) fn merge(instance: &RoutingInstance) -> Option<Vec<Vec<usize>>> {
    let jobs: Vec<usize> = instance.jobs().collect();
    let limit = instance
        .vehicles()
        .iter()
        .enumerate()
        .map(|(vehicle, spec)| {
            spec.capacity
                .saturating_sub(plan::route_load(instance, vehicle, &[]))
        })
        .max()
        .unwrap_or(0);
    let mut segments: Vec<Vec<usize>> = jobs.iter().map(|&job| vec![job]).collect();
    let mut owner: BTreeMap<usize, usize> = jobs
        .iter()
        .enumerate()
        .map(|(segment, &job)| (job, segment))
        .collect();

    for (tail, head) in ranked_pairs(instance, &jobs) {
        let (Some(&front), Some(&back)) = (owner.get(&tail), owner.get(&head)) else {
            continue;
        };
        if front == back {
            continue;
        }
        let (Some(first), Some(second)) = (segments.get(front), segments.get(back)) else {
            continue;
        };
        let joinable = first.last() == Some(&tail)
            && second.first() == Some(&head)
            && load(instance, first) + load(instance, second) <= limit;
        if !joinable {
            continue;
        }
        let moved = segments.get_mut(back).map(std::mem::take).unwrap_or_default();
        for &node in &moved {
            owner.insert(node, front);
        }
        if let Some(target) = segments.get_mut(front) {
            target.extend(moved);
        }
    }
    assign(instance, segments)
}

/// Job pairs `(i, j)` with a positive saving, best first.
fn ranked_pairs(instance: &RoutingInstance, jobs: &[usize]) -> Vec<(usize, usize)> {
    let depot = RoutingInstance::DEPOT;
    let mut ranked: Vec<(Reverse<i128>, usize, usize)> = jobs
        .iter()
        .flat_map(|&tail| jobs.iter().map(move |&head| (tail, head)))
        .filter(|(tail, head)| tail != head)
        .map(|(tail, head)| {
            let saving = i128::from(instance.travel(tail, depot))
                + i128::from(instance.travel(depot, head))
                - i128::from(instance.travel(tail, head));
            (Reverse(saving), tail, head)
        })
        .filter(|(Reverse(saving), _, _)| *saving > 0)
        .collect();
    ranked.sort_unstable();
    ranked.into_iter().map(|(_, tail, head)| (tail, head)).collect()
}

fn load(instance: &RoutingInstance, segment: &[usize]) -> usize {
    segment.iter().map(|&node| instance.demand(node)).sum()
}

/// Give each segment, largest first, to the vehicle it extends most cheaply.
fn assign(instance: &RoutingInstance, segments: Vec<Vec<usize>>) -> Option<Vec<Vec<usize>>> {
    let mut ordered: Vec<Vec<usize>> = segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect();
    ordered.sort_by_key(|segment| (Reverse(load(instance, segment)), segment.first().copied()));

    let mut partial = Partial::new(instance);
    for segment in ordered {
        let (Some(&head), Some(&tail)) = (segment.first(), segment.last()) else {
            continue;
        };
        let demand = load(instance, &segment);
        let (_, vehicle) = instance
            .vehicles()
            .iter()
            .enumerate()
            .filter(|&(vehicle, _)| partial.room(vehicle) >= demand)
            .map(|(vehicle, spec)| {
                let from = partial.end(vehicle);
                let delta = i128::from(instance.travel(from, head))
                    + i128::from(instance.travel(tail, spec.end))
                    - i128::from(instance.travel(from, spec.end));
                (delta, vehicle)
            })
            .min()?;
        for node in segment {
            partial.push(vehicle, node);
        }
    }
    partial.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ttp_bounds_core::HeuristicConfig;
    use ttp_bounds_core::heuristic::VehicleSpec;

    fn instance(capacity: usize, fleet: usize) -> RoutingInstance {
        let vehicle = VehicleSpec {
            capacity,
            start: 0,
            end: 0,
        };
        RoutingInstance::new(
            vec![
                vec![0, 5, 5, 9],
                vec![5, 0, 1, 9],
                vec![5, 1, 0, 9],
                vec![9, 9, 9, 0],
            ],
            vec![0, 1, 1, 1],
            vec![vehicle; fleet],
            0,
            HeuristicConfig::default().search_parameters(false),
        )
        .expect("valid instance")
    }

    #[rstest]
    fn close_jobs_share_a_route() {
        let routes = merge(&instance(2, 2)).expect("feasible");
        assert!(routes.iter().any(|route| route.len() == 2 && !route.contains(&3)));
        assert_eq!(plan::check_routes(&instance(2, 2), &routes), Ok(()));
    }

    #[rstest]
    fn capacity_limits_merging() {
        assert_eq!(merge(&instance(1, 2)), None);
        let routes = merge(&instance(1, 3)).expect("one job per vehicle");
        assert!(routes.iter().all(|route| route.len() == 1));
    }
}
