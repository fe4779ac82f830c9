//! Move one visit to another position, in its own route or another.

use ttp_bounds_core::RoutingInstance;

use super::{Candidate, Move, Slot, feasible};

pub(super) fn collect(instance: &RoutingInstance, routes: &[Vec<usize>], found: &mut Vec<Candidate>) {
    for (from_vehicle, route) in routes.iter().enumerate() {
        for (from_position, &node) in route.iter().enumerate() {
            let mut remaining = route.clone();
            remaining.remove(from_position);
            for (to_vehicle, target) in routes.iter().enumerate() {
                let same_route = to_vehicle == from_vehicle;
                let base = if same_route { &remaining } else { target };
                for to_position in 0..=base.len() {
                    if same_route && to_position == from_position {
                        continue;
                    }
                    let mut received = base.clone();
                    received.insert(to_position, node);
                    let changes = if same_route {
                        vec![(from_vehicle, received)]
                    } else {
                        vec![(from_vehicle, remaining.clone()), (to_vehicle, received)]
                    };
                    let kind = Move::Relocate {
                        from: Slot {
                            vehicle: from_vehicle,
                            position: from_position,
                        },
                        to: Slot {
                            vehicle: to_vehicle,
                            position: to_position,
                        },
                    };
                    found.extend(feasible(instance, kind, vec![node], changes));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use ttp_bounds_core::HeuristicConfig;
    use ttp_bounds_core::heuristic::VehicleSpec;

    #[rstest]
    fn relocates_within_and_across_routes() {
        let vehicle = VehicleSpec {
            capacity: 3,
            start: 0,
            end: 0,
        };
        let instance = RoutingInstance::new(
            vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]],
            vec![0, 1, 1],
            vec![vehicle, vehicle],
            0,
            HeuristicConfig::default().search_parameters(false),
        )
        .expect("valid instance");
        let mut found = Vec::new();
        collect(&instance, &[vec![1, 2], vec![]], &mut found);
        // Each visit has one other slot in its route and one in the empty route.
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|candidate| candidate.moved.len() == 1));
    }
}
