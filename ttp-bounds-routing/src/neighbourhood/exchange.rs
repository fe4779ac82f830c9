//! Swap two visits, in one route or across two.

use ttp_bounds_core::RoutingInstance;

use super::{Candidate, Move, Slot, feasible};

pub(super) fn collect(instance: &RoutingInstance, routes: &[Vec<usize>], found: &mut Vec<Candidate>) {
    let slots: Vec<(Slot, usize)> = routes
        .iter()
        .enumerate()
        .flat_map(|(vehicle, route)| {
            route
                .iter()
                .enumerate()
                .map(move |(position, &node)| (Slot { vehicle, position }, node))
        })
        .collect();
    for (index, &(first, first_node)) in slots.iter().enumerate() {
        for &(second, second_node) in slots.iter().skip(index + 1) {
            let changes = if first.vehicle == second.vehicle {
                let mut swapped = routes.get(first.vehicle).cloned().unwrap_or_default();
                swapped.swap(first.position, second.position);
                vec![(first.vehicle, swapped)]
            } else {
                let (Some(mut left), Some(mut right)) = (
                    routes.get(first.vehicle).cloned(),
                    routes.get(second.vehicle).cloned(),
                ) else {
                    continue;
                };
                if let (Some(a), Some(b)) = (
                    left.get_mut(first.position),
                    right.get_mut(second.position),
                ) {
                    *a = second_node;
                    *b = first_node;
                }
                vec![(first.vehicle, left), (second.vehicle, right)]
            };
            let kind = Move::Exchange { first, second };
            found.extend(feasible(
                instance,
                kind,
                vec![first_node, second_node],
                changes,
            ));
        }
    }
}
