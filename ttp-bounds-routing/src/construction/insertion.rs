//! Parallel cheapest insertion.

use ttp_bounds_core::RoutingInstance;

use super::Partial;

/// Insert, one at a time, the job whose cheapest position over all vehicles
/// adds the least travel.
pub(super) fn parallel(instance: &RoutingInstance) -> Option<Vec<Vec<usize>>> {
    let mut partial = Partial::new(instance);
    while partial.unrouted().next().is_some() {
        let (_, vehicle, position, node) = cheapest_insertion(&partial)?;
        partial.insert(vehicle, position, node);
    }
    partial.finish()
}

fn cheapest_insertion(partial: &Partial<'_>) -> Option<(i128, usize, usize, usize)> {
    let instance = partial.instance;
    let mut best: Option<(i128, usize, usize, usize)> = None;
    for node in partial.unrouted() {
        for (vehicle, route) in partial.routes.iter().enumerate() {
            if !partial.has_room(vehicle, node) {
                continue;
            }
            for position in 0..=route.len() {
                let delta = insertion_delta(instance, vehicle, route, position, node);
                let candidate = (delta, vehicle, position, node);
                if best.is_none_or(|known| candidate < known) {
                    best = Some(candidate);
                }
            }
        }
    }
    best
}

/// Travel added by placing `node` before `route[position]`.
fn insertion_delta(
    instance: &RoutingInstance,
    vehicle: usize,
    route: &[usize],
    position: usize,
    node: usize,
) -> i128 {
    let Some(spec) = instance.vehicles().get(vehicle) else {
        return i128::MAX;
    };
    let previous = position
        .checked_sub(1)
        .and_then(|before| route.get(before).copied())
        .unwrap_or(spec.start);
    let next = route.get(position).copied().unwrap_or(spec.end);
    i128::from(instance.travel(previous, node)) + i128::from(instance.travel(node, next))
        - i128::from(instance.travel(previous, next))
}
