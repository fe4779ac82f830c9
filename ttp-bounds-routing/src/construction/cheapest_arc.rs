//! Nearest-extension builders.

use ttp_bounds_core::RoutingInstance;

use super::Partial;

/// Extend one vehicle at a time with its nearest fitting job.
pub(super) fn path(instance: &RoutingInstance) -> Option<Vec<Vec<usize>>> {
    let mut partial = Partial::new(instance);
    for vehicle in 0..instance.vehicles().len() {
        while let Some((_, node)) = partial.nearest(vehicle) {
            partial.push(vehicle, node);
        }
    }
    partial.finish()
}

/// Repeatedly take the cheapest extension over every vehicle's route end.
///
/// Ties go to the lower vehicle, then the lower job.
pub(super) fn local(instance: &RoutingInstance) -> Option<Vec<Vec<usize>>> {
    let mut partial = Partial::new(instance);
    loop {
        let cheapest = (0..instance.vehicles().len())
            .filter_map(|vehicle| {
                partial
                    .nearest(vehicle)
                    .map(|(cost, node)| (cost, vehicle, node))
            })
            .min();
        let Some((_, vehicle, node)) = cheapest else {
            break;
        };
        partial.push(vehicle, node);
    }
    partial.finish()
}
