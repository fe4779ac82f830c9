//! Moves between neighbouring plans.
//!
//! A [`Candidate`] carries the rewritten routes of the vehicles a move
//! touches, so it can be priced under any route cost and applied without
//! recomputation. Only moves that keep every touched vehicle within capacity
//! and every required vehicle in use are generated.

mod exchange;
mod relocate;
mod two_opt;

use std::fmt;

use ttp_bounds_core::RoutingInstance;
use ttp_bounds_core::heuristic::plan;

/// A visit position inside a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Slot {
    pub(crate) vehicle: usize,
    pub(crate) position: usize,
}

/// The shape of a move, kept for logging and tabu bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    /// Take the visit at `from` and insert it at `to`.
    Relocate { from: Slot, to: Slot },
    /// Swap the visits at two slots.
    Exchange { first: Slot, second: Slot },
    /// Reverse the visits `start..=end` of one route.
    TwoOpt {
        vehicle: usize,
        start: usize,
        end: usize,
    },
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relocate { from, to } => write!(
                f,
                "relocate {}:{} to {}:{}",
                from.vehicle, from.position, to.vehicle, to.position
            ),
            Self::Exchange { first, second } => write!(
                f,
                "exchange {}:{} with {}:{}",
                first.vehicle, first.position, second.vehicle, second.position
            ),
            Self::TwoOpt {
                vehicle,
                start,
                end,
            } => write!(f, "2-opt {vehicle}:{start}..={end}"),
        }
    }
}

/// A feasible move together with the routes it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) kind: Move,
    /// Nodes whose route or position the move changes.
    pub(crate) moved: Vec<usize>,
    changes: Vec<(usize, Vec<usize>)>,
}

impl Candidate {
    /// Change in `route_cost` summed over the touched vehicles.
    pub(crate) fn delta<F>(&self, routes: &[Vec<usize>], route_cost: F) -> i128
    where
        F: Fn(usize, &[usize]) -> i128,
    {
        self.changes
            .iter()
            .map(|(vehicle, after)| {
                let before = routes.get(*vehicle).map_or(&[][..], Vec::as_slice);
                route_cost(*vehicle, after) - route_cost(*vehicle, before)
            })
            .sum()
    }

    /// Replace the touched routes.
    pub(crate) fn apply(self, routes: &mut [Vec<usize>]) {
        for (vehicle, after) in self.changes {
            if let Some(route) = routes.get_mut(vehicle) {
                *route = after;
            }
        }
    }
}

/// Every feasible relocate, exchange and 2-opt move of `routes`.
pub(crate) fn candidates(instance: &RoutingInstance, routes: &[Vec<usize>]) -> Vec<Candidate> {
    let mut found = Vec::new();
    relocate::collect(instance, routes, &mut found);
    exchange::collect(instance, routes, &mut found);
    two_opt::collect(routes, &mut found);
    found
}

/// Build a candidate when every rewritten route stays feasible.
fn feasible(
    instance: &RoutingInstance,
    kind: Move,
    moved: Vec<usize>,
    changes: Vec<(usize, Vec<usize>)>,
) -> Option<Candidate> {
    let keeps_rules = changes.iter().all(|(vehicle, after)| {
        plan::fits(instance, *vehicle, after)
            && (*vehicle >= instance.required_vehicles()
                || plan::is_used(instance, *vehicle, after))
    });
    keeps_rules.then_some(Candidate {
        kind,
        moved,
        changes,
    })
}

/// Plain travel cost of a route, widened for delta arithmetic.
pub(crate) fn travel_cost(instance: &RoutingInstance) -> impl Fn(usize, &[usize]) -> i128 + '_ {
    |vehicle, visits| i128::from(plan::route_cost(instance, vehicle, visits))
}
