//! `vrp-core` modelling helpers for `VrpRoutingSolver`.
//!
//! This module converts a [`RoutingInstance`] into a `vrp-core` problem, runs
//! the solver, and translates the resulting tours back into per-vehicle visit
//! lists.

use std::fmt;
use std::sync::Arc;

use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;
use ttp_bounds_core::heuristic::VehicleSpec;
use ttp_bounds_core::{RoutingError, RoutingInstance};

custom_dimension!(VehicleSlot typeof usize);

/// Limits handed to the `vrp-core` evolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Budget {
    pub(super) generations: usize,
    pub(super) seconds: Option<usize>,
}

/// Routes found by `vrp-core`, indexed by vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Assignment {
    /// Every job was routed.
    Complete(Vec<Vec<usize>>),
    /// Some jobs were left unassigned.
    Partial { unassigned: usize },
}

fn define_goal(transport: Arc<dyn TransportCost>) -> GenericResult<GoalContext> {
    let unassigned_feature = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-distance")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;
    let capacity_feature = CapacityFeatureBuilder::<SingleDimLoad>::new("capacity").build()?;

    GoalContextBuilder::with_features(&[unassigned_feature, transport_feature, capacity_feature])?
        .build()
}

fn load(value: usize) -> GenericResult<i32> {
    i32::try_from(value).map_err(|_| format!("load {value} exceeds the vrp-core range").into())
}

/// Capacity left for jobs once the vehicle's start node is loaded.
fn free_capacity(instance: &RoutingInstance, spec: &VehicleSpec) -> usize {
    spec.capacity.saturating_sub(instance.demand(spec.start))
}

fn define_problem(
    instance: &RoutingInstance,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let jobs = instance
        .jobs()
        .map(|node| {
            SingleBuilder::default()
                .id(format!("venue{node}").as_str())
                .demand(Demand::<SingleDimLoad>::delivery(load(instance.demand(node))?))
                .location(node)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicles = instance
        .vehicles()
        .iter()
        .enumerate()
        .map(|(slot, spec)| {
            VehicleBuilder::default()
                .id(format!("trip{slot}").as_str())
                .dimension(|dimens| {
                    dimens.set_vehicle_slot(slot);
                })
                .add_detail(
                    VehicleDetailBuilder::default()
                        .set_start_location(spec.start)
                        .set_end_location(spec.end)
                        .build()?,
                )
                .capacity(SingleDimLoad::new(load(free_capacity(instance, spec))?))
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(vehicles.into_iter())
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Arc costs of the instance, served as both distance and duration.
struct ArcTransportCost {
    costs: Vec<Vec<f64>>,
}

impl ArcTransportCost {
    #[expect(
        clippy::cast_precision_loss,
        reason = "arc costs, penalty arcs included, stay below 2^53"
    )]
    fn new(instance: &RoutingInstance) -> Self {
        let size = instance.node_count();
        let costs = (0..size)
            .map(|from| {
                (0..size)
                    .map(|to| instance.travel(from, to) as f64)
                    .collect()
            })
            .collect();
        Self { costs }
    }

    fn cost(&self, from: Location, to: Location) -> f64 {
        let result = self.costs.get(from).and_then(|row| row.get(to)).copied();
        debug_assert!(result.is_some(), "arc lookup failed: from={from}, to={to}");
        result.unwrap_or(0.0)
    }
}

impl TransportCost for ArcTransportCost {
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.cost(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.cost(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }
}

fn backend(error: &dyn fmt::Display) -> RoutingError {
    RoutingError::Backend {
        message: error.to_string(),
    }
}

/// Solve `instance` with `vrp-core` under `budget`.
pub(super) fn solve(instance: &RoutingInstance, budget: Budget) -> Result<Assignment, RoutingError> {
    let transport = Arc::new(ArcTransportCost::new(instance));
    let goal = define_goal(transport.clone()).map_err(|error| backend(&error))?;
    let problem = Arc::new(
        define_problem(instance, transport, goal).map_err(|error| RoutingError::InvalidInstance {
            reason: error.to_string(),
        })?,
    );

    let vrp_config = VrpConfigBuilder::new(problem.clone())
        .prebuild()
        .map_err(|error| backend(&error))?
        .with_max_generations(Some(budget.generations))
        .with_max_time(budget.seconds)
        .build()
        .map_err(|error| backend(&error))?;

    let solution = vrp_core::solver::Solver::new(problem, vrp_config)
        .solve()
        .map_err(|error| backend(&error))?;

    if !solution.unassigned.is_empty() {
        return Ok(Assignment::Partial {
            unassigned: solution.unassigned.len(),
        });
    }

    let mut routes = vec![Vec::new(); instance.vehicles().len()];
    for route in &solution.routes {
        let Some(slot) = route.actor.vehicle.dimens.get_vehicle_slot().copied() else {
            return Err(RoutingError::MalformedSolution {
                reason: "vrp-core route has no vehicle slot".to_owned(),
            });
        };
        let Some(visits) = routes.get_mut(slot) else {
            return Err(RoutingError::MalformedSolution {
                reason: format!("vrp-core route uses unknown vehicle {slot}"),
            });
        };
        visits.extend(
            route
                .tour
                .all_activities()
                .filter(|activity| activity.job.is_some())
                .map(|activity| activity.place.location),
        );
    }
    Ok(Assignment::Complete(routes))
}
