//! Capacitated vehicle routing instances handed to a [`RoutingSolver`].
//!
//! [`RoutingSolver`]: crate::RoutingSolver

use std::time::Duration;

use crate::heuristic::config::{FirstSolutionStrategy, LocalSearchMetaheuristic};
use crate::heuristic::solver::RoutingError;
use crate::{Cost, PENALTY_COST};

/// Search settings passed verbatim to the routing solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParameters {
    /// Construction strategy.
    pub first_solution: FirstSolutionStrategy,
    /// Improvement strategy.
    pub metaheuristic: LocalSearchMetaheuristic,
    /// Maximum number of improving iterations.
    pub solution_limit: Option<u64>,
    /// Wall-clock budget.
    pub time_limit: Option<Duration>,
    /// Seed for randomised steps.
    pub seed: u64,
}

/// One vehicle of the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleSpec {
    /// Largest load the vehicle may carry.
    pub capacity: usize,
    /// Node the vehicle starts at; its demand is loaded from the start.
    pub start: usize,
    /// Node the vehicle ends at.
    pub end: usize,
}

/// A capacitated vehicle routing instance over nodes `0..n`, node 0 being the
/// depot.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::heuristic::{RoutingInstance, VehicleSpec};
/// use ttp_bounds_core::HeuristicConfig;
///
/// # fn main() -> Result<(), ttp_bounds_core::RoutingError> {
/// let depot = VehicleSpec { capacity: 2, start: 0, end: 0 };
/// let instance = RoutingInstance::new(
///     vec![vec![0, 1, 1], vec![1, 0, 2], vec![1, 2, 0]],
///     vec![0, 1, 1],
///     vec![depot],
///     1,
///     HeuristicConfig::default().search_parameters(false),
/// )?;
/// assert_eq!(instance.jobs().collect::<Vec<_>>(), vec![1, 2]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingInstance {
    size: usize,
    arcs: Vec<Cost>,
    demands: Vec<usize>,
    vehicles: Vec<VehicleSpec>,
    required_vehicles: usize,
    search: SearchParameters,
}

impl RoutingInstance {
    /// Index of the depot node.
    pub const DEPOT: usize = 0;

    /// Validate and assemble an instance.
    ///
    /// The first `required_vehicles` vehicles must carry a non-zero load.
    pub fn new(
        arcs: Vec<Vec<Cost>>,
        demands: Vec<usize>,
        vehicles: Vec<VehicleSpec>,
        required_vehicles: usize,
        search: SearchParameters,
    ) -> Result<Self, RoutingError> {
        let size = arcs.len();
        if size == 0 {
            return Err(invalid("instance has no depot"));
        }
        if let Some(row) = arcs.iter().position(|row| row.len() != size) {
            return Err(invalid(format!("arc row {row} is not of length {size}")));
        }
        if demands.len() != size {
            return Err(invalid(format!(
                "{} demands for {size} nodes",
                demands.len()
            )));
        }
        if let Some(vehicle) = vehicles
            .iter()
            .position(|vehicle| vehicle.start >= size || vehicle.end >= size)
        {
            return Err(invalid(format!("vehicle {vehicle} uses a node outside 0..{size}")));
        }
        if required_vehicles > vehicles.len() {
            return Err(invalid(format!(
                "{required_vehicles} required vehicles but only {} in the fleet",
                vehicles.len()
            )));
        }
        Ok(Self {
            size,
            arcs: arcs.into_iter().flatten().collect(),
            demands,
            vehicles,
            required_vehicles,
            search,
        })
    }

    /// Number of nodes, depot included.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.size
    }

    /// Cost of the arc `from -> to`, if both nodes exist.
    #[must_use]
    pub fn arc(&self, from: usize, to: usize) -> Option<Cost> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.arcs.get(from * self.size + to).copied()
    }

    /// Cost of the arc `from -> to`, with missing arcs priced at
    /// [`PENALTY_COST`].
    #[must_use]
    pub fn travel(&self, from: usize, to: usize) -> Cost {
        self.arc(from, to).unwrap_or(PENALTY_COST)
    }

    /// Demand of `node`; zero for unknown nodes.
    #[must_use]
    pub fn demand(&self, node: usize) -> usize {
        self.demands.get(node).copied().unwrap_or(0)
    }

    /// Every node's demand.
    #[must_use]
    pub fn demands(&self) -> &[usize] {
        &self.demands
    }

    /// The fleet.
    #[must_use]
    pub fn vehicles(&self) -> &[VehicleSpec] {
        &self.vehicles
    }

    /// How many leading vehicles must carry a load.
    #[must_use]
    pub const fn required_vehicles(&self) -> usize {
        self.required_vehicles
    }

    /// Search settings for the solver.
    #[must_use]
    pub const fn search(&self) -> &SearchParameters {
        &self.search
    }

    /// Whether `node` must be visited by some route.
    ///
    /// The depot and vehicle start nodes are not visited.
    #[must_use]
    pub fn is_job(&self, node: usize) -> bool {
        node != Self::DEPOT
            && node < self.size
            && !self.vehicles.iter().any(|vehicle| vehicle.start == node)
    }

    /// Nodes every solution must visit exactly once.
    pub fn jobs(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(|&node| self.is_job(node))
    }
}

fn invalid(reason: impl Into<String>) -> RoutingError {
    RoutingError::InvalidInstance {
        reason: reason.into(),
    }
}
