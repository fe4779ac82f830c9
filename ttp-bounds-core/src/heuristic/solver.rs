//! The heuristic routing solver boundary.

use thiserror::Error;

use crate::Cost;
use crate::heuristic::instance::RoutingInstance;
use crate::heuristic::plan;

/// Failures reported by a [`RoutingSolver`] other than finding no solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The instance is internally inconsistent.
    #[error("invalid routing instance: {reason}")]
    InvalidInstance {
        /// What is wrong with the instance.
        reason: String,
    },
    /// The solver returned routes that break the instance's rules.
    #[error("malformed routing solution: {reason}")]
    MalformedSolution {
        /// What is wrong with the routes.
        reason: String,
    },
    /// The backend failed while solving.
    #[error("routing backend failed: {message}")]
    Backend {
        /// Backend-specific description.
        message: String,
    },
}

/// Routes chosen by a routing solver, one per vehicle.
///
/// Each route lists the nodes visited between the vehicle's start and end,
/// which are not repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RoutingSolution {
    routes: Vec<Vec<usize>>,
}

impl RoutingSolution {
    /// Wrap per-vehicle visit lists, indexed by vehicle.
    #[must_use]
    pub const fn new(routes: Vec<Vec<usize>>) -> Self {
        Self { routes }
    }

    /// Visit lists, indexed by vehicle.
    #[must_use]
    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    /// Total travel cost of every route, empty routes included.
    #[must_use]
    pub fn cost(&self, instance: &RoutingInstance) -> Cost {
        self.routes
            .iter()
            .enumerate()
            .map(|(vehicle, visits)| plan::route_cost(instance, vehicle, visits))
            .fold(0, Cost::saturating_add)
    }

    /// Check the routes serve every job once within the fleet's rules.
    pub fn validate(&self, instance: &RoutingInstance) -> Result<(), RoutingError> {
        plan::check_routes(instance, &self.routes).map_err(|reason| {
            RoutingError::MalformedSolution { reason }
        })
    }
}

/// Solve capacitated vehicle routing instances.
///
/// Returning `Ok(None)` means the solver found no feasible routes. Solvers
/// must be `Send + Sync` so that one instance can serve concurrent callers.
pub trait RoutingSolver: Send + Sync {
    /// Route the fleet of `instance`.
    fn solve(&self, instance: &RoutingInstance) -> Result<Option<RoutingSolution>, RoutingError>;
}
