use thiserror::Error;

use crate::config::ConfigError;
use crate::exact::ExactSolverError;
use crate::graph::CycleError;
use crate::heuristic::RoutingError;
use crate::trip::DecompositionDefect;
use crate::{Cost, TourStateError};

/// Errors returned by [`ExactBoundBuilder`](crate::ExactBoundBuilder) and
/// [`HeuristicBoundBuilder`](crate::HeuristicBoundBuilder).
///
/// Infeasible models and missing heuristic solutions are not errors; they are
/// reported through [`ExactOutcome`](crate::ExactOutcome) and
/// [`HeuristicOutcome`](crate::HeuristicOutcome).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundError {
    /// The tour state does not fit the distance matrix or trip rules.
    #[error("invalid tour state: {0}")]
    InvalidState(#[from] TourStateError),
    /// Builder configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// Enumerating every capacity cut would need too many subsets.
    #[error("{nodes} away nodes exceed the enumeration limit of {limit}")]
    TooManyAwayNodes {
        /// Away nodes in the model, including an open trip's current venue.
        nodes: usize,
        /// Largest node count the configuration allows.
        limit: usize,
    },
    /// The exact solver failed.
    #[error("exact solver failed: {0}")]
    ExactSolver(#[from] ExactSolverError),
    /// The heuristic solver failed or returned a malformed solution.
    #[error("routing solver failed: {0}")]
    Routing(#[from] RoutingError),
    /// Selected edges do not split into cycles.
    #[error("selected edges do not form cycles: {0}")]
    MalformedSelection(#[from] CycleError),
    /// A solved cycle never passes through home.
    #[error("solved cycle {cycle:?} does not pass through home")]
    DetachedCycle {
        /// Nodes of the cycle.
        cycle: Vec<crate::Team>,
    },
    /// The recovered trips break the trip rules.
    #[error("recovered trips are invalid: {0}")]
    InvalidDecomposition(#[from] DecompositionDefect),
    /// Lazy cut generation did not converge within its round limit.
    #[error("capacity cuts still violated after {rounds} rounds")]
    CutsNotConverged {
        /// Rounds performed.
        rounds: usize,
    },
    /// The heuristic route used an arc reserved as unreachable.
    #[error("route cost {cost} reaches the penalty sentinel {sentinel}")]
    PenaltyArcSelected {
        /// Total route cost reported.
        cost: Cost,
        /// Cost reserved for penalty arcs.
        sentinel: Cost,
    },
}
