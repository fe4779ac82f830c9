//! Core model builders for Traveling Tournament Problem travel bounds.
//!
//! Given a team's home venue, its current position and the away opponents it
//! still has to visit, the builders in this crate bound the cost of the rest
//! of its travel:
//!
//! - [`ExactBoundBuilder`] formulates a binary integer program with capacity
//!   cuts, submits it to an [`ExactSolver`], and decomposes the chosen edges
//!   into trips.
//! - [`HeuristicBoundBuilder`] formulates a capacitated vehicle routing
//!   instance, submits it to a [`RoutingSolver`], and sums the route lengths.
//!
//! Solvers are collaborators behind traits so that backends can be swapped.
//! Inputs are validated up front; constructors return `Result` to surface
//! invalid input early.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod combinatorics;
mod config;
mod constraints;
mod distance;
mod error;
pub mod exact;
pub mod graph;
pub mod heuristic;
mod state;
mod trip;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::ConfigError;
pub use constraints::{TripConstraints, TripConstraintsError};
pub use distance::{Cost, Distance, DistanceMatrix, DistanceMatrixError, Team};
pub use error::BoundError;
pub use exact::{
    BinaryProgram, CutStrategy, ExactBoundBuilder, ExactBoundConfig, ExactOutcome,
    ExactSolveOptions, ExactSolver, ExactSolverError, ExactStatus,
};
pub use heuristic::{
    ContinuationStart, FirstSolutionStrategy, HeuristicBoundBuilder, HeuristicConfig,
    HeuristicOutcome, LocalSearchMetaheuristic, PENALTY_COST, RoutingError, RoutingInstance,
    RoutingSolution, RoutingSolver, SearchParameters,
};
pub use state::{TourState, TourStateError};
pub use trip::{DecompositionDefect, Trip, TripDecomposition};
