//! Facade crate for the Traveling Tournament Problem travel bounds.
//!
//! This crate re-exports the core bound builders and domain types and
//! exposes the solver backends behind feature flags:
//!
//! - `milp`: [`MilpEnvironment`], an exact solver on `good_lp`.
//! - `routing`: [`LocalSearchSolver`], the native local search backend.
//! - `vrp`: `VrpRoutingSolver`, a heuristic backend on `vrp-core`.

#![forbid(unsafe_code)]

pub use ttp_bounds_core::{
    BoundError, ConfigError, ContinuationStart, Cost, CutStrategy, Distance, DistanceMatrix,
    DistanceMatrixError, ExactBoundBuilder, ExactBoundConfig, ExactOutcome, ExactSolveOptions,
    ExactSolver, ExactSolverError, ExactStatus, FirstSolutionStrategy, HeuristicBoundBuilder,
    HeuristicConfig, HeuristicOutcome, LocalSearchMetaheuristic, RoutingError, RoutingInstance,
    RoutingSolution, RoutingSolver, Team, TourState, TourStateError, Trip, TripConstraints,
    TripConstraintsError, TripDecomposition,
};

#[cfg(feature = "milp")]
pub use ttp_bounds_milp::MilpEnvironment;

#[cfg(feature = "routing")]
pub use ttp_bounds_routing::{LocalSearchConfig, LocalSearchSolver};

#[cfg(feature = "vrp")]
pub use ttp_bounds_vrp::{VrpRoutingConfig, VrpRoutingSolver};
