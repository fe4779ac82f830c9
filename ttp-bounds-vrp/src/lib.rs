//! `vrp-core` backend for the heuristic remaining-travel bound.
//!
//! [`VrpRoutingSolver`] implements [`RoutingSolver`] by handing the routing
//! instance to the `vrp-core` metaheuristics: each job becomes a delivery
//! with its demand, each vehicle keeps its capacity and start and end nodes,
//! and the goal minimises unassigned jobs, then distance, under capacity.
//!
//! `vrp-core` chooses its own search operators, so the instance's named
//! construction strategy and metaheuristic are logged but not applied. The
//! solution limit caps the number of generations and the time limit caps
//! the wall-clock time.
//!
//! [`RoutingSolver`]: ttp_bounds_core::RoutingSolver

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;
mod vrp;

pub use solver::{VrpRoutingConfig, VrpRoutingSolver};
