//! Native local-search backend for the heuristic remaining-travel bound.
//!
//! [`LocalSearchSolver`] implements [`RoutingSolver`] without external
//! solvers. A named construction strategy builds the first plan, unused
//! required vehicles are repaired, and a named metaheuristic improves the
//! plan with relocate, exchange and 2-opt moves until a local optimum or the
//! configured limits are reached. Every random step draws from a generator
//! seeded by the instance, so equal inputs give equal routes.
//!
//! [`RoutingSolver`]: ttp_bounds_core::RoutingSolver

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod construction;
mod metaheuristic;
mod neighbourhood;
mod search;
mod solver;

pub use solver::{LocalSearchConfig, LocalSearchSolver};
