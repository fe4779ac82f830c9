//! Exact solver backend for the remaining-travel bound.
//!
//! [`MilpEnvironment`] implements [`ExactSolver`] on `good_lp` with the HiGHS
//! mixed-integer solver, configured per model with the integer feasibility
//! tolerance and a single worker thread. The environment is created
//! once per process with [`MilpEnvironment::init`], shared by reference
//! between concurrent bound computations, and released with
//! [`MilpEnvironment::shutdown`].
//!
//! [`ExactSolver`]: ttp_bounds_core::ExactSolver

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod environment;

pub use environment::MilpEnvironment;
