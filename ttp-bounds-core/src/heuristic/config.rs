//! Search strategies and configuration for [`HeuristicBoundBuilder`].
//!
//! [`HeuristicBoundBuilder`]: crate::HeuristicBoundBuilder

use std::time::Duration;

use crate::ConfigError;
use crate::config::name_of;
use crate::heuristic::instance::SearchParameters;

/// How a routing solver builds its first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum FirstSolutionStrategy {
    /// Let the solver choose.
    Automatic,
    /// Extend each route in turn with its cheapest next node.
    PathCheapestArc,
    /// Repeatedly take the cheapest extension over all open routes.
    LocalCheapestArc,
    /// Extend routes with the lowest-numbered node that still fits.
    FirstUnboundMinValue,
    /// Merge single-node routes by savings.
    Savings,
    /// Insert nodes where they add the least cost over all routes.
    ParallelCheapestInsertion,
}

impl FirstSolutionStrategy {
    const NAMES: [(&'static str, Self); 6] = [
        ("AUTOMATIC", Self::Automatic),
        ("PATH_CHEAPEST_ARC", Self::PathCheapestArc),
        ("LOCAL_CHEAPEST_ARC", Self::LocalCheapestArc),
        ("FIRST_UNBOUND_MIN_VALUE", Self::FirstUnboundMinValue),
        ("SAVINGS", Self::Savings),
        ("PARALLEL_CHEAPEST_INSERTION", Self::ParallelCheapestInsertion),
    ];

    /// Configuration name of the strategy.
    #[must_use]
    pub fn name(self) -> &'static str {
        name_of(self, &Self::NAMES)
    }
}

/// How a routing solver improves its first solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum LocalSearchMetaheuristic {
    /// Let the solver choose.
    Automatic,
    /// Accept improving moves until none is left.
    GreedyDescent,
    /// Penalise frequently used arcs to escape local minima.
    GuidedLocalSearch,
    /// Accept worsening moves with decreasing probability.
    SimulatedAnnealing,
    /// Forbid recently undone moves.
    TabuSearch,
}

impl LocalSearchMetaheuristic {
    const NAMES: [(&'static str, Self); 5] = [
        ("AUTOMATIC", Self::Automatic),
        ("GREEDY_DESCENT", Self::GreedyDescent),
        ("GUIDED_LOCAL_SEARCH", Self::GuidedLocalSearch),
        ("SIMULATED_ANNEALING", Self::SimulatedAnnealing),
        ("TABU_SEARCH", Self::TabuSearch),
    ];

    /// Configuration name of the metaheuristic.
    #[must_use]
    pub fn name(self) -> &'static str {
        name_of(self, &Self::NAMES)
    }

    /// Whether the search runs until a limit stops it.
    #[must_use]
    pub const fn needs_limit(self) -> bool {
        !matches!(self, Self::Automatic | Self::GreedyDescent)
    }
}

/// Where the vehicle resuming an open trip starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum ContinuationStart {
    /// At home, with a free arc to the current venue.
    #[default]
    Depot,
    /// At the current venue, already carrying the open trip's games.
    CurrentVenue,
}

impl ContinuationStart {
    const NAMES: [(&'static str, Self); 2] = [
        ("DEPOT", Self::Depot),
        ("CURRENT_VENUE", Self::CurrentVenue),
    ];

    /// Configuration name of the start.
    #[must_use]
    pub fn name(self) -> &'static str {
        name_of(self, &Self::NAMES)
    }
}

crate::config::named_enum_conversions!(FirstSolutionStrategy, "first solution strategy");
crate::config::named_enum_conversions!(LocalSearchMetaheuristic, "local search metaheuristic");
crate::config::named_enum_conversions!(ContinuationStart, "continuation start");

/// Configuration for [`HeuristicBoundBuilder`].
///
/// [`HeuristicBoundBuilder`]: crate::HeuristicBoundBuilder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct HeuristicConfig {
    /// Construction strategy when the trip count is unconstrained.
    pub first_solution: FirstSolutionStrategy,
    /// Construction strategy when trip-count bounds apply.
    pub bounded_first_solution: FirstSolutionStrategy,
    /// Improvement strategy.
    pub metaheuristic: LocalSearchMetaheuristic,
    /// Maximum number of improving iterations.
    pub solution_limit: Option<u64>,
    /// Wall-clock budget for the search.
    pub time_limit: Option<Duration>,
    /// Where the vehicle resuming an open trip starts.
    pub continuation_start: ContinuationStart,
    /// Seed for randomised search steps.
    pub seed: u64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            first_solution: FirstSolutionStrategy::LocalCheapestArc,
            bounded_first_solution: FirstSolutionStrategy::FirstUnboundMinValue,
            metaheuristic: LocalSearchMetaheuristic::GreedyDescent,
            solution_limit: None,
            time_limit: None,
            continuation_start: ContinuationStart::Depot,
            seed: 0,
        }
    }
}

impl HeuristicConfig {
    /// Check limits are positive and open-ended searches are capped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solution_limit == Some(0) {
            return Err(ConfigError::ZeroLimit {
                field: "solution_limit",
            });
        }
        if self.time_limit.is_some_and(|limit| limit.is_zero()) {
            return Err(ConfigError::ZeroLimit {
                field: "time_limit",
            });
        }
        if self.metaheuristic.needs_limit()
            && self.solution_limit.is_none()
            && self.time_limit.is_none()
        {
            return Err(ConfigError::UnboundedSearch {
                metaheuristic: self.metaheuristic.name(),
            });
        }
        Ok(())
    }

    /// Parameters handed to the routing solver.
    #[must_use]
    pub const fn search_parameters(&self, bounded: bool) -> SearchParameters {
        SearchParameters {
            first_solution: if bounded {
                self.bounded_first_solution
            } else {
                self.first_solution
            },
            metaheuristic: self.metaheuristic,
            solution_limit: self.solution_limit,
            time_limit: self.time_limit,
            seed: self.seed,
        }
    }
}
