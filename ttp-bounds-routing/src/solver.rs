//! [`RoutingSolver`] implementation driven by construction and local search.

use std::time::Instant;

use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ttp_bounds_core::{ConfigError, RoutingError, RoutingInstance, RoutingSolution, RoutingSolver};

use crate::search::{Limits, improve};
use crate::{construction, metaheuristic};

/// Configuration for [`LocalSearchSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSearchConfig {
    /// Iterations granted to a metaheuristic that never stops by itself when
    /// the instance sets neither a solution nor a time limit.
    pub default_iteration_limit: u64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            default_iteration_limit: 2_000,
        }
    }
}

impl LocalSearchConfig {
    /// Reject a zero iteration limit.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.default_iteration_limit == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "default_iteration_limit",
            });
        }
        Ok(())
    }
}

/// Native routing solver.
///
/// The instance's first-solution strategy builds a plan, falling back to
/// other builders when it cannot place every job. The instance's
/// metaheuristic then improves the plan under its solution and time limits.
/// Random choices draw from a generator seeded with the instance's seed.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::{HeuristicBoundBuilder, TourState, TripConstraints};
/// use ttp_bounds_core::DistanceMatrix;
/// use ttp_bounds_routing::LocalSearchSolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let solver = LocalSearchSolver::new();
/// let distances = DistanceMatrix::new(vec![vec![0, 1, 1], vec![1, 0, 2], vec![1, 2, 0]])?;
/// let state = TourState::new(0, 0, [1, 2])?;
/// let constraints = TripConstraints::new(2, 1, 2, 0)?;
/// let outcome = HeuristicBoundBuilder::new(&solver).solve(&distances, &state, &constraints)?;
/// assert_eq!(outcome.cost(), Some(4));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalSearchSolver {
    config: LocalSearchConfig,
}

impl LocalSearchSolver {
    /// Construct a solver with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    pub fn with_config(config: LocalSearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &LocalSearchConfig {
        &self.config
    }
}

impl RoutingSolver for LocalSearchSolver {
    fn solve(&self, instance: &RoutingInstance) -> Result<Option<RoutingSolution>, RoutingError> {
        let started = Instant::now();
        let search = instance.search();
        let Some(first) = construction::build(instance, search.first_solution) else {
            warn!(
                "no construction strategy routed all {} jobs",
                instance.jobs().count()
            );
            return Ok(None);
        };
        let mut rng = ChaCha8Rng::seed_from_u64(search.seed);
        let mut strategy = metaheuristic::select(search.metaheuristic, instance);
        let limits = Limits::new(search, self.config.default_iteration_limit, started);
        let routes = improve(instance, first, strategy.as_mut(), &limits, &mut rng);
        let solution = RoutingSolution::new(routes);
        solution.validate(instance)?;
        debug!(
            "local search routed {} vehicles at cost {} in {:?}",
            instance.vehicles().len(),
            solution.cost(instance),
            started.elapsed()
        );
        Ok(Some(solution))
    }
}
