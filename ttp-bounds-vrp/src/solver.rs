//! `RoutingSolver` implementation backed by `vrp-core`.

use std::time::Instant;

use log::{debug, warn};
use ttp_bounds_core::heuristic::plan;
use ttp_bounds_core::{ConfigError, RoutingError, RoutingInstance, RoutingSolution, RoutingSolver};

use crate::vrp::{self, Assignment, Budget};

/// Configuration for [`VrpRoutingSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VrpRoutingConfig {
    /// Upper bound on `vrp-core` generations when the instance sets no
    /// solution limit.
    pub default_generations: usize,
}

impl Default for VrpRoutingConfig {
    fn default() -> Self {
        Self {
            default_generations: 50,
        }
    }
}

impl VrpRoutingConfig {
    /// Reject a zero generation cap.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.default_generations == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "default_generations",
            });
        }
        Ok(())
    }
}

/// Heuristic routing solver using the `vrp-core` metaheuristics.
///
/// Vehicles left without a route come back as empty routes. Required
/// vehicles that `vrp-core` left empty are repaired by moving the cheapest
/// removable job into them; when that is impossible, or when any job stays
/// unassigned, the solver reports no solution.
#[derive(Debug, Clone, Default)]
pub struct VrpRoutingSolver {
    config: VrpRoutingConfig,
}

impl VrpRoutingSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    pub fn with_config(config: VrpRoutingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &VrpRoutingConfig {
        &self.config
    }

    fn budget(&self, instance: &RoutingInstance) -> Budget {
        let search = instance.search();
        Budget {
            generations: search.solution_limit.map_or(self.config.default_generations, |limit| {
                usize::try_from(limit).unwrap_or(usize::MAX)
            }),
            seconds: search.time_limit.map(|limit| {
                usize::try_from(limit.as_secs().max(1)).unwrap_or(usize::MAX)
            }),
        }
    }
}

impl RoutingSolver for VrpRoutingSolver {
    fn solve(&self, instance: &RoutingInstance) -> Result<Option<RoutingSolution>, RoutingError> {
        let started_at = Instant::now();
        let search = instance.search();
        let budget = self.budget(instance);
        debug!(
            "vrp-core applies its own operators in place of {} and {}; {} generations",
            search.first_solution.name(),
            search.metaheuristic.name(),
            budget.generations
        );
        if instance.jobs().next().is_none() {
            let routes = vec![Vec::new(); instance.vehicles().len()];
            return Ok(plan::check_routes(instance, &routes)
                .is_ok()
                .then(|| RoutingSolution::new(routes)));
        }

        let mut routes = match vrp::solve(instance, budget)? {
            Assignment::Complete(routes) => routes,
            Assignment::Partial { unassigned } => {
                warn!("vrp-core left {unassigned} jobs unassigned");
                return Ok(None);
            }
        };
        if !plan::repair_required_vehicles(instance, &mut routes) {
            warn!(
                "could not give each of the {} required vehicles a job",
                instance.required_vehicles()
            );
            return Ok(None);
        }
        let solution = RoutingSolution::new(routes);
        solution.validate(instance)?;
        debug!(
            "vrp-core routed at cost {} in {:?}",
            solution.cost(instance),
            started_at.elapsed()
        );
        Ok(Some(solution))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rstest::rstest;
    use ttp_bounds_core::heuristic::VehicleSpec;
    use ttp_bounds_core::HeuristicConfig;

    fn square(capacity: usize, required: usize, config: &HeuristicConfig) -> RoutingInstance {
        let vehicle = VehicleSpec {
            capacity,
            start: 0,
            end: 0,
        };
        RoutingInstance::new(
            vec![
                vec![0, 2, 3, 4],
                vec![2, 0, 1, 5],
                vec![3, 1, 0, 2],
                vec![4, 5, 2, 0],
            ],
            vec![0, 1, 1, 1],
            vec![vehicle; 3],
            required,
            config.search_parameters(required > 0),
        )
        .expect("valid instance")
    }

    #[rstest]
    fn rejects_zero_generations() {
        assert!(matches!(
            VrpRoutingSolver::with_config(VrpRoutingConfig {
                default_generations: 0
            }),
            Err(ConfigError::ZeroLimit {
                field: "default_generations"
            })
        ));
    }

    #[rstest]
    #[case(None, None, 50, None)]
    #[case(Some(12), None, 12, None)]
    #[case(None, Some(Duration::from_millis(200)), 50, Some(1))]
    #[case(Some(7), Some(Duration::from_secs(3)), 7, Some(3))]
    fn budget_follows_the_search_limits(
        #[case] solution_limit: Option<u64>,
        #[case] time_limit: Option<Duration>,
        #[case] generations: usize,
        #[case] seconds: Option<usize>,
    ) {
        let config = HeuristicConfig {
            solution_limit,
            time_limit,
            ..HeuristicConfig::default()
        };
        let budget = VrpRoutingSolver::new().budget(&square(2, 0, &config));
        assert_eq!(budget, Budget { generations, seconds });
    }

    #[rstest]
    fn singleton_trips_cost_every_round_trip() {
        let instance = square(1, 3, &HeuristicConfig::default());
        let solution = VrpRoutingSolver::new()
            .solve(&instance)
            .expect("vrp-core runs")
            .expect("three vehicles fit three jobs");
        assert_eq!(solution.cost(&instance), 18);
        assert_eq!(solution.validate(&instance), Ok(()));
    }

    #[rstest]
    fn required_vehicles_are_repaired() {
        let instance = square(3, 2, &HeuristicConfig::default());
        let solution = VrpRoutingSolver::new()
            .solve(&instance)
            .expect("vrp-core runs")
            .expect("feasible instance");
        let used = solution
            .routes()
            .iter()
            .take(2)
            .filter(|route| !route.is_empty())
            .count();
        assert_eq!(used, 2);
    }

    #[rstest]
    fn continuing_vehicle_counts_its_start_load() {
        let start_at = |start| VehicleSpec {
            capacity: 2,
            start,
            end: 0,
        };
        let instance = RoutingInstance::new(
            vec![
                vec![0, 0, 10, 10],
                vec![10, 0, 1, 2],
                vec![10, 1, 0, 1],
                vec![10, 2, 1, 0],
            ],
            vec![0, 1, 1, 1],
            vec![start_at(1), start_at(0), start_at(0)],
            0,
            HeuristicConfig::default().search_parameters(false),
        )
        .expect("valid instance");
        let solution = VrpRoutingSolver::new()
            .solve(&instance)
            .expect("vrp-core plan passes validation")
            .expect("three vehicles serve two jobs");
        assert_eq!(solution.cost(&instance), 31);
    }

    #[rstest]
    fn continuing_vehicle_alone_is_already_used() {
        let continuing = VehicleSpec {
            capacity: 2,
            start: 1,
            end: 0,
        };
        let instance = RoutingInstance::new(
            vec![vec![0, 0], vec![3, 0]],
            vec![0, 1],
            vec![continuing],
            1,
            HeuristicConfig::default().search_parameters(true),
        )
        .expect("valid instance");
        let solution = VrpRoutingSolver::new().solve(&instance).expect("trivial");
        assert_eq!(solution, Some(RoutingSolution::new(vec![Vec::new()])));
    }

    #[rstest]
    fn no_jobs_needs_no_vehicle() {
        let vehicle = VehicleSpec {
            capacity: 1,
            start: 0,
            end: 0,
        };
        let instance = RoutingInstance::new(
            vec![vec![0]],
            vec![0],
            vec![vehicle],
            0,
            HeuristicConfig::default().search_parameters(false),
        )
        .expect("valid instance");
        let solution = VrpRoutingSolver::new().solve(&instance).expect("trivial");
        assert_eq!(solution, Some(RoutingSolution::new(vec![Vec::new()])));
    }
}
