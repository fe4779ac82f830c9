//! Exact remaining-travel bound.
//!
//! [`ExactBoundBuilder`] turns a tour state into a binary integer program: one
//! variable per candidate edge, degree constraints on every away venue, trip
//! bounds on the depot, and a capacity cut per subset of away venues. The
//! program goes to an [`ExactSolver`]; the selected edges are split into trips
//! and checked before they are returned.

mod decompose;
pub mod model;
mod program;

use log::{debug, warn};

pub use decompose::{decompose, selection_cycles};
pub use program::{
    BinaryProgram, BinaryVariable, ExactSolveOptions, ExactSolver, ExactSolverError, ExactStatus,
    LinearConstraint, MAX_INT_FEASIBILITY_TOLERANCE, Relation, VariableId,
};

use crate::combinatorics::MAX_SUBSET_ITEMS;
use crate::config::name_of;
use crate::{
    BoundError, ConfigError, Cost, DistanceMatrix, Team, TourState, TripConstraints,
    TripDecomposition,
};
use model::TourModel;

/// How capacity cuts enter the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum CutStrategy {
    /// Add the cut of every subset before solving.
    #[default]
    Enumerate,
    /// Solve without cuts, then add the cuts broken by the solution and
    /// solve again until none is broken.
    Lazy,
}

impl CutStrategy {
    const NAMES: [(&'static str, Self); 2] = [("ENUMERATE", Self::Enumerate), ("LAZY", Self::Lazy)];

    /// Configuration name of the strategy.
    #[must_use]
    pub fn name(self) -> &'static str {
        name_of(self, &Self::NAMES)
    }
}

crate::config::named_enum_conversions!(CutStrategy, "cut strategy");

/// Configuration for [`ExactBoundBuilder`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ExactBoundConfig {
    /// How capacity cuts are generated.
    pub cut_strategy: CutStrategy,
    /// Largest away-node count for which every subset is enumerated.
    pub max_enumerated_nodes: usize,
    /// Solve rounds allowed when cuts are added lazily.
    pub max_lazy_rounds: usize,
    /// Options passed to the solver.
    pub solve_options: ExactSolveOptions,
}

impl Default for ExactBoundConfig {
    fn default() -> Self {
        Self {
            cut_strategy: CutStrategy::Enumerate,
            max_enumerated_nodes: 20,
            max_lazy_rounds: 64,
            solve_options: ExactSolveOptions::default(),
        }
    }
}

impl ExactBoundConfig {
    /// Check limits are positive and solver options are tight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_enumerated_nodes == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_enumerated_nodes",
            });
        }
        if self.max_lazy_rounds == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_lazy_rounds",
            });
        }
        self.solve_options.validate()
    }
}

/// Result of an exact bound computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExactOutcome {
    /// The optimal remaining travel and its trips.
    Bound {
        /// Total cost of the selected edges.
        cost: Cost,
        /// Trips recovered from the selected edges.
        decomposition: TripDecomposition,
    },
    /// No tour satisfies the trip rules.
    Infeasible,
}

impl ExactOutcome {
    /// The bound, if the model was feasible.
    #[must_use]
    pub const fn cost(&self) -> Option<Cost> {
        match self {
            Self::Bound { cost, .. } => Some(*cost),
            Self::Infeasible => None,
        }
    }

    /// The optimal trips, if the model was feasible.
    #[must_use]
    pub const fn decomposition(&self) -> Option<&TripDecomposition> {
        match self {
            Self::Bound { decomposition, .. } => Some(decomposition),
            Self::Infeasible => None,
        }
    }

    /// Whether no tour satisfies the trip rules.
    #[must_use]
    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible)
    }

    /// Flatten into `(cost, trips)`, reporting infeasibility as `(0, None)`.
    #[must_use]
    pub fn into_legacy_pair(self) -> (Cost, Option<TripDecomposition>) {
        match self {
            Self::Bound {
                cost,
                decomposition,
            } => (cost, Some(decomposition)),
            Self::Infeasible => (0, None),
        }
    }
}

/// Builds and solves the exact remaining-travel model.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::test_support::ExhaustiveExactSolver;
/// use ttp_bounds_core::{DistanceMatrix, ExactBoundBuilder, TourState, TripConstraints};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let distances = DistanceMatrix::new(vec![vec![0, 1, 1], vec![1, 0, 2], vec![1, 2, 0]])?;
/// let state = TourState::new(0, 0, [1, 2])?;
/// let constraints = TripConstraints::new(2, 1, 1, 0)?;
/// let solver = ExhaustiveExactSolver::default();
/// let outcome = ExactBoundBuilder::new(&solver).solve(&distances, &state, &constraints)?;
/// assert_eq!(outcome.cost(), Some(4));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExactBoundBuilder<'s, S: ?Sized> {
    solver: &'s S,
    config: ExactBoundConfig,
}

impl<'s, S> ExactBoundBuilder<'s, S>
where
    S: ExactSolver + ?Sized,
{
    /// Construct a builder using default configuration.
    #[must_use]
    pub fn new(solver: &'s S) -> Self {
        Self {
            solver,
            config: ExactBoundConfig::default(),
        }
    }

    /// Construct a builder with explicit, validated configuration.
    pub fn with_config(solver: &'s S, config: ExactBoundConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { solver, config })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ExactBoundConfig {
        &self.config
    }

    /// Compute the optimal remaining travel for `state`.
    ///
    /// With no away teams left the bound is the trip home. Infeasible trip
    /// rules yield [`ExactOutcome::Infeasible`].
    pub fn solve(
        &self,
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Result<ExactOutcome, BoundError> {
        state.validate(distances, constraints)?;
        if state.away_teams().is_empty() {
            return Ok(journey_home(distances, state));
        }
        match self.config.cut_strategy {
            CutStrategy::Enumerate => self.solve_enumerated(distances, state, constraints),
            CutStrategy::Lazy => self.solve_lazily(distances, state, constraints),
        }
    }

    fn solve_enumerated(
        &self,
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Result<ExactOutcome, BoundError> {
        let mut model = TourModel::new(distances, state, constraints);
        let nodes = model.nodes().len();
        let limit = self.config.max_enumerated_nodes.min(MAX_SUBSET_ITEMS);
        if nodes > limit {
            return Err(BoundError::TooManyAwayNodes { nodes, limit });
        }
        let cuts = model
            .add_all_capacity_cuts()
            .ok_or(BoundError::TooManyAwayNodes { nodes, limit })?;
        debug!(
            "exact model: {} variables, {} constraints ({cuts} capacity cuts)",
            model.program().variables().len(),
            model.program().constraints().len()
        );

        let Some(values) = self.run(&model)? else {
            return Ok(ExactOutcome::Infeasible);
        };
        let cycles = selection_cycles(model.selected_edges(&values), state)?;
        finish(&model, &values, cycles, state, constraints)
    }

    fn solve_lazily(
        &self,
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Result<ExactOutcome, BoundError> {
        let mut pool: Vec<Vec<Team>> = Vec::new();
        for round in 1..=self.config.max_lazy_rounds {
            let mut model = TourModel::new(distances, state, constraints);
            for subset in &pool {
                model.add_capacity_cut(subset);
            }
            let Some(values) = self.run(&model)? else {
                return Ok(ExactOutcome::Infeasible);
            };
            let cycles = selection_cycles(model.selected_edges(&values), state)?;
            let violated = model.violated_subsets(&cycles);
            if violated.is_empty() {
                debug!("lazy cuts converged after {round} rounds with {} cuts", pool.len());
                return finish(&model, &values, cycles, state, constraints);
            }
            debug!("lazy round {round}: adding {} capacity cuts", violated.len());
            pool.extend(violated);
        }
        Err(BoundError::CutsNotConverged {
            rounds: self.config.max_lazy_rounds,
        })
    }

    /// Solve the model, returning `None` when it is infeasible.
    fn run(&self, model: &TourModel) -> Result<Option<Vec<f64>>, BoundError> {
        let program = model.program();
        match self.solver.solve(program, &self.config.solve_options)? {
            ExactStatus::Infeasible => {
                warn!(
                    "exact model with {} away nodes is infeasible",
                    model.nodes().len()
                );
                Ok(None)
            }
            ExactStatus::Optimal { values, objective } => {
                let expected = program.variables().len();
                if values.len() != expected {
                    return Err(ExactSolverError::WrongArity {
                        expected,
                        got: values.len(),
                    }
                    .into());
                }
                debug!("exact solver objective {objective}");
                warn_on_fractional(&values, self.config.solve_options.int_feasibility_tolerance);
                Ok(Some(values))
            }
        }
    }
}

fn finish(
    model: &TourModel,
    values: &[f64],
    cycles: Vec<Vec<Team>>,
    state: &TourState,
    constraints: &TripConstraints,
) -> Result<ExactOutcome, BoundError> {
    let cost: Cost = model
        .selected_edges(values)
        .map(|edge| Cost::from(edge.cost))
        .sum();
    let decomposition = decompose(cycles, state)?;
    decomposition.check(state, constraints)?;
    debug!(
        "exact bound {cost} over {} trips",
        decomposition.trip_count()
    );
    Ok(ExactOutcome::Bound {
        cost,
        decomposition,
    })
}

fn journey_home(distances: &DistanceMatrix, state: &TourState) -> ExactOutcome {
    let home = state.home();
    let position = state.position();
    let decomposition = TripDecomposition {
        open: state
            .is_away()
            .then(|| crate::Trip::new(vec![home, position])),
        closed: Vec::new(),
    };
    ExactOutcome::Bound {
        cost: Cost::from(distances.cost(position, home)),
        decomposition,
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "integrality is measured as distance from the nearest integer"
)]
fn warn_on_fractional(values: &[f64], tolerance: f64) {
    let fractional = values
        .iter()
        .filter(|value| (*value - value.round()).abs() > tolerance)
        .count();
    if fractional > 0 {
        warn!("{fractional} solver values lie farther than {tolerance} from an integer");
    }
}
