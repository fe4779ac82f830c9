//! Process-scoped `good_lp` environment.

use std::sync::atomic::{AtomicUsize, Ordering};

use good_lp::solvers::highs::highs;
use good_lp::{
    Constraint, Expression, IntoAffineExpression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable, variable,
};
use log::{debug, warn};
use ttp_bounds_core::exact::{BinaryProgram, LinearConstraint, Relation};
use ttp_bounds_core::{ConfigError, ExactSolveOptions, ExactSolver, ExactSolverError, ExactStatus};

/// Shared handle through which every exact model is solved.
///
/// Each call to [`ExactSolver::solve`] builds a fresh HiGHS model; nothing but
/// the model counter is shared between calls, so one environment may serve
/// concurrent callers. Every model is handed the integer feasibility
/// tolerance and the single-thread setting, and any value HiGHS returns
/// outside that tolerance fails the call.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::{DistanceMatrix, ExactBoundBuilder, ExactSolveOptions};
/// use ttp_bounds_core::{TourState, TripConstraints};
/// use ttp_bounds_milp::MilpEnvironment;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let environment = MilpEnvironment::init(ExactSolveOptions::default())?;
/// let distances = DistanceMatrix::new(vec![vec![0, 1, 1], vec![1, 0, 2], vec![1, 2, 0]])?;
/// let state = TourState::new(0, 0, [1, 2])?;
/// let constraints = TripConstraints::new(2, 1, 1, 0)?;
/// let outcome = ExactBoundBuilder::new(&environment).solve(&distances, &state, &constraints)?;
/// assert_eq!(outcome.cost(), Some(4));
/// assert_eq!(environment.shutdown(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MilpEnvironment {
    options: ExactSolveOptions,
    models: AtomicUsize,
}

impl MilpEnvironment {
    /// Validate `options` and open the environment.
    pub fn init(options: ExactSolveOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        debug!(
            "milp environment ready (tolerance {}, {} thread)",
            options.int_feasibility_tolerance, options.threads
        );
        Ok(Self {
            options,
            models: AtomicUsize::new(0),
        })
    }

    /// Options the environment was opened with.
    #[must_use]
    pub const fn options(&self) -> &ExactSolveOptions {
        &self.options
    }

    /// Number of models built so far.
    #[must_use]
    pub fn models_built(&self) -> usize {
        self.models.load(Ordering::Relaxed)
    }

    /// The tighter of the environment's and the call's tolerance.
    const fn tolerance(&self, options: &ExactSolveOptions) -> f64 {
        options
            .int_feasibility_tolerance
            .min(self.options.int_feasibility_tolerance)
    }

    /// Release the environment, returning how many models it built.
    #[must_use]
    pub fn shutdown(self) -> usize {
        let built = self.models.into_inner();
        debug!("milp environment shut down after {built} models");
        built
    }
}

impl ExactSolver for MilpEnvironment {
    fn solve(
        &self,
        program: &BinaryProgram,
        options: &ExactSolveOptions,
    ) -> Result<ExactStatus, ExactSolverError> {
        options
            .validate()
            .map_err(|error| ExactSolverError::Backend {
                message: error.to_string(),
            })?;
        let tolerance = self.tolerance(options);
        let threads = i32::try_from(options.threads).map_err(|_| ExactSolverError::Backend {
            message: format!("{} threads exceed the HiGHS range", options.threads),
        })?;
        self.models.fetch_add(1, Ordering::Relaxed);

        let mut variables = ProblemVariables::new();
        let columns: Vec<Variable> = program
            .variables()
            .iter()
            .map(|binary| variables.add(variable().binary().name(binary.name.clone())))
            .collect();
        let objective = program
            .variables()
            .iter()
            .zip(&columns)
            .fold(Expression::from(0.0), |sum, (binary, &column)| {
                sum + binary.cost * column
            });
        let mut model = variables
            .minimise(objective)
            .using(highs)
            .set_option("output_flag", false)
            .set_option("mip_feasibility_tolerance", tolerance)
            .set_option("threads", threads);
        for constraint in program.constraints() {
            model.add_constraint(translate(constraint, &columns)?);
        }

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(ExactStatus::Infeasible),
            Err(error) => {
                return Err(ExactSolverError::Backend {
                    message: error.to_string(),
                });
            }
        };
        let values = snap_all(
            program
                .variables()
                .iter()
                .zip(&columns)
                .map(|(binary, &column)| (binary.name.as_str(), solution.value(column))),
            tolerance,
        )?;
        let objective_value = program.objective(&values);
        Ok(ExactStatus::Optimal {
            values,
            objective: objective_value,
        })
    }
}

fn translate(
    constraint: &LinearConstraint,
    columns: &[Variable],
) -> Result<Constraint, ExactSolverError> {
    let mut lhs = Expression::from(0.0);
    for &(id, coefficient) in &constraint.terms {
        let Some(&column) = columns.get(id.index()) else {
            return Err(ExactSolverError::Backend {
                message: format!(
                    "constraint {} uses unknown variable {}",
                    constraint.name,
                    id.index()
                ),
            });
        };
        lhs += coefficient * column;
    }
    Ok(match constraint.relation {
        Relation::Equal => lhs.eq(constraint.rhs),
        Relation::AtLeast => lhs.geq(constraint.rhs),
        Relation::AtMost => lhs.leq(constraint.rhs),
    })
}

/// The binary value within `tolerance` of `value`, if any.
#[expect(
    clippy::float_arithmetic,
    reason = "integrality is measured as a floating-point distance"
)]
fn snap(value: f64, tolerance: f64) -> Option<f64> {
    let nearest = value.round();
    ((value - nearest).abs() <= tolerance && (0.0..=1.0).contains(&nearest)).then_some(nearest)
}

/// Snap every named value, failing on the first that is not binary.
fn snap_all<'a>(
    values: impl IntoIterator<Item = (&'a str, f64)>,
    tolerance: f64,
) -> Result<Vec<f64>, ExactSolverError> {
    values
        .into_iter()
        .map(|(name, raw)| {
            snap(raw, tolerance).ok_or_else(|| {
                warn!("{name} = {raw} lies outside the integrality tolerance {tolerance}");
                ExactSolverError::Backend {
                    message: format!("{name} = {raw} is not binary within {tolerance}"),
                }
            })
        })
        .collect()
}
