//! Binary integer programs and the exact solver boundary.

use thiserror::Error;

use crate::ConfigError;

/// Tightest integrality slack a capacity cut tolerates.
///
/// Capacity right-hand sides come from ceiling arithmetic; a looser tolerance
/// could let a fractional assignment pass a cut it violates.
pub const MAX_INT_FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Handle of a variable within its [`BinaryProgram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(usize);

impl VariableId {
    /// Position of the variable in [`BinaryProgram::variables`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A 0/1 decision variable and its objective coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryVariable {
    /// Human-readable name, unique within the program.
    pub name: String,
    /// Objective coefficient.
    pub cost: f64,
}

/// Comparison between a constraint's left-hand side and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `lhs == rhs`
    Equal,
    /// `lhs >= rhs`
    AtLeast,
    /// `lhs <= rhs`
    AtMost,
}

/// A linear constraint over program variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Human-readable name for diagnostics.
    pub name: String,
    /// `(variable, coefficient)` pairs of the left-hand side.
    pub terms: Vec<(VariableId, f64)>,
    /// How the left-hand side compares to `rhs`.
    pub relation: Relation,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Whether `values` satisfy the constraint within `tolerance`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "constraint evaluation sums floating-point coefficients"
    )]
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs: f64 = self
            .terms
            .iter()
            .map(|(variable, coefficient)| {
                coefficient * values.get(variable.index()).copied().unwrap_or(0.0)
            })
            .sum();
        match self.relation {
            Relation::Equal => (lhs - self.rhs).abs() <= tolerance,
            Relation::AtLeast => lhs >= self.rhs - tolerance,
            Relation::AtMost => lhs <= self.rhs + tolerance,
        }
    }
}

/// A minimisation problem over binary variables with linear constraints.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::exact::{BinaryProgram, LinearConstraint, Relation};
///
/// let mut program = BinaryProgram::new();
/// let x = program.add_variable("x", 2.0);
/// let y = program.add_variable("y", 3.0);
/// program.add_constraint(LinearConstraint {
///     name: "cover".to_owned(),
///     terms: vec![(x, 1.0), (y, 1.0)],
///     relation: Relation::AtLeast,
///     rhs: 1.0,
/// });
/// assert_eq!(program.variables().len(), 2);
/// assert!(program.is_feasible(&[1.0, 0.0], 1e-9));
/// assert!(!program.is_feasible(&[0.0, 0.0], 1e-9));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryProgram {
    variables: Vec<BinaryVariable>,
    constraints: Vec<LinearConstraint>,
}

impl BinaryProgram {
    /// Create an empty program.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add a binary variable with objective coefficient `cost`.
    pub fn add_variable(&mut self, name: impl Into<String>, cost: f64) -> VariableId {
        let id = VariableId(self.variables.len());
        self.variables.push(BinaryVariable {
            name: name.into(),
            cost,
        });
        id
    }

    /// Add a linear constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Variables in creation order.
    #[must_use]
    pub fn variables(&self) -> &[BinaryVariable] {
        &self.variables
    }

    /// Constraints in creation order.
    #[must_use]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Objective value of an assignment.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "objective evaluation sums floating-point costs"
    )]
    pub fn objective(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(variable, value)| variable.cost * value)
            .sum()
    }

    /// Whether an assignment satisfies every constraint within `tolerance`.
    #[must_use]
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.variables.len()
            && self
                .constraints
                .iter()
                .all(|constraint| constraint.is_satisfied_by(values, tolerance))
    }
}

/// Solver settings passed with every program.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ExactSolveOptions {
    /// Largest distance from 0 or 1 at which a value still counts as integral.
    pub int_feasibility_tolerance: f64,
    /// Worker threads the solver may use.
    pub threads: usize,
}

impl Default for ExactSolveOptions {
    fn default() -> Self {
        Self {
            int_feasibility_tolerance: MAX_INT_FEASIBILITY_TOLERANCE,
            threads: 1,
        }
    }
}

impl ExactSolveOptions {
    /// Check the tolerance is tight and the solver is single-threaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.int_feasibility_tolerance;
        if !(tolerance > 0.0 && tolerance <= MAX_INT_FEASIBILITY_TOLERANCE) {
            return Err(ConfigError::LooseTolerance {
                tolerance: tolerance.to_string(),
            });
        }
        if self.threads != 1 {
            return Err(ConfigError::ThreadCount {
                threads: self.threads,
            });
        }
        Ok(())
    }
}

/// Result of an exact solve.
#[derive(Debug, Clone, PartialEq)]
pub enum ExactStatus {
    /// An optimal assignment was found.
    Optimal {
        /// Value of every variable, indexed by [`VariableId::index`].
        values: Vec<f64>,
        /// Objective value of the assignment.
        objective: f64,
    },
    /// No assignment satisfies the constraints.
    Infeasible,
}

/// Failures reported by an [`ExactSolver`] other than infeasibility.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExactSolverError {
    /// The backend rejected the program or failed while solving it.
    #[error("solver backend failed: {message}")]
    Backend {
        /// Backend-specific description.
        message: String,
    },
    /// The solver returned a different number of values than variables.
    #[error("solver returned {got} values for {expected} variables")]
    WrongArity {
        /// Number of variables in the program.
        expected: usize,
        /// Number of values returned.
        got: usize,
    },
    /// The program is larger than the solver can handle.
    #[error("program has {variables} variables, solver limit is {limit}")]
    TooLarge {
        /// Number of variables in the program.
        variables: usize,
        /// Largest supported variable count.
        limit: usize,
    },
}

/// Solve binary integer programs to optimality.
///
/// Implementations must build a fresh model for every call so that concurrent
/// callers never share model state, and must honour
/// [`ExactSolveOptions::threads`]. Solvers must be `Send + Sync` so that one
/// process-wide instance can serve many callers.
pub trait ExactSolver: Send + Sync {
    /// Minimise the program's objective.
    fn solve(
        &self,
        program: &BinaryProgram,
        options: &ExactSolveOptions,
    ) -> Result<ExactStatus, ExactSolverError>;
}
