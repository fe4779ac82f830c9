//! Brute-force reference solvers and fixtures used by unit and behaviour
//! tests.
//!
//! Both solvers explore every candidate answer, so they only suit tiny
//! instances, but their results are exact and deterministic.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::exact::{
    BinaryProgram, ExactSolveOptions, ExactSolver, ExactSolverError, ExactStatus, Relation,
};
use crate::heuristic::plan;
use crate::{Cost, Distance, DistanceMatrix, RoutingError, RoutingInstance, RoutingSolution, RoutingSolver};

/// Build a distance matrix from literal rows.
///
/// # Panics
///
/// Panics if `rows` is empty or not square.
#[must_use]
#[expect(
    clippy::expect_used,
    reason = "fixture rows are literals written by the test author"
)]
pub fn matrix_from_rows(rows: &[&[Distance]]) -> DistanceMatrix {
    DistanceMatrix::new(rows.iter().map(|row| row.to_vec()).collect())
        .expect("fixture matrix must be square and non-empty")
}

/// Exact solver that branches on every variable, pruning on constraint
/// slack and objective.
///
/// Among equally good assignments it returns the first found, trying `0`
/// before `1` for each variable in creation order. Objective pruning assumes
/// non-negative costs, which holds for every tour model.
#[derive(Debug, Default)]
pub struct ExhaustiveExactSolver {
    calls: AtomicUsize,
}

impl ExhaustiveExactSolver {
    /// Largest program the solver accepts.
    pub const MAX_VARIABLES: usize = 40;

    /// Number of programs solved so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl ExactSolver for ExhaustiveExactSolver {
    fn solve(
        &self,
        program: &BinaryProgram,
        options: &ExactSolveOptions,
    ) -> Result<ExactStatus, ExactSolverError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let variables = program.variables().len();
        if variables > Self::MAX_VARIABLES {
            return Err(ExactSolverError::TooLarge {
                variables,
                limit: Self::MAX_VARIABLES,
            });
        }
        let mut search = BranchSearch::new(program, options.int_feasibility_tolerance);
        search.descend(0);
        Ok(search.best.map_or(ExactStatus::Infeasible, |(objective, values)| {
            ExactStatus::Optimal { values, objective }
        }))
    }
}

/// Running state of one constraint during the search.
#[derive(Debug, Clone, Copy, Default)]
struct Slack {
    lhs: f64,
    /// Largest increase the unassigned variables can still add.
    rise: f64,
    /// Largest decrease the unassigned variables can still add.
    fall: f64,
}

struct BranchSearch<'p> {
    program: &'p BinaryProgram,
    tolerance: f64,
    occurrences: Vec<Vec<(usize, f64)>>,
    slack: Vec<Slack>,
    values: Vec<f64>,
    cost: f64,
    best: Option<(f64, Vec<f64>)>,
}

#[expect(
    clippy::float_arithmetic,
    reason = "branching tracks floating-point constraint sums"
)]
impl<'p> BranchSearch<'p> {
    fn new(program: &'p BinaryProgram, tolerance: f64) -> Self {
        let mut occurrences = vec![Vec::new(); program.variables().len()];
        let mut slack = vec![Slack::default(); program.constraints().len()];
        for (index, (constraint, state)) in program.constraints().iter().zip(&mut slack).enumerate()
        {
            for &(variable, coefficient) in &constraint.terms {
                if let Some(list) = occurrences.get_mut(variable.index()) {
                    list.push((index, coefficient));
                }
                if coefficient > 0.0 {
                    state.rise += coefficient;
                } else {
                    state.fall += coefficient;
                }
            }
        }
        Self {
            program,
            tolerance,
            occurrences,
            slack,
            values: vec![0.0; program.variables().len()],
            cost: 0.0,
            best: None,
        }
    }

    fn descend(&mut self, variable: usize) {
        if self
            .best
            .as_ref()
            .is_some_and(|(best, _)| self.cost >= *best - self.tolerance)
        {
            return;
        }
        let Some(cost) = self.program.variables().get(variable).map(|v| v.cost) else {
            if self.program.is_feasible(&self.values, self.tolerance) {
                self.best = Some((self.cost, self.values.clone()));
            }
            return;
        };
        let occurrences = self.occurrences.get(variable).cloned().unwrap_or_default();
        for value in [0.0, 1.0] {
            self.assign(&occurrences, value, true);
            let consistent = occurrences
                .iter()
                .all(|&(constraint, _)| self.satisfiable(constraint));
            if consistent {
                if let Some(slot) = self.values.get_mut(variable) {
                    *slot = value;
                }
                self.cost += cost * value;
                self.descend(variable + 1);
                self.cost -= cost * value;
            }
            self.assign(&occurrences, value, false);
        }
        if let Some(slot) = self.values.get_mut(variable) {
            *slot = 0.0;
        }
    }

    /// Fix (`apply`) or release a variable in every constraint it occurs in.
    fn assign(&mut self, occurrences: &[(usize, f64)], value: f64, apply: bool) {
        let sign = if apply { 1.0 } else { -1.0 };
        for &(constraint, coefficient) in occurrences {
            let Some(state) = self.slack.get_mut(constraint) else {
                continue;
            };
            state.lhs += sign * coefficient * value;
            if coefficient > 0.0 {
                state.rise -= sign * coefficient;
            } else {
                state.fall -= sign * coefficient;
            }
        }
    }

    fn satisfiable(&self, constraint: usize) -> bool {
        let (Some(state), Some(definition)) = (
            self.slack.get(constraint),
            self.program.constraints().get(constraint),
        ) else {
            return false;
        };
        let reachable_high = state.lhs + state.rise >= definition.rhs - self.tolerance;
        let reachable_low = state.lhs + state.fall <= definition.rhs + self.tolerance;
        match definition.relation {
            Relation::AtLeast => reachable_high,
            Relation::AtMost => reachable_low,
            Relation::Equal => reachable_high && reachable_low,
        }
    }
}

/// Routing solver that tries every assignment of jobs to vehicles and every
/// visiting order.
///
/// Returns the first cheapest plan found, inserting jobs in ascending order.
#[derive(Debug, Default)]
pub struct ExhaustiveRoutingSolver {
    calls: AtomicUsize,
}

impl ExhaustiveRoutingSolver {
    /// Largest number of jobs the solver accepts.
    pub const MAX_JOBS: usize = 6;

    /// Number of instances solved so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl RoutingSolver for ExhaustiveRoutingSolver {
    fn solve(&self, instance: &RoutingInstance) -> Result<Option<RoutingSolution>, RoutingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let jobs: Vec<usize> = instance.jobs().collect();
        if jobs.len() > Self::MAX_JOBS {
            return Err(RoutingError::Backend {
                message: format!(
                    "{} jobs exceed the exhaustive limit of {}",
                    jobs.len(),
                    Self::MAX_JOBS
                ),
            });
        }
        let mut routes = vec![Vec::new(); instance.vehicles().len()];
        let mut best = None;
        insert_remaining(instance, &jobs, &mut routes, &mut best);
        Ok(best.map(|(_, cheapest)| RoutingSolution::new(cheapest)))
    }
}

fn insert_remaining(
    instance: &RoutingInstance,
    jobs: &[usize],
    routes: &mut [Vec<usize>],
    best: &mut Option<(Cost, Vec<Vec<usize>>)>,
) {
    let Some((&job, rest)) = jobs.split_first() else {
        if plan::check_routes(instance, routes).is_ok() {
            let cost = RoutingSolution::new(routes.to_vec()).cost(instance);
            if best.as_ref().is_none_or(|(known, _)| cost < *known) {
                *best = Some((cost, routes.to_vec()));
            }
        }
        return;
    };
    for vehicle in 0..routes.len() {
        let length = routes.get(vehicle).map_or(0, Vec::len);
        for position in 0..=length {
            let Some(route) = routes.get_mut(vehicle) else {
                continue;
            };
            route.insert(position, job);
            if plan::fits(instance, vehicle, route) {
                insert_remaining(instance, rest, routes, best);
            }
            if let Some(undo) = routes.get_mut(vehicle) {
                undo.remove(position);
            }
        }
    }
}
