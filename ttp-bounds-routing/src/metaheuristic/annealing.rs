//! Simulated annealing with reciprocal cooling.

use rand::Rng;

use super::{Context, Metaheuristic, Step};
use crate::neighbourhood::{candidates, travel_cost};

/// Accept a random neighbour outright when it is no worse, and otherwise
/// with probability `exp(-delta / T)`, where `T = T0 / (1 + iteration)`.
///
/// `T0` is the mean cost per job of the first plan seen.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SimulatedAnnealing {
    initial_temperature: Option<f64>,
}

impl SimulatedAnnealing {
    #[expect(
        clippy::float_arithmetic,
        reason = "temperatures are continuous quantities"
    )]
    fn temperature(&mut self, context: &Context<'_>) -> f64 {
        let initial = *self.initial_temperature.get_or_insert_with(|| {
            let jobs = context.instance.jobs().count().max(1);
            (widen(context.current_cost) / widen(jobs)).max(1.0)
        });
        initial / (1.0 + widen(context.iteration))
    }
}

impl Metaheuristic for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "SIMULATED_ANNEALING"
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "acceptance probabilities are continuous quantities"
    )]
    fn step(&mut self, context: Context<'_>) -> Step {
        let mut neighbours = candidates(context.instance, context.routes);
        if neighbours.is_empty() {
            return Step::Stop;
        }
        let temperature = self.temperature(&context);
        let pick = context.rng.gen_range(0..neighbours.len());
        let candidate = neighbours.swap_remove(pick);
        let delta = candidate.delta(context.routes, travel_cost(context.instance));
        if delta <= 0 {
            return Step::Move(candidate);
        }
        let probability = (-widen(delta) / temperature).exp().clamp(0.0, 1.0);
        if context.rng.gen_bool(probability) {
            Step::Move(candidate)
        } else {
            Step::Idle
        }
    }
}

/// Lossy conversion of a count or cost, saturating at `u32::MAX`.
fn widen<T>(value: T) -> f64
where
    u32: TryFrom<T>,
{
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}
