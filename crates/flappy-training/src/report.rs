use serde::{Deserialize, Serialize};

use crate::{policy::Policy, population::Population};

/// Summary of one finished generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Index of the generation, starting at 0.
    pub generation: u64,
    /// Ticks simulated before extinction (or the tick limit).
    pub ticks: u64,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub worst_fitness: f32,
    /// Most obstacles any single agent cleared.
    pub best_cleared: usize,
    /// Obstacles cleared by the generation.
    pub score: usize,
    /// Best score of this and all previous generations.
    pub high_score: usize,
}

impl GenerationReport {
    /// Summarises a finished population.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn new<P>(generation: u64, population: &Population<P>, high_score: usize) -> Self
    where
        P: Policy,
    {
        let fitness = population.policies().iter().map(Policy::fitness);
        let (best_fitness, worst_fitness, sum) = fitness.fold(
            (f32::NEG_INFINITY, f32::INFINITY, 0.0),
            |(best, worst, sum), f| (best.max(f), worst.min(f), sum + f),
        );
        let count = population.policies().len();
        let mean_fitness = if count == 0 { 0.0 } else { sum / count as f32 };
        let best_cleared = population
            .agents()
            .iter()
            .map(|a| a.telemetry().obstacles_cleared)
            .max()
            .unwrap_or(0);

        Self {
            generation,
            ticks: population.ticks(),
            best_fitness,
            mean_fitness,
            worst_fitness,
            best_cleared,
            score: population.score(),
            high_score: high_score.max(population.score()),
        }
    }
}
