//! Run configuration shared by the population and the evolution controller.
//!
//! Every struct here deserializes with `#[serde(default)]`, so a JSON file only
//! needs to name the values it overrides:
//!
//! ```
//! use flappy_training::config::SimulationConfig;
//!
//! let config: SimulationConfig = serde_json::from_str(
//!     r#"{ "evolution": { "population_size": 20 }, "tick_limit": null }"#,
//! ).unwrap();
//! assert_eq!(config.evolution.population_size, 20);
//! assert_eq!(config.tick_limit, None);
//! assert_eq!(config.world.height, 480.0);
//! ```

use flappy_engine::{WorldConfig, WorldConfigError};
use serde::{Deserialize, Serialize};

use crate::fitness::FitnessWeights;

/// Invalid run configuration.
///
/// Always reported before the first generation is simulated; never clamped.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid world: {_0}")]
    World(WorldConfigError),
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("elitism fraction must be within [0, 1], got {_0}")]
    ElitismFractionOutOfRange(#[error(not(source))] f32),
    #[display(
        "elite count {elite_count} leaves no room for offspring in a population of {population_size}"
    )]
    EliteCountTooLarge {
        elite_count: usize,
        population_size: usize,
    },
    #[display("fitness weight `{_0}` must be finite")]
    NonFiniteFitnessWeight(#[error(not(source))] &'static str),
    #[display("expected {expected} policies, got {actual}")]
    PopulationSizeMismatch { expected: usize, actual: usize },
}

impl From<WorldConfigError> for ConfigError {
    fn from(err: WorldConfigError) -> Self {
        Self::World(err)
    }
}

/// Generation replacement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    /// Number of agents (and policies) per generation.
    pub population_size: usize,
    /// Share of the population carried over unchanged, rounded to the nearest count.
    pub elitism_fraction: f32,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            elitism_fraction: 0.05,
        }
    }
}

impl EvolutionParams {
    /// `round(elitism_fraction × population_size)`.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn elite_count(&self) -> usize {
        (self.elitism_fraction * self.population_size as f32).round() as usize
    }

    /// Validates the parameters and returns the elite count.
    pub fn validate(&self) -> Result<usize, ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !(0.0..=1.0).contains(&self.elitism_fraction) {
            return Err(ConfigError::ElitismFractionOutOfRange(
                self.elitism_fraction,
            ));
        }
        let elite_count = self.elite_count();
        if elite_count >= self.population_size {
            return Err(ConfigError::EliteCountTooLarge {
                elite_count,
                population_size: self.population_size,
            });
        }
        Ok(elite_count)
    }
}

/// Everything fixed at controller construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub fitness: FitnessWeights,
    pub evolution: EvolutionParams,
    /// Ticks after which a generation is forcibly ended; `None` runs until extinction.
    pub tick_limit: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            fitness: FitnessWeights::default(),
            evolution: EvolutionParams::default(),
            tick_limit: Some(10_000),
        }
    }
}

impl SimulationConfig {
    /// Validates the whole configuration and returns the elite count.
    pub fn validate(&self) -> Result<usize, ConfigError> {
        self.world.validate()?;
        self.fitness.validate()?;
        self.evolution.validate()
    }
}
