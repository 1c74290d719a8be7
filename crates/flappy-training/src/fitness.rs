//! Fitness model: how an agent's life is turned into a single score.
//!
//! ```text
//! fitness = ticks_alive × survival + obstacles_cleared × goal − jumps × jump_penalty
//! ```
//!
//! The goal weight is much larger than the survival weight so that passing obstacles
//! dominates merely staying airborne. The jump penalty defaults to zero; raising it
//! favours policies that reach the same result with fewer flaps.

use serde::{Deserialize, Serialize};

use crate::{agent::AgentTelemetry, config::ConfigError, policy::Policy};

/// Weights of the fitness formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Reward per tick alive.
    pub survival: f32,
    /// Reward per obstacle cleared.
    pub goal: f32,
    /// Cost per flap.
    pub jump_penalty: f32,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            survival: 1.0,
            goal: 100.0,
            jump_penalty: 0.0,
        }
    }
}

impl FitnessWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("survival", self.survival),
            ("goal", self.goal),
            ("jump_penalty", self.jump_penalty),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteFitnessWeight(name));
            }
        }
        Ok(())
    }

    /// Computes the fitness of a finished life.
    ///
    /// # Example
    ///
    /// ```
    /// use flappy_training::{agent::AgentTelemetry, fitness::FitnessWeights};
    ///
    /// let weights = FitnessWeights::default();
    /// let telemetry = AgentTelemetry { ticks_alive: 250, obstacles_cleared: 2, jumps: 12 };
    /// assert_eq!(weights.score(&telemetry), 450.0);
    /// ```
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score(&self, telemetry: &AgentTelemetry) -> f32 {
        telemetry.ticks_alive as f32 * self.survival
            + telemetry.obstacles_cleared as f32 * self.goal
            - telemetry.jumps as f32 * self.jump_penalty
    }

    /// Scores a finished life and writes the result onto the agent's policy.
    pub fn award<P>(&self, telemetry: &AgentTelemetry, policy: &mut P) -> f32
    where
        P: Policy + ?Sized,
    {
        let fitness = self.score(telemetry);
        policy.set_fitness(fitness);
        fitness
    }
}
