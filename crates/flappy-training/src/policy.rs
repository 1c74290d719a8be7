//! The capability surface a decision function must offer to be evolved.
//!
//! The simulation never looks inside a policy. It only needs to:
//!
//! - ask it for a decision ([`Policy::evaluate`])
//! - write back how well its agent did ([`Policy::set_fitness`])
//! - ask it for new policies built from the ranked survivors ([`Policy::produce_offspring`])
//!
//! [`FeedForwardNetwork`](crate::network::FeedForwardNetwork) is the implementation
//! shipped with this crate; anything else implementing the trait can be plugged in.

use flappy_engine::{Action, sensor::Observation};
use rand::Rng;

/// Output above which an agent flaps.
pub const FLAP_THRESHOLD: f32 = 0.5;

/// A pluggable decision function controlling one agent.
pub trait Policy: Sized {
    /// Maps an observation to the single decision output.
    ///
    /// Must be deterministic for fixed internal parameters.
    fn evaluate(&self, inputs: &Observation) -> f32;

    /// Fitness of the agent this policy last controlled.
    fn fitness(&self) -> f32;

    fn set_fitness(&mut self, fitness: f32);

    /// Produces a new policy from `pool`.
    ///
    /// `pool` is the whole scored generation, sorted best first, and is never empty.
    /// How parents are selected from it and how they are combined and mutated is up to
    /// the implementation.
    fn produce_offspring<R>(pool: &[Self], rng: &mut R) -> Self
    where
        R: Rng + ?Sized;
}

/// Turns a policy's output into an action.
///
/// Without an observation (no obstacle ahead) the agent abstains and glides.
pub fn decide<P>(policy: &P, observation: Option<&Observation>) -> Action
where
    P: Policy + ?Sized,
{
    match observation {
        Some(inputs) if policy.evaluate(inputs) > FLAP_THRESHOLD => Action::Flap,
        _ => Action::Glide,
    }
}
