//! Deterministic side-scrolling flight simulation.
//!
//! This crate owns everything that happens inside the world, and nothing about how
//! decisions are made or scored:
//!
//! - [`core`] - world constants, agent bodies (vertical kinematics), obstacles and collision
//! - [`engine`] - obstacle spawning/scrolling, sensing, and the single-player [`FlightSession`]
//!
//! Policies, fitness and evolution live in `flappy-training`.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Invalid world configuration.
///
/// Reported by [`WorldConfig::validate`] before any simulation runs.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum WorldConfigError {
    #[display("world dimension `{_0}` must be finite and positive")]
    NonPositiveDimension(#[error(not(source))] &'static str),
    #[display("world value `{_0}` must be finite")]
    NonFinite(#[error(not(source))] &'static str),
    #[display("spawn margin must be finite and non-negative, got {_0}")]
    NegativeMargin(#[error(not(source))] f32),
    #[display("obstacle spacing must be at least one tick")]
    ZeroObstacleSpacing,
    #[display("gap height {gap_height} leaves no room for the gap (must be < {max})")]
    GapTooLarge { gap_height: f32, max: f32 },
    #[display("agent height {agent_height} does not fit in world height {world_height}")]
    AgentTooTall {
        agent_height: f32,
        world_height: f32,
    },
}
