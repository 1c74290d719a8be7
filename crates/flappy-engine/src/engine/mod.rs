//! Time evolution of the flight world.
//!
//! - [`ObstacleField`] - spawns, scrolls, scores and removes obstacles
//! - [`ObstacleSeed`] - seed for reproducible obstacle layouts
//! - [`sensor`] - the fixed-length observation an agent's policy sees
//! - [`FlightSession`] - single-agent run driven by flap/restart input
//! - [`FlightStats`] - score and high score
//!
//! # Tick order
//!
//! Every simulated tick follows the same order, both in [`FlightSession`] and in the
//! multi-agent population of `flappy-training`:
//!
//! 1. Advance the obstacle field (spawn, scroll, score, remove)
//! 2. For each live agent: sense, decide, [`step`](crate::AgentBody::step) the body
//! 3. Test the body against the obstacles; a collision ends the agent

pub use self::{flight_session::*, flight_stats::*, obstacle_field::*};

mod flight_session;
mod flight_stats;
mod obstacle_field;
pub mod sensor;
