//! Core data structures of the flight world.
//!
//! - [`WorldConfig`] - immutable world constants for one run
//! - [`AgentBody`] - one agent's hitbox and vertical kinematics
//! - [`Obstacle`] - a scrolling barrier with a passable gap

pub use self::{body::*, obstacle::*, world::*};

pub(crate) mod body;
pub(crate) mod obstacle;
pub(crate) mod world;
