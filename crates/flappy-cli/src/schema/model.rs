use chrono::{DateTime, Utc};
use flappy_training::network::FeedForwardNetwork;
use serde::{Deserialize, Serialize};

/// A trained network as saved by `flappy train`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Number of generations the network was evolved for.
    pub generation: u64,
    pub final_fitness: f32,
    pub network: FeedForwardNetwork,
}
