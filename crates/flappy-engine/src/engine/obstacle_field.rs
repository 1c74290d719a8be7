use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    WorldConfigError,
    core::{Obstacle, WorldConfig},
};

/// Generates, scrolls and recycles the obstacles of one run.
///
/// # Lifecycle of an obstacle
///
/// 1. Spawned at the world's right edge every `obstacle_spacing` ticks, with its gap top
///    drawn uniformly from [`WorldConfig::gap_top_range`]
/// 2. Moves left by `scroll_speed` every tick
/// 3. Marked scored (at most once) when its trailing edge passes the clear line
/// 4. Removed once its trailing edge is left of the world (`x + width < 0`)
///
/// Obstacles are stored, advanced and spawned in creation order, which is also their
/// left-to-right order.
///
/// # Example
///
/// ```
/// use flappy_engine::{ObstacleField, ObstacleSeed, WorldConfig};
///
/// let world = WorldConfig::default();
/// let seed = ObstacleSeed::from_u128(7);
/// let mut field = ObstacleField::with_seed(world, seed)?;
///
/// let report = field.advance(0, None);
/// assert!(report.spawned);
/// assert_eq!(field.obstacles().len(), 1);
/// assert_eq!(field.obstacles()[0].x(), world.width - world.scroll_speed);
/// # Ok::<(), flappy_engine::WorldConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ObstacleField {
    world: WorldConfig,
    rng: Pcg32,
    obstacles: Vec<Obstacle>,
}

/// What happened during one [`ObstacleField::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// A new obstacle entered at the right edge.
    pub spawned: bool,
    /// Number of obstacles that became scored this tick.
    pub cleared: usize,
    /// Number of obstacles that left the world this tick.
    pub removed: usize,
}

/// Seed for deterministic obstacle generation.
///
/// A 128-bit seed, serialized as a 32-character hex string. Two fields built from the
/// same seed produce the same gap sequence.
///
/// ```
/// use flappy_engine::ObstacleSeed;
/// use rand::Rng as _;
///
/// let seed: ObstacleSeed = rand::rng().random();
/// let json = serde_json::to_string(&seed).unwrap();
/// assert_eq!(json.len(), 34);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleSeed([u8; 16]);

impl ObstacleSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl Serialize for ObstacleSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{:032x}", self.as_u128()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for ObstacleSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<ObstacleSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ObstacleSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ObstacleSeed(seed)
    }
}

impl ObstacleField {
    /// Creates an empty field whose gap positions are drawn from `seed`.
    ///
    /// Fails if `world` does not pass [`WorldConfig::validate`].
    pub fn with_seed(world: WorldConfig, seed: ObstacleSeed) -> Result<Self, WorldConfigError> {
        world.validate()?;
        Ok(Self::from_validated(world, seed))
    }

    pub(crate) fn from_validated(world: WorldConfig, seed: ObstacleSeed) -> Self {
        Self {
            world,
            rng: Pcg32::from_seed(seed.0),
            obstacles: Vec::new(),
        }
    }

    /// Obstacles currently in the world, left to right.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    /// Advances every obstacle by one tick.
    ///
    /// `clear_line` is the minimum left edge among live agents, or `None` when no agent
    /// is alive (nothing can be scored). An obstacle is scored in the tick its own
    /// trailing edge, after moving, is strictly left of the clear line. Testing the
    /// pre-move position instead would score every obstacle one tick earlier.
    pub fn advance(&mut self, tick: u64, clear_line: Option<f32>) -> AdvanceReport {
        let mut report = AdvanceReport::default();

        if tick % self.world.obstacle_spacing == 0 {
            self.spawn();
            report.spawned = true;
        }

        for obstacle in &mut self.obstacles {
            obstacle.scroll(self.world.scroll_speed);
            if let Some(line) = clear_line
                && obstacle.right() < line
                && obstacle.mark_scored()
            {
                report.cleared += 1;
            }
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.right() >= 0.0);
        report.removed = before - self.obstacles.len();

        report
    }

    /// First obstacle (left to right) whose trailing edge has not yet passed `left_edge`.
    #[must_use]
    pub fn next_obstacle(&self, left_edge: f32) -> Option<&Obstacle> {
        next_obstacle(&self.obstacles, left_edge)
    }

    fn spawn(&mut self) {
        let gap_top = self.rng.random_range(self.world.gap_top_range());
        self.obstacles.push(Obstacle::new(
            self.world.width,
            self.world.obstacle_width,
            gap_top,
            self.world.gap_height,
        ));
    }
}

/// First obstacle (left to right) whose trailing edge is at or right of `left_edge`.
#[must_use]
pub fn next_obstacle(obstacles: &[Obstacle], left_edge: f32) -> Option<&Obstacle> {
    obstacles.iter().find(|o| o.right() >= left_edge)
}
