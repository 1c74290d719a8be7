use crate::core::{AgentBody, Obstacle, WorldConfig};

use super::obstacle_field::next_obstacle;

/// Number of values in an [`Observation`].
pub const OBSERVATION_LEN: usize = 6;

/// Normalized view of the world from one agent's perspective.
///
/// | index | value                                          |
/// |-------|------------------------------------------------|
/// | 0     | `(agent_y - gap_center) / height`              |
/// | 1     | `velocity / velocity_normalizer`               |
/// | 2     | `(height - agent_y) / height`                  |
/// | 3     | `(obstacle_x - agent_x) / width`               |
/// | 4     | `gap_top / height`                             |
/// | 5     | `(height - gap_bottom) / height`               |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation([f32; OBSERVATION_LEN]);

impl Observation {
    #[must_use]
    pub const fn new(values: [f32; OBSERVATION_LEN]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn values(&self) -> &[f32; OBSERVATION_LEN] {
        &self.0
    }
}

/// Encodes the agent's state relative to `obstacle`.
#[must_use]
pub fn encode(body: &AgentBody, obstacle: &Obstacle, world: &WorldConfig) -> Observation {
    let h = world.height;
    Observation([
        (body.y() - obstacle.gap_center()) / h,
        body.velocity() / world.velocity_normalizer,
        (h - body.y()) / h,
        (obstacle.x() - body.x()) / world.width,
        obstacle.gap_top() / h,
        (h - obstacle.gap_bottom()) / h,
    ])
}

/// Encodes the agent's state relative to the next obstacle it has to pass.
///
/// Returns `None` when there is no such obstacle (e.g. on the first ticks of a run);
/// the agent should then abstain from acting.
///
/// # Example
///
/// ```
/// use flappy_engine::{AgentBody, Obstacle, WorldConfig, sensor};
///
/// let world = WorldConfig::default();
/// let body = AgentBody::spawn(&world);
/// assert!(sensor::observe(&body, &[], &world).is_none());
///
/// let obstacles = [Obstacle::new(160.0, 80.0, 100.0, 160.0)];
/// let observation = sensor::observe(&body, &obstacles, &world).unwrap();
/// assert_eq!(observation.values()[4], 100.0 / 480.0);
/// ```
#[must_use]
pub fn observe(body: &AgentBody, obstacles: &[Obstacle], world: &WorldConfig) -> Option<Observation> {
    next_obstacle(obstacles, body.x()).map(|obstacle| encode(body, obstacle, world))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_encode_values() {
        let world = WorldConfig::default();
        let body = AgentBody::new(50.0, 150.0, 5.0, 43.0, 30.0);
        let obstacle = Obstacle::new(210.0, 80.0, 100.0, 160.0);
        let values = *encode(&body, &obstacle, &world).values();

        assert!(approx_eq(values[0], (150.0 - 180.0) / 480.0));
        assert!(approx_eq(values[1], 0.5));
        assert!(approx_eq(values[2], 330.0 / 480.0));
        assert!(approx_eq(values[3], 0.5));
        assert!(approx_eq(values[4], 100.0 / 480.0));
        assert!(approx_eq(values[5], 220.0 / 480.0));
    }

    #[test]
    fn test_observe_skips_passed_obstacles() {
        let world = WorldConfig::default();
        let body = AgentBody::spawn(&world);
        let obstacles = [
            Obstacle::new(-40.0, 80.0, 10.0, 160.0),
            Obstacle::new(180.0, 80.0, 200.0, 160.0),
        ];
        let observation = observe(&body, &obstacles, &world).unwrap();
        assert!(approx_eq(observation.values()[4], 200.0 / 480.0));
    }

    #[test]
    fn test_observe_without_obstacle_ahead() {
        let world = WorldConfig::default();
        let body = AgentBody::spawn(&world);
        let obstacles = [Obstacle::new(-60.0, 80.0, 10.0, 160.0)];
        assert!(observe(&body, &obstacles, &world).is_none());
    }

    #[test]
    fn test_observe_is_pure() {
        let world = WorldConfig::default();
        let body = AgentBody::spawn(&world);
        let obstacles = [Obstacle::new(100.0, 80.0, 50.0, 160.0)];
        assert_eq!(
            observe(&body, &obstacles, &world),
            observe(&body, &obstacles, &world)
        );
    }
}
