use serde::{Deserialize, Serialize};

use crate::WorldConfigError;

/// Immutable world constants for a run.
///
/// All lengths are in world units (the default playfield is 320×480), all rates are
/// per tick. The y axis grows downwards: `y = 0` is the ceiling.
///
/// Deserialization fills missing fields from [`WorldConfig::default`], so a config file
/// only needs to name the values it changes.
///
/// # Example
///
/// ```
/// use flappy_engine::WorldConfig;
///
/// let world = WorldConfig {
///     gap_height: 200.0,
///     ..WorldConfig::default()
/// };
/// assert!(world.validate().is_ok());
///
/// let broken = WorldConfig {
///     gap_height: 470.0,
///     ..WorldConfig::default()
/// };
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the visible world.
    pub width: f32,
    /// Height of the visible world.
    pub height: f32,
    /// Downward acceleration added to the velocity every tick.
    pub gravity: f32,
    /// Velocity assigned by a flap (negative is upwards).
    pub flap_impulse: f32,
    /// Horizontal extent of an obstacle.
    pub obstacle_width: f32,
    /// Vertical extent of an obstacle's passable gap.
    pub gap_height: f32,
    /// Number of ticks between two obstacle spawns.
    pub obstacle_spacing: u64,
    /// Distance every obstacle moves left per tick.
    pub scroll_speed: f32,
    /// Minimum distance between a gap and the ceiling/floor.
    pub spawn_margin: f32,
    /// Horizontal lane of every agent (left edge of its hitbox).
    pub agent_x: f32,
    /// Vertical position of an agent at generation start.
    pub agent_start_y: f32,
    /// Hitbox width.
    pub agent_width: f32,
    /// Hitbox height.
    pub agent_height: f32,
    /// Divisor applied to velocity when sensing.
    pub velocity_normalizer: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 480.0,
            gravity: 0.6,
            flap_impulse: -15.0,
            obstacle_width: 80.0,
            gap_height: 160.0,
            obstacle_spacing: 110,
            scroll_speed: 2.0,
            spawn_margin: 10.0,
            agent_x: 50.0,
            agent_start_y: 150.0,
            agent_width: 43.0,
            agent_height: 30.0,
            velocity_normalizer: 10.0,
        }
    }
}

impl WorldConfig {
    /// Checks that the world can be simulated.
    ///
    /// The gap must leave room for a uniform gap-top draw inside
    /// `[spawn_margin, height - gap_height - spawn_margin)`.
    pub fn validate(&self) -> Result<(), WorldConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("obstacle_width", self.obstacle_width),
            ("gap_height", self.gap_height),
            ("scroll_speed", self.scroll_speed),
            ("agent_width", self.agent_width),
            ("agent_height", self.agent_height),
            ("velocity_normalizer", self.velocity_normalizer),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(WorldConfigError::NonPositiveDimension(name));
            }
        }
        let finite = [
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("agent_x", self.agent_x),
            ("agent_start_y", self.agent_start_y),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(WorldConfigError::NonFinite(name));
            }
        }
        if !(self.spawn_margin.is_finite() && self.spawn_margin >= 0.0) {
            return Err(WorldConfigError::NegativeMargin(self.spawn_margin));
        }
        if self.obstacle_spacing == 0 {
            return Err(WorldConfigError::ZeroObstacleSpacing);
        }
        let max = self.height - 2.0 * self.spawn_margin;
        if self.gap_height >= max {
            return Err(WorldConfigError::GapTooLarge {
                gap_height: self.gap_height,
                max,
            });
        }
        if self.agent_height >= self.height {
            return Err(WorldConfigError::AgentTooTall {
                agent_height: self.agent_height,
                world_height: self.height,
            });
        }
        Ok(())
    }

    /// Lowest valid `y` for an agent (its top edge touching the floor).
    #[must_use]
    pub fn floor_y(&self) -> f32 {
        self.height - self.agent_height
    }

    /// Half-open range from which a new obstacle's gap top is drawn.
    #[must_use]
    pub fn gap_top_range(&self) -> std::ops::Range<f32> {
        self.spawn_margin..(self.height - self.gap_height - self.spawn_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(WorldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_gap_must_fit_inside_margins() {
        let world = WorldConfig {
            gap_height: 460.0,
            ..WorldConfig::default()
        };
        assert_eq!(
            world.validate(),
            Err(WorldConfigError::GapTooLarge {
                gap_height: 460.0,
                max: 460.0
            })
        );
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let world = WorldConfig {
            scroll_speed: 0.0,
            ..WorldConfig::default()
        };
        assert_eq!(
            world.validate(),
            Err(WorldConfigError::NonPositiveDimension("scroll_speed"))
        );

        let world = WorldConfig {
            height: f32::NAN,
            ..WorldConfig::default()
        };
        assert_eq!(
            world.validate(),
            Err(WorldConfigError::NonPositiveDimension("height"))
        );
    }

    #[test]
    fn test_non_finite_kinematics_are_rejected() {
        let world = WorldConfig {
            gravity: f32::NAN,
            ..WorldConfig::default()
        };
        assert_eq!(world.validate(), Err(WorldConfigError::NonFinite("gravity")));

        let world = WorldConfig {
            flap_impulse: f32::NEG_INFINITY,
            ..WorldConfig::default()
        };
        assert_eq!(
            world.validate(),
            Err(WorldConfigError::NonFinite("flap_impulse"))
        );

        let world = WorldConfig {
            agent_start_y: f32::INFINITY,
            ..WorldConfig::default()
        };
        assert_eq!(
            world.validate(),
            Err(WorldConfigError::NonFinite("agent_start_y"))
        );
    }

    #[test]
    fn test_zero_spacing_is_rejected() {
        let world = WorldConfig {
            obstacle_spacing: 0,
            ..WorldConfig::default()
        };
        assert_eq!(world.validate(), Err(WorldConfigError::ZeroObstacleSpacing));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let world: WorldConfig = serde_json::from_str(r#"{ "gravity": 0.4 }"#).unwrap();
        assert!((world.gravity - 0.4).abs() < f32::EPSILON);
        assert_eq!(world.height, 480.0);
        assert_eq!(world.obstacle_spacing, 110);
    }

    #[test]
    fn test_gap_top_range() {
        let range = WorldConfig::default().gap_top_range();
        assert_eq!(range, 10.0..310.0);
    }
}
