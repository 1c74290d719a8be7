use std::f32::consts::FRAC_PI_2;

use super::world::WorldConfig;

/// What an agent does during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Action {
    /// Let gravity act alone.
    #[default]
    Glide,
    /// Replace the current velocity with the flap impulse, then apply gravity.
    Flap,
}

/// Which world bound, if any, stopped the body during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    Free,
    HitCeiling,
    HitFloor,
}

/// Hitbox and vertical kinematics of one agent.
///
/// The horizontal position is the agent's fixed lane; only `y` and `velocity` change
/// during a run. After every [`step`](Self::step), `0 <= y <= world.height - height`.
///
/// # Example
///
/// ```
/// use flappy_engine::{Action, AgentBody, WorldConfig};
///
/// let world = WorldConfig::default();
/// let mut body = AgentBody::spawn(&world);
///
/// body.step(&world, Action::Flap);
/// assert!(body.velocity() < 0.0);
/// assert!(body.y() < world.agent_start_y);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentBody {
    x: f32,
    y: f32,
    velocity: f32,
    width: f32,
    height: f32,
}

impl AgentBody {
    /// Creates a body at rest at the world's start position.
    #[must_use]
    pub fn spawn(world: &WorldConfig) -> Self {
        Self {
            x: world.agent_x,
            y: world.agent_start_y,
            velocity: 0.0,
            width: world.agent_width,
            height: world.agent_height,
        }
    }

    /// Creates a body at an arbitrary position and velocity.
    #[must_use]
    pub fn new(x: f32, y: f32, velocity: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            velocity,
            width,
            height,
        }
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Right edge of the hitbox.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge of the hitbox.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Render hint: velocity scaled into a tilt angle clamped to ±90° (radians).
    #[must_use]
    pub fn rotation(&self) -> f32 {
        (self.velocity / 10.0).clamp(-FRAC_PI_2, FRAC_PI_2)
    }

    /// Sets the velocity to the flap impulse, discarding any accumulated velocity.
    pub fn flap(&mut self, world: &WorldConfig) {
        self.velocity = world.flap_impulse;
    }

    /// Advances the body by one tick.
    ///
    /// A flap overrides the velocity, gravity is then added and the position
    /// integrated. Leaving the world vertically is not fatal: the body is clamped
    /// back inside and its velocity zeroed.
    pub fn step(&mut self, world: &WorldConfig, action: Action) -> StepOutcome {
        if action.is_flap() {
            self.flap(world);
        }
        self.velocity += world.gravity;
        self.y += self.velocity;

        let floor = world.height - self.height;
        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
            StepOutcome::HitCeiling
        } else if self.y > floor {
            self.y = floor;
            self.velocity = 0.0;
            StepOutcome::HitFloor
        } else {
            StepOutcome::Free
        }
    }
}
