use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    WorldConfigError,
    core::{Action, AgentBody, Obstacle, WorldConfig, collides_with_any},
};

use super::{
    FlightStats,
    obstacle_field::{ObstacleField, ObstacleSeed},
    sensor::{self, Observation},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A single-agent run driven by external input.
///
/// Each restart draws a fresh obstacle seed from the session's own seed stream, so a
/// session created with [`Self::with_seed`] replays identically for identical input.
///
/// # Example
///
/// ```
/// use flappy_engine::{FlightSession, WorldConfig};
///
/// let mut session = FlightSession::with_seed(WorldConfig::default(), 1).unwrap();
/// for _ in 0..10 {
///     session.flap();
///     session.increment_frame();
/// }
/// assert_eq!(session.frame(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct FlightSession {
    world: WorldConfig,
    seeds: Pcg32,
    body: AgentBody,
    field: ObstacleField,
    stats: FlightStats,
    state: SessionState,
    frame: u64,
    pending_flap: bool,
}

impl FlightSession {
    /// Creates a session with a random seed.
    pub fn new(world: WorldConfig) -> Result<Self, WorldConfigError> {
        Self::with_seed(world, rand::rng().random())
    }

    /// Creates a session whose obstacle layouts are derived from `seed`.
    pub fn with_seed(world: WorldConfig, seed: u64) -> Result<Self, WorldConfigError> {
        let mut seeds = Pcg32::seed_from_u64(seed);
        let field = ObstacleField::with_seed(world, seeds.random::<ObstacleSeed>())?;
        Ok(Self {
            world,
            seeds,
            body: AgentBody::spawn(&world),
            field,
            stats: FlightStats::new(),
            state: SessionState::Playing,
            frame: 0,
            pending_flap: false,
        })
    }

    #[must_use]
    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    #[must_use]
    pub fn body(&self) -> &AgentBody {
        &self.body
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        self.field.obstacles()
    }

    #[must_use]
    pub fn stats(&self) -> &FlightStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Sensor reading for the agent, for autopilot policies.
    #[must_use]
    pub fn observe(&self) -> Option<Observation> {
        sensor::observe(&self.body, self.field.obstacles(), &self.world)
    }

    /// Queues a flap for the next frame. Ignored unless playing.
    pub fn flap(&mut self) {
        if self.state.is_playing() {
            self.pending_flap = true;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Starts a new run with fresh obstacles. The high score is kept.
    pub fn restart(&mut self) {
        // The world was validated when the session was created.
        self.field = ObstacleField::from_validated(self.world, self.seeds.random());
        self.body = AgentBody::spawn(&self.world);
        self.stats.reset();
        self.state = SessionState::Playing;
        self.frame = 0;
        self.pending_flap = false;
    }

    /// Advances the run by one tick. Does nothing unless playing.
    pub fn increment_frame(&mut self) {
        if !self.state.is_playing() {
            return;
        }

        let report = self.field.advance(self.frame, Some(self.body.x()));
        self.stats.add_cleared(report.cleared);

        let action = if std::mem::take(&mut self.pending_flap) {
            Action::Flap
        } else {
            Action::Glide
        };
        self.body.step(&self.world, action);

        if collides_with_any(self.field.obstacles(), &self.body) {
            self.state = SessionState::GameOver;
        }
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> FlightSession {
        FlightSession::with_seed(WorldConfig::default(), 3).unwrap()
    }

    #[test]
    fn test_invalid_world_is_rejected() {
        let world = WorldConfig {
            obstacle_spacing: 0,
            ..WorldConfig::default()
        };
        assert!(FlightSession::new(world).is_err());
    }

    #[test]
    fn test_falling_agent_eventually_crashes() {
        let mut session = session();
        for _ in 0..1000 {
            session.increment_frame();
            if session.session_state().is_game_over() {
                break;
            }
        }
        assert!(session.session_state().is_game_over());
        assert_eq!(session.stats().score(), 0);
    }

    #[test]
    fn test_flap_is_consumed_by_one_frame() {
        let mut session = session();
        session.flap();
        session.increment_frame();
        assert_eq!(session.body().velocity(), -15.0 + 0.6);
        session.increment_frame();
        assert_eq!(session.body().velocity(), -15.0 + 0.6 + 0.6);
    }

    #[test]
    fn test_paused_session_does_not_advance() {
        let mut session = session();
        session.toggle_pause();
        session.flap();
        session.increment_frame();
        assert_eq!(session.frame(), 0);
        assert_eq!(session.body(), &AgentBody::spawn(session.world()));
        session.toggle_pause();
        assert!(session.session_state().is_playing());
    }

    #[test]
    fn test_restart_replays_identically() {
        let mut a = session();
        let mut b = session();
        for _ in 0..1000 {
            a.increment_frame();
            b.increment_frame();
        }
        a.restart();
        b.restart();
        assert!(a.session_state().is_playing());
        assert_eq!(a.frame(), 0);
        for _ in 0..300 {
            a.increment_frame();
            b.increment_frame();
        }
        assert_eq!(a.obstacles(), b.obstacles());
        assert_eq!(a.body(), b.body());
    }

    #[test]
    fn test_observe_after_first_spawn() {
        let mut session = session();
        assert!(session.observe().is_none());
        session.increment_frame();
        assert!(session.observe().is_some());
    }
}
