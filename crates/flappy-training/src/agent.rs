use flappy_engine::{Action, AgentBody, StepOutcome, WorldConfig};

/// What an agent achieved during its life; the input of the fitness model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentTelemetry {
    /// Ticks the agent was alive for, including the tick it died in.
    pub ticks_alive: u64,
    /// Obstacles passed while alive.
    pub obstacles_cleared: usize,
    /// Number of flaps.
    pub jumps: usize,
}

/// One simulated entity: a body plus liveness and telemetry.
///
/// The agent's policy is stored next to it, at the same index, in the
/// [`Population`](crate::population::Population).
///
/// An agent starts alive and becomes dead exactly once; a dead agent is inert.
#[derive(Debug, Clone)]
pub struct Agent {
    body: AgentBody,
    alive: bool,
    telemetry: AgentTelemetry,
}

impl Agent {
    /// Creates a live agent at the world's start position.
    #[must_use]
    pub fn spawn(world: &WorldConfig) -> Self {
        Self {
            body: AgentBody::spawn(world),
            alive: true,
            telemetry: AgentTelemetry::default(),
        }
    }

    #[must_use]
    pub fn body(&self) -> &AgentBody {
        &self.body
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn telemetry(&self) -> &AgentTelemetry {
        &self.telemetry
    }

    /// Lives one more tick: counts the tick and the flap, then moves the body.
    pub(crate) fn advance(&mut self, world: &WorldConfig, action: Action) -> StepOutcome {
        debug_assert!(self.alive);
        self.telemetry.ticks_alive += 1;
        if action.is_flap() {
            self.telemetry.jumps += 1;
        }
        self.body.step(world, action)
    }

    pub(crate) fn credit_cleared(&mut self, cleared: usize) {
        self.telemetry.obstacles_cleared += cleared;
    }

    /// Marks the agent dead. Returns `false` if it already was.
    pub(crate) fn kill(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }
}
