//! One generation of agents flying through a shared obstacle field.

use std::iter;

use flappy_engine::{
    FlightStats, Obstacle, ObstacleField, ObstacleSeed, WorldConfig, collides_with_any, sensor,
};
use tracing::{debug, warn};

use crate::{
    agent::Agent,
    config::{ConfigError, SimulationConfig},
    fitness::FitnessWeights,
    policy::{self, Policy},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PopulationState {
    Running,
    Finished,
}

/// Returned by [`Population::tick`] once every agent is dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("population is extinct, no further ticks are accepted")]
pub struct PopulationFinished;

/// What happened during one [`Population::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Index of the tick just simulated.
    pub tick: u64,
    /// Obstacles cleared this tick.
    pub cleared: usize,
    /// Agents that collided this tick.
    pub collisions: usize,
    /// Agents ended because the tick limit was reached.
    pub timed_out: usize,
    /// Agents still alive after the tick.
    pub alive: usize,
}

/// A fixed-size, index-stable set of agents and their policies.
///
/// Agent `i` is always controlled by policy `i`, so fitness written back after a
/// collision lands on the right policy. All agents share one obstacle field and one
/// tick counter.
///
/// Every agent's fitness is written exactly once: in the tick it collides, or in the
/// tick the generation is cut off by the tick limit. Once all agents are dead the
/// population is [`Finished`](PopulationState::Finished) and refuses further ticks.
///
/// # Example
///
/// ```
/// use flappy_engine::ObstacleSeed;
/// use flappy_training::{
///     config::SimulationConfig, network::FeedForwardNetwork, population::Population,
/// };
/// use rand::SeedableRng as _;
///
/// let config = SimulationConfig::default();
/// let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
/// let policies = FeedForwardNetwork::random_population(10, &Default::default(), &mut rng);
///
/// let mut population = Population::new(&config, policies, ObstacleSeed::from_u128(1))?;
/// population.run_to_extinction();
/// assert!(population.is_extinct());
/// assert!(population.ticks() <= config.tick_limit.unwrap());
/// # Ok::<(), flappy_training::config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Population<P> {
    world: WorldConfig,
    fitness: FitnessWeights,
    tick_limit: Option<u64>,
    field: ObstacleField,
    agents: Vec<Agent>,
    policies: Vec<P>,
    stats: FlightStats,
    tick: u64,
    state: PopulationState,
}

impl<P> Population<P>
where
    P: Policy,
{
    /// Spawns one agent per policy and resets every policy's fitness to zero.
    ///
    /// Fails if the world or the fitness weights are invalid. The number of policies is
    /// not checked against `config.evolution`; that is the controller's concern.
    pub fn new(
        config: &SimulationConfig,
        mut policies: Vec<P>,
        seed: ObstacleSeed,
    ) -> Result<Self, ConfigError> {
        let field = ObstacleField::with_seed(config.world, seed)?;
        config.fitness.validate()?;
        for policy in &mut policies {
            policy.set_fitness(0.0);
        }
        let agents = iter::repeat_with(|| Agent::spawn(&config.world))
            .take(policies.len())
            .collect();
        let state = if policies.is_empty() {
            PopulationState::Finished
        } else {
            PopulationState::Running
        };
        debug!(agents = policies.len(), seed = seed.as_u128(), "population spawned");
        Ok(Self {
            world: config.world,
            fitness: config.fitness,
            tick_limit: config.tick_limit,
            field,
            agents,
            policies,
            stats: FlightStats::new(),
            tick: 0,
            state,
        })
    }

    #[must_use]
    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn policies(&self) -> &[P] {
        &self.policies
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        self.field.obstacles()
    }

    /// Obstacles cleared by this generation so far.
    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn state(&self) -> PopulationState {
        self.state
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// `true` iff every agent is dead.
    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.agents.iter().all(|a| !a.is_alive())
    }

    /// Simulates one tick.
    ///
    /// 1. The obstacle field advances once; obstacles that pass the leftmost live agent
    ///    are credited to every live agent
    /// 2. Each live agent, in index order, senses the (now frozen) obstacles, asks its
    ///    policy, moves, and dies on collision
    /// 3. If the tick limit is reached, the remaining agents are ended
    pub fn tick(&mut self) -> Result<TickReport, PopulationFinished> {
        if self.state.is_finished() {
            return Err(PopulationFinished);
        }
        let tick = self.tick;

        let clear_line = self
            .agents
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| a.body().x())
            .min_by(f32::total_cmp);
        let advance = self.field.advance(tick, clear_line);
        if advance.cleared > 0 {
            for agent in self.agents.iter_mut().filter(|a| a.is_alive()) {
                agent.credit_cleared(advance.cleared);
            }
            self.stats.add_cleared(advance.cleared);
        }

        let obstacles = self.field.obstacles();
        let mut collisions = 0;
        for (agent, policy) in iter::zip(&mut self.agents, &mut self.policies) {
            if !agent.is_alive() {
                continue;
            }
            let observation = sensor::observe(agent.body(), obstacles, &self.world);
            let action = policy::decide(policy, observation.as_ref());
            agent.advance(&self.world, action);
            if collides_with_any(obstacles, agent.body()) && agent.kill() {
                self.fitness.award(agent.telemetry(), policy);
                collisions += 1;
            }
        }
        self.tick += 1;

        let mut timed_out = 0;
        if let Some(limit) = self.tick_limit
            && self.tick >= limit
        {
            timed_out = self.end_all();
            if timed_out > 0 {
                warn!(tick = self.tick, agents = timed_out, "generation cut off by tick limit");
            }
        }

        let alive = self.alive_count();
        if alive == 0 {
            self.state = PopulationState::Finished;
            debug!(ticks = self.tick, score = self.score(), "population extinct");
        }

        Ok(TickReport {
            tick,
            cleared: advance.cleared,
            collisions,
            timed_out,
            alive,
        })
    }

    /// Ticks until every agent is dead. Returns the total number of ticks simulated.
    pub fn run_to_extinction(&mut self) -> u64 {
        while self.tick().is_ok() {}
        self.tick
    }

    /// Gives the policies back, in agent order, each carrying its fitness.
    #[must_use]
    pub fn into_policies(self) -> Vec<P> {
        self.policies
    }

    /// Kills and scores every live agent. Returns how many were ended.
    fn end_all(&mut self) -> usize {
        let mut ended = 0;
        for (agent, policy) in iter::zip(&mut self.agents, &mut self.policies) {
            if agent.kill() {
                self.fitness.award(agent.telemetry(), policy);
                ended += 1;
            }
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use flappy_engine::{WorldConfigError, sensor::Observation};

    use super::*;
    use crate::policy::testing::{ConstantPolicy, GapSeeker};

    fn config(tick_limit: Option<u64>) -> SimulationConfig {
        SimulationConfig {
            tick_limit,
            ..SimulationConfig::default()
        }
    }

    fn seed() -> ObstacleSeed {
        ObstacleSeed::from_u128(0xdead_beef)
    }

    #[test]
    fn test_gliders_all_die_at_first_obstacle() {
        let policies = vec![ConstantPolicy::new(0.0); 4];
        let mut population = Population::new(&config(None), policies, seed()).unwrap();
        let ticks = population.run_to_extinction();

        // The first obstacle reaches the agents' right edge (x = 93) after 114 ticks.
        assert_eq!(ticks, 114);
        let telemetry: Vec<_> = population.agents().iter().map(|a| *a.telemetry()).collect();
        assert!(telemetry.iter().all(|t| t.ticks_alive == 114 && t.jumps == 0));
        let policies = population.into_policies();
        assert!(policies.iter().all(|p| p.fitness == 114.0));
    }

    #[test]
    fn test_finished_population_rejects_ticks() {
        let mut population =
            Population::new(&config(None), vec![ConstantPolicy::new(0.0)], seed()).unwrap();
        population.run_to_extinction();
        assert!(population.state().is_finished());
        assert_eq!(population.tick(), Err(PopulationFinished));
    }

    #[test]
    fn test_invalid_world_is_rejected_before_ticking() {
        let config = SimulationConfig {
            world: WorldConfig {
                obstacle_spacing: 0,
                ..WorldConfig::default()
            },
            ..SimulationConfig::default()
        };
        let population = Population::new(&config, vec![ConstantPolicy::new(0.0)], seed());
        assert_eq!(
            population.err(),
            Some(ConfigError::World(WorldConfigError::ZeroObstacleSpacing))
        );
    }

    #[test]
    fn test_empty_population_is_finished() {
        let population: Population<ConstantPolicy> =
            Population::new(&config(None), vec![], seed()).unwrap();
        assert!(population.is_extinct());
        assert!(population.state().is_finished());
    }

    #[test]
    fn test_tick_limit_ends_and_scores_survivors() {
        let mut population = Population::new(
            &config(Some(50)),
            vec![GapSeeker { fitness: -1.0 }, GapSeeker { fitness: -1.0 }],
            seed(),
        )
        .unwrap();
        let mut last = TickReport::default();
        while let Ok(report) = population.tick() {
            last = report;
        }
        assert_eq!(population.ticks(), 50);
        assert_eq!(last.timed_out, 2);
        assert_eq!(last.alive, 0);
        for policy in population.policies() {
            assert_eq!(policy.fitness, 50.0);
        }
    }

    /// A world whose gap is wide enough for the bang-bang [`GapSeeker`] to never miss.
    fn wide_gap_config(tick_limit: Option<u64>) -> SimulationConfig {
        SimulationConfig {
            world: WorldConfig {
                gap_height: 400.0,
                spawn_margin: 0.0,
                ..WorldConfig::default()
            },
            tick_limit,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_expert_clears_obstacles_and_credits_score() {
        let mut population = Population::new(
            &wide_gap_config(Some(2_000)),
            vec![GapSeeker { fitness: 0.0 }, GapSeeker { fitness: 0.0 }],
            seed(),
        )
        .unwrap();
        population.run_to_extinction();

        // Obstacles spawned at tick 110k are cleared at tick 110k + 175.
        assert_eq!(population.score(), 17);
        let first = *population.agents()[0].telemetry();
        let second = *population.agents()[1].telemetry();
        // Identical policies in identical lanes live identical lives.
        assert_eq!(first, second);
        assert_eq!(first.ticks_alive, 2_000);
        assert_eq!(first.obstacles_cleared, 17);
        let policies = population.into_policies();
        assert_eq!(policies[0].fitness, 2_000.0 + 17.0 * 100.0);
        assert_eq!(policies[0].fitness, policies[1].fitness);
    }

    #[test]
    fn test_fitness_is_reset_on_spawn() {
        let population = Population::new(
            &config(None),
            vec![ConstantPolicy::with_fitness(0.0, 42.0)],
            seed(),
        )
        .unwrap();
        assert_eq!(population.policies()[0].fitness, 0.0);
    }

    #[derive(Debug, Clone)]
    enum Mixed {
        Glider(f32),
        Seeker(GapSeeker),
    }

    impl Policy for Mixed {
        fn evaluate(&self, inputs: &Observation) -> f32 {
            match self {
                Self::Glider(_) => 0.0,
                Self::Seeker(seeker) => seeker.evaluate(inputs),
            }
        }

        fn fitness(&self) -> f32 {
            match self {
                Self::Glider(fitness) => *fitness,
                Self::Seeker(seeker) => seeker.fitness,
            }
        }

        fn set_fitness(&mut self, fitness: f32) {
            match self {
                Self::Glider(f) => *f = fitness,
                Self::Seeker(seeker) => seeker.fitness = fitness,
            }
        }

        fn produce_offspring<R>(pool: &[Self], _rng: &mut R) -> Self
        where
            R: rand::Rng + ?Sized,
        {
            pool[0].clone()
        }
    }

    #[test]
    fn test_collision_scores_only_the_dying_agent() {
        let mut population = Population::new(
            &wide_gap_config(None),
            vec![Mixed::Glider(0.0), Mixed::Seeker(GapSeeker { fitness: 0.0 })],
            seed(),
        )
        .unwrap();
        let mut collisions = 0;
        for _ in 0..114 {
            collisions += population.tick().unwrap().collisions;
        }

        // The glider rests on the floor, below every gap, and hits the first obstacle.
        assert_eq!(collisions, 1);
        assert!(!population.agents()[0].is_alive());
        assert!(population.agents()[1].is_alive());
        assert!(population.state().is_running());
        assert_eq!(population.policies()[0].fitness(), 114.0);
        assert_eq!(population.policies()[1].fitness(), 0.0);
    }
}
