//! Generation replacement and the controller driving whole training runs.
//!
//! # Generation Lifecycle
//!
//! ```text
//! policies ──spawn──▶ Population ──tick × T──▶ Finished ──conclude──▶ ScoredGeneration
//!     ▲                                                                     │
//!     └──────────────────────────── evolve ◀────────────────────────────────┘
//! ```
//!
//! 1. [`EvolutionController::spawn`] binds `N` policies to `N` fresh agents and a newly
//!    seeded obstacle field
//! 2. The host calls [`Population::tick`] until the population is finished
//!    ([`EvolutionController::run_generation`] does this in one call)
//! 3. [`EvolutionController::conclude`] waits for extinction, summarises the generation
//!    and hands the scored policies back
//! 4. [`EvolutionController::evolve`] ranks the scored policies, keeps the elites and
//!    fills the remaining slots with offspring
//!
//! # Elitism
//!
//! The top `round(elitism_fraction × N)` policies move to the next generation unchanged.
//! Offspring are produced from the *whole* ranked generation, not just the elites, so
//! selection pressure is left to [`Policy::produce_offspring`].
//!
//! # Determinism
//!
//! A controller created with [`EvolutionController::with_seed`] draws every obstacle
//! seed and all offspring randomness from a single [`Pcg32`] stream. Given the same seed,
//! configuration and initial policies, a training run is reproducible bit for bit.

use flappy_engine::ObstacleSeed;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::info;

use crate::{
    config::{ConfigError, SimulationConfig},
    policy::Policy,
    population::Population,
    report::GenerationReport,
};

/// Sorts policies by descending fitness.
///
/// The sort is stable, so policies with equal fitness keep their population order.
#[must_use]
pub fn rank<P>(mut policies: Vec<P>) -> Vec<P>
where
    P: Policy,
{
    policies.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    policies
}

/// Pure generation replacement: elites plus offspring.
///
/// An `Evolver` only exists for a split that leaves room for at least one offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evolver {
    elite_count: usize,
    population_size: usize,
}

impl Evolver {
    /// Fails if the population is empty or the elites would fill it.
    pub fn new(elite_count: usize, population_size: usize) -> Result<Self, ConfigError> {
        if population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if elite_count >= population_size {
            return Err(ConfigError::EliteCountTooLarge {
                elite_count,
                population_size,
            });
        }
        Ok(Self {
            elite_count,
            population_size,
        })
    }

    #[must_use]
    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    #[must_use]
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Builds the next generation from a scored one.
    ///
    /// The result has `population_size` policies: the `elite_count` best, unchanged and
    /// best first, followed by offspring produced from the ranked pool. A scored
    /// generation of any other size is rejected.
    pub fn evolve<P, R>(&self, scored: Vec<P>, rng: &mut R) -> Result<Vec<P>, ConfigError>
    where
        P: Policy,
        R: rand::Rng + ?Sized,
    {
        if scored.len() != self.population_size {
            return Err(ConfigError::PopulationSizeMismatch {
                expected: self.population_size,
                actual: scored.len(),
            });
        }
        let mut ranked = rank(scored);

        let offspring = (self.elite_count..self.population_size)
            .map(|_| P::produce_offspring(&ranked, rng))
            .collect::<Vec<_>>();

        ranked.truncate(self.elite_count);
        ranked.extend(offspring);
        Ok(ranked)
    }
}

/// Policies of a finished generation, each carrying its fitness, in agent order.
#[derive(Debug, Clone)]
pub struct ScoredGeneration<P> {
    pub policies: Vec<P>,
    pub report: GenerationReport,
}

impl<P> ScoredGeneration<P>
where
    P: Policy,
{
    /// The fittest policy; the lowest index wins ties.
    #[must_use]
    pub fn best(&self) -> Option<&P> {
        self.policies
            .iter()
            .reduce(|best, p| if p.fitness() > best.fitness() { p } else { best })
    }
}

/// Orchestrates generations: spawns populations, collects their fitness and evolves the
/// next policy set.
///
/// # Example
///
/// ```
/// use flappy_training::{
///     config::SimulationConfig, evolution::EvolutionController, network::FeedForwardNetwork,
/// };
/// use rand::SeedableRng as _;
///
/// let mut config = SimulationConfig::default();
/// config.evolution.population_size = 8;
/// config.tick_limit = Some(300);
///
/// let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
/// let policies = FeedForwardNetwork::random_population(8, &Default::default(), &mut rng);
///
/// let mut controller = EvolutionController::with_seed(config, 42)?;
/// let ranked = controller.train(policies, 3, |_| {})?;
/// assert_eq!(ranked.len(), 8);
/// assert_eq!(controller.generation(), 3);
/// # Ok::<(), flappy_training::config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionController {
    config: SimulationConfig,
    evolver: Evolver,
    rng: Pcg32,
    generation: u64,
    high_score: usize,
    last_report: Option<GenerationReport>,
}

impl EvolutionController {
    /// Creates a controller with a random seed.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Creates a controller whose whole run is reproducible from `seed`.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(config: SimulationConfig, rng: Pcg32) -> Result<Self, ConfigError> {
        let elite_count = config.validate()?;
        let evolver = Evolver::new(elite_count, config.evolution.population_size)?;
        Ok(Self {
            config,
            evolver,
            rng,
            generation: 0,
            high_score: 0,
            last_report: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn evolver(&self) -> &Evolver {
        &self.evolver
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Best generation score seen so far.
    #[must_use]
    pub fn high_score(&self) -> usize {
        self.high_score
    }

    #[must_use]
    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    /// Starts a generation: binds `policies` to fresh agents in a newly seeded world.
    pub fn spawn<P>(&mut self, policies: Vec<P>) -> Result<Population<P>, ConfigError>
    where
        P: Policy,
    {
        let expected = self.config.evolution.population_size;
        if policies.len() != expected {
            return Err(ConfigError::PopulationSizeMismatch {
                expected,
                actual: policies.len(),
            });
        }
        let seed = self.rng.random::<ObstacleSeed>();
        Population::new(&self.config, policies, seed)
    }

    /// Finishes a generation and returns its scored policies.
    ///
    /// Any agent still alive is simulated to the end first, so every policy carries its
    /// final fitness before the report is built.
    pub fn conclude<P>(&mut self, mut population: Population<P>) -> ScoredGeneration<P>
    where
        P: Policy,
    {
        population.run_to_extinction();

        let report = GenerationReport::new(self.generation, &population, self.high_score);
        self.high_score = report.high_score;
        self.generation += 1;
        self.last_report = Some(report);
        info!(
            generation = report.generation,
            ticks = report.ticks,
            best = report.best_fitness,
            mean = report.mean_fitness,
            score = report.score,
            high_score = report.high_score,
            "generation finished"
        );

        ScoredGeneration {
            policies: population.into_policies(),
            report,
        }
    }

    /// Runs one whole generation to extinction.
    pub fn run_generation<P>(&mut self, policies: Vec<P>) -> Result<ScoredGeneration<P>, ConfigError>
    where
        P: Policy,
    {
        let population = self.spawn(policies)?;
        Ok(self.conclude(population))
    }

    /// Produces the next policy set from a scored generation.
    pub fn evolve<P>(&mut self, scored: Vec<P>) -> Result<Vec<P>, ConfigError>
    where
        P: Policy,
    {
        self.evolver.evolve(scored, &mut self.rng)
    }

    /// Runs `generations` generations, evolving between them.
    ///
    /// `on_report` sees every scored generation. Returns the last generation's policies
    /// ranked best first; with `generations == 0` the initial policies are returned
    /// ranked by whatever fitness they carry.
    pub fn train<P, F>(
        &mut self,
        mut policies: Vec<P>,
        generations: u64,
        mut on_report: F,
    ) -> Result<Vec<P>, ConfigError>
    where
        P: Policy,
        F: FnMut(&ScoredGeneration<P>),
    {
        for remaining in (0..generations).rev() {
            let scored = self.run_generation(policies)?;
            on_report(&scored);
            if remaining == 0 {
                return Ok(rank(scored.policies));
            }
            policies = self.evolve(scored.policies)?;
        }
        Ok(rank(policies))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;

    use super::*;
    use crate::{
        config::EvolutionParams,
        network::FeedForwardNetwork,
        policy::testing::{ConstantPolicy, GapSeeker},
    };

    fn config(population_size: usize, elitism_fraction: f32) -> SimulationConfig {
        SimulationConfig {
            evolution: EvolutionParams {
                population_size,
                elitism_fraction,
            },
            tick_limit: Some(500),
            ..SimulationConfig::default()
        }
    }

    fn scored(fitness: &[f32]) -> Vec<ConstantPolicy> {
        fitness
            .iter()
            .map(|f| ConstantPolicy::with_fitness(0.0, *f))
            .collect()
    }

    #[test]
    fn test_elites_survive_unchanged_and_rest_are_offspring() {
        let policies = scored(&[30.0, 10.0, 40.0, 5.0]);
        let ids: Vec<_> = policies.iter().map(|p| p.id).collect();
        let mut rng = Pcg32::seed_from_u64(0);

        let next = Evolver::new(2, 4).unwrap().evolve(policies, &mut rng).unwrap();

        assert_eq!(next.len(), 4);
        assert_eq!(next[0].id, ids[2]);
        assert_eq!(next[0].fitness, 40.0);
        assert_eq!(next[1].id, ids[0]);
        assert_eq!(next[1].fitness, 30.0);
        for child in &next[2..] {
            assert!(!ids.contains(&child.id));
        }
    }

    #[test]
    fn test_rank_breaks_ties_by_index() {
        let policies = scored(&[1.0, 7.0, 7.0, 3.0, 7.0]);
        let ids: Vec<_> = policies.iter().map(|p| p.id).collect();
        let ranked: Vec<_> = rank(policies).iter().map(|p| p.id).collect();
        assert_eq!(ranked, [ids[1], ids[2], ids[4], ids[3], ids[0]]);
    }

    #[test]
    fn test_zero_elites_replaces_everyone() {
        let policies = scored(&[1.0, 2.0, 3.0]);
        let ids: Vec<_> = policies.iter().map(|p| p.id).collect();
        let next = Evolver::new(0, 3)
            .unwrap()
            .evolve(policies, &mut Pcg32::seed_from_u64(0))
            .unwrap();
        assert_eq!(next.len(), 3);
        assert!(next.iter().all(|p| !ids.contains(&p.id)));
    }

    #[test]
    fn test_evolver_rejects_splits_without_offspring() {
        assert_eq!(Evolver::new(0, 0), Err(ConfigError::EmptyPopulation));
        assert_eq!(
            Evolver::new(9, 4),
            Err(ConfigError::EliteCountTooLarge {
                elite_count: 9,
                population_size: 4
            })
        );
        assert_eq!(
            Evolver::new(4, 4),
            Err(ConfigError::EliteCountTooLarge {
                elite_count: 4,
                population_size: 4
            })
        );
        assert!(Evolver::new(3, 4).is_ok());
    }

    #[test]
    fn test_evolver_rejects_wrong_generation_size() {
        let evolver = Evolver::new(1, 4).unwrap();
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            evolver.evolve(scored(&[1.0, 2.0, 3.0]), &mut rng).err(),
            Some(ConfigError::PopulationSizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_invalid_config_is_reported_before_running() {
        assert_eq!(
            EvolutionController::with_seed(config(0, 0.5), 0).err(),
            Some(ConfigError::EmptyPopulation)
        );
        assert_eq!(
            EvolutionController::with_seed(config(4, 1.0), 0).err(),
            Some(ConfigError::EliteCountTooLarge {
                elite_count: 4,
                population_size: 4
            })
        );
    }

    #[test]
    fn test_spawn_rejects_wrong_policy_count() {
        let mut controller = EvolutionController::with_seed(config(4, 0.5), 0).unwrap();
        let err = controller
            .spawn(vec![ConstantPolicy::new(0.0); 3])
            .err();
        assert_eq!(
            err,
            Some(ConfigError::PopulationSizeMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn test_population_size_is_invariant() {
        let mut controller = EvolutionController::with_seed(config(6, 0.34), 9).unwrap();
        let mut policies = vec![ConstantPolicy::new(0.0); 6];
        for generation in 0..4 {
            let scored = controller.run_generation(policies).unwrap();
            assert_eq!(scored.policies.len(), 6);
            assert_eq!(scored.report.generation, generation);
            policies = controller.evolve(scored.policies).unwrap();
            assert_eq!(policies.len(), 6);
        }
        assert_eq!(controller.generation(), 4);
    }

    #[test]
    fn test_conclude_finishes_a_partially_run_population() {
        let mut controller = EvolutionController::with_seed(config(2, 0.5), 3).unwrap();
        let mut population = controller
            .spawn(vec![ConstantPolicy::new(0.0); 2])
            .unwrap();
        population.tick().unwrap();

        let scored = controller.conclude(population);
        assert_eq!(scored.report.ticks, 114);
        assert!(scored.policies.iter().all(|p| p.fitness == 114.0));
        assert_eq!(controller.last_report(), Some(&scored.report));
    }

    #[test]
    fn test_high_score_is_kept_across_generations() {
        let mut config = config(1, 0.0);
        config.world.gap_height = 400.0;
        config.world.spawn_margin = 0.0;
        let mut controller = EvolutionController::with_seed(config, 5).unwrap();

        let scored = controller
            .run_generation(vec![GapSeeker { fitness: 0.0 }])
            .unwrap();
        // Obstacles are cleared at ticks 175, 285 and 395 of the 500-tick run.
        assert_eq!(scored.report.score, 3);
        assert_eq!(controller.high_score(), 3);

        let scored = controller
            .run_generation(vec![GapSeeker { fitness: 0.0 }])
            .unwrap();
        assert_eq!(scored.report.score, 3);
        assert_eq!(controller.high_score(), 3);
        assert_eq!(controller.generation(), 2);
    }

    #[test]
    fn test_best_prefers_lowest_index_on_ties() {
        let policies = scored(&[2.0, 9.0, 9.0]);
        let expected = policies[1].id;
        let generation = ScoredGeneration {
            policies,
            report: GenerationReport {
                generation: 0,
                ticks: 0,
                best_fitness: 9.0,
                mean_fitness: 20.0 / 3.0,
                worst_fitness: 2.0,
                best_cleared: 0,
                score: 0,
                high_score: 0,
            },
        };
        assert_eq!(generation.best().map(|p| p.id), Some(expected));
    }

    #[test]
    fn test_training_is_reproducible_from_seed() {
        let run = || {
            let mut rng = Pcg32::seed_from_u64(21);
            let policies = FeedForwardNetwork::random_population(10, &Default::default(), &mut rng);
            let mut controller = EvolutionController::with_seed(config(10, 0.2), 77).unwrap();
            let mut reports = vec![];
            let ranked = controller
                .train(policies, 3, |scored| reports.push(scored.report))
                .unwrap();
            (ranked, reports)
        };

        let (first, first_reports) = run();
        let (second, second_reports) = run();
        assert_eq!(first_reports.len(), 3);
        assert_eq!(first_reports, second_reports);
        assert_eq!(first, second);
    }

    #[test]
    fn test_train_zero_generations_only_ranks() {
        let policies = scored(&[1.0, 3.0, 2.0]);
        let mut controller = EvolutionController::with_seed(config(3, 0.0), 0).unwrap();
        let ranked = controller.train(policies, 0, |_| unreachable!()).unwrap();
        let fitness: Vec<_> = ranked.iter().map(|p| p.fitness).collect();
        assert_eq!(fitness, [3.0, 2.0, 1.0]);
        assert_eq!(controller.generation(), 0);
    }
}
