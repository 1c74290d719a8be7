//! Neuroevolution of flight policies.
//!
//! This crate turns the single-agent world of `flappy-engine` into a training loop: many
//! agents fly through the same obstacle field at once, each controlled by its own
//! policy, and the best policies of one generation seed the next.
//!
//! # How Training Works
//!
//! 1. **Spawn** - Bind `N` policies to `N` agents in a freshly seeded world
//! 2. **Simulate** - Tick the population; each live agent senses, decides and moves
//! 3. **Score** - When an agent collides, its life is scored and written to its policy
//! 4. **Select** - Once every agent is dead, rank the policies by fitness
//! 5. **Reproduce** - Keep the elites unchanged and fill the rest with offspring
//! 6. **Repeat** - Continue for as many generations as the host asks for
//!
//! # Architecture
//!
//! ```text
//! EvolutionController
//!     ↓ spawns
//! Population (agents[i] ↔ policies[i])
//!     ↓ ticks
//! ObstacleField + sensor + AgentBody (flappy-engine)
//!     ↓ on death
//! FitnessWeights::award
//!     ↓ scored policies
//! Evolver (elites + Policy::produce_offspring)
//! ```
//!
//! # Modules
//!
//! - [`policy`] - the [`Policy`](policy::Policy) capability trait and the flap decision
//! - [`agent`] - one simulated entity and its telemetry
//! - [`fitness`] - the fitness formula
//! - [`population`] - one generation, advanced tick by tick
//! - [`evolution`] - ranking, elitism and the generation-level controller
//! - [`report`] - per-generation summaries
//! - [`config`] - serde-backed run configuration and its validation
//! - [`network`] - the reference feed-forward network policy
//! - [`weights`] - genetic operators on flat weight vectors
//!
//! # Example
//!
//! ```
//! use flappy_training::{
//!     config::SimulationConfig, evolution::EvolutionController, network::FeedForwardNetwork,
//!     policy::Policy as _,
//! };
//! use rand::SeedableRng as _;
//!
//! let mut config = SimulationConfig::default();
//! config.evolution.population_size = 12;
//! config.tick_limit = Some(400);
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(3);
//! let policies = FeedForwardNetwork::random_population(12, &Default::default(), &mut rng);
//!
//! let mut controller = EvolutionController::with_seed(config, 3)?;
//! let ranked = controller.train(policies, 2, |scored| {
//!     assert_eq!(scored.policies.len(), 12);
//! })?;
//! assert!(ranked[0].fitness() >= ranked[11].fitness());
//! # Ok::<(), flappy_training::config::ConfigError>(())
//! ```
//!
//! # Current Limitations
//!
//! - **Single-threaded ticks**: agents are independent within a tick, but the per-agent
//!   pass runs sequentially
//! - **Fixed topology**: the reference network never grows hidden units
//! - **No persistence of runs**: a training run cannot be resumed, only its best network
//!   saved

pub mod agent;
pub mod config;
pub mod evolution;
pub mod fitness;
pub mod network;
pub mod policy;
pub mod population;
pub mod report;
pub mod weights;
