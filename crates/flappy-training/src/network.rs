//! A small fixed-topology neural network used as the default [`Policy`].
//!
//! ```text
//! 6 inputs ──▶ 4 hidden (ReLU) ──▶ 1 output (sigmoid)
//! ```
//!
//! The network's parameters are a flat vector of [`WEIGHT_COUNT`] weights, laid out as
//! input-to-hidden weights (input-major), hidden biases, hidden-to-output weights and
//! the output bias. Keeping them flat lets the [`weights`](crate::weights) operators
//! treat a network as a plain genome.

use flappy_engine::sensor::{OBSERVATION_LEN, Observation};
use rand::{Rng, seq::IndexedRandom as _};
use serde::{Deserialize, Serialize};

use crate::{policy::Policy, weights};

pub const INPUTS: usize = OBSERVATION_LEN;
pub const HIDDEN: usize = 4;
pub const WEIGHT_COUNT: usize = INPUTS * HIDDEN + HIDDEN + HIDDEN + 1;

const HIDDEN_BIAS: usize = INPUTS * HIDDEN;
const OUTPUT_WEIGHTS: usize = HIDDEN_BIAS + HIDDEN;
const OUTPUT_BIAS: usize = OUTPUT_WEIGHTS + HIDDEN;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("network needs {expected} weights, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },
    #[display("breeding parameter `{_0}` is out of range")]
    InvalidBreeding(#[error(not(source))] &'static str),
}

/// Genetic operator parameters, carried by every network so offspring inherit them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingParams {
    /// Initial weights are uniform in `[-init_range, init_range]`.
    pub init_range: f32,
    /// Weights are clamped to `[-max_weight, max_weight]` after crossover and mutation.
    pub max_weight: f32,
    /// Candidates drawn per tournament (larger = stronger selection pressure).
    pub tournament_size: usize,
    /// BLX-α range expansion.
    pub blx_alpha: f32,
    /// Per-weight mutation probability.
    pub mutation_rate: f32,
    /// Standard deviation of the Gaussian mutation.
    pub mutation_sigma: f32,
}

impl Default for BreedingParams {
    fn default() -> Self {
        Self {
            init_range: 1.0,
            max_weight: 5.0,
            tournament_size: 3,
            blx_alpha: 0.5,
            mutation_rate: 0.3,
            mutation_sigma: 0.5,
        }
    }
}

/// A 6 → 4 → 1 feed-forward network and the fitness of the agent it last flew.
///
/// Fitness is runtime state and is not serialized; a loaded network starts at zero.
///
/// # Example
///
/// ```
/// use flappy_engine::sensor::Observation;
/// use flappy_training::{network::FeedForwardNetwork, policy::Policy as _};
/// use rand::SeedableRng as _;
///
/// let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
/// let network = FeedForwardNetwork::random(&Default::default(), &mut rng);
///
/// let output = network.evaluate(&Observation::new([0.1, -0.5, 0.6, 0.4, 0.3, 0.2]));
/// assert!((0.0..=1.0).contains(&output));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct FeedForwardNetwork {
    weights: Vec<f32>,
    #[serde(default)]
    breeding: BreedingParams,
    #[serde(skip)]
    fitness: f32,
}

#[derive(Deserialize)]
struct RawNetwork {
    weights: Vec<f32>,
    #[serde(default)]
    breeding: BreedingParams,
}

impl TryFrom<RawNetwork> for FeedForwardNetwork {
    type Error = NetworkError;

    fn try_from(raw: RawNetwork) -> Result<Self, Self::Error> {
        Self::new(raw.weights, raw.breeding)
    }
}

impl BreedingParams {
    /// Checks that the genetic operators can run with these values.
    ///
    /// Ranges and `mutation_sigma` must be finite and non-negative, and `mutation_rate`
    /// must be a probability.
    pub fn validate(&self) -> Result<(), NetworkError> {
        for (name, value) in [
            ("init_range", self.init_range),
            ("max_weight", self.max_weight),
            ("blx_alpha", self.blx_alpha),
            ("mutation_sigma", self.mutation_sigma),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NetworkError::InvalidBreeding(name));
            }
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(NetworkError::InvalidBreeding("mutation_rate"));
        }
        Ok(())
    }
}

impl FeedForwardNetwork {
    /// Builds a network from a flat weight vector of length [`WEIGHT_COUNT`].
    ///
    /// Fails on a wrong weight count or on breeding parameters that do not pass
    /// [`BreedingParams::validate`].
    pub fn new(weights: Vec<f32>, breeding: BreedingParams) -> Result<Self, NetworkError> {
        if weights.len() != WEIGHT_COUNT {
            return Err(NetworkError::WeightCountMismatch {
                expected: WEIGHT_COUNT,
                actual: weights.len(),
            });
        }
        breeding.validate()?;
        Ok(Self {
            weights,
            breeding,
            fitness: 0.0,
        })
    }

    /// Draws a network with weights uniform in `[-init_range, init_range]`.
    ///
    /// # Panics
    ///
    /// Panics if `params.init_range` is negative or not finite.
    #[must_use]
    pub fn random<R>(params: &BreedingParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            weights: weights::random(rng, params.init_range, WEIGHT_COUNT),
            breeding: *params,
            fitness: 0.0,
        }
    }

    #[must_use]
    pub fn random_population<R>(count: usize, params: &BreedingParams, rng: &mut R) -> Vec<Self>
    where
        R: Rng + ?Sized,
    {
        (0..count).map(|_| Self::random(params, rng)).collect()
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[must_use]
    pub fn breeding(&self) -> &BreedingParams {
        &self.breeding
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn tournament_select<'a, R>(
    pool: &'a [FeedForwardNetwork],
    size: usize,
    rng: &mut R,
) -> &'a FeedForwardNetwork
where
    R: Rng + ?Sized,
{
    pool.choose_multiple(rng, size.max(1))
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("offspring pool is never empty")
}

impl Policy for FeedForwardNetwork {
    fn evaluate(&self, inputs: &Observation) -> f32 {
        let w = &self.weights;
        let x = inputs.values();
        let mut output = w[OUTPUT_BIAS];
        for j in 0..HIDDEN {
            let activation = (0..INPUTS)
                .map(|i| x[i] * w[i * HIDDEN + j])
                .sum::<f32>()
                + w[HIDDEN_BIAS + j];
            output += activation.max(0.0) * w[OUTPUT_WEIGHTS + j];
        }
        sigmoid(output)
    }

    fn fitness(&self) -> f32 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    /// Tournament-selects two parents, blends them with BLX-α and mutates the child.
    ///
    /// The breeding parameters of the pool's best network are used.
    ///
    /// # Panics
    ///
    /// Panics if `pool` is empty or its mutation parameters are invalid.
    fn produce_offspring<R>(pool: &[Self], rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let params = pool[0].breeding;
        let p1 = tournament_select(pool, params.tournament_size, rng);
        let p2 = tournament_select(pool, params.tournament_size, rng);
        let mut child = weights::blx_alpha(
            &p1.weights,
            &p2.weights,
            params.blx_alpha,
            params.max_weight,
            rng,
        );
        weights::mutate(
            &mut child,
            params.mutation_sigma,
            params.max_weight,
            params.mutation_rate,
            rng,
        );
        Self {
            weights: child,
            breeding: params,
            fitness: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn network(weights: Vec<f32>) -> FeedForwardNetwork {
        FeedForwardNetwork::new(weights, BreedingParams::default()).unwrap()
    }

    #[test]
    fn test_weight_count() {
        assert_eq!(WEIGHT_COUNT, 33);
    }

    #[test]
    fn test_zero_network_outputs_half() {
        let network = network(vec![0.0; WEIGHT_COUNT]);
        assert_eq!(network.evaluate(&Observation::new([1.0; 6])), 0.5);
    }

    #[test]
    fn test_hand_wired_network_follows_first_input() {
        // hidden[0] = relu(x0), output = sigmoid(10 * hidden[0] - 1)
        let mut weights = vec![0.0; WEIGHT_COUNT];
        weights[0] = 1.0;
        weights[OUTPUT_WEIGHTS] = 10.0;
        weights[OUTPUT_BIAS] = -1.0;
        let network = network(weights);

        let below = network.evaluate(&Observation::new([0.5, 0.0, 0.0, 0.0, 0.0, 0.0]));
        let above = network.evaluate(&Observation::new([-0.5, 0.0, 0.0, 0.0, 0.0, 0.0]));
        assert!(below > 0.98);
        assert!((above - sigmoid(-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_weight_count_is_rejected() {
        assert_eq!(
            FeedForwardNetwork::new(vec![0.0; 5], BreedingParams::default()),
            Err(NetworkError::WeightCountMismatch {
                expected: WEIGHT_COUNT,
                actual: 5
            })
        );
        let json = r#"{ "weights": [0.0, 1.0] }"#;
        assert!(serde_json::from_str::<FeedForwardNetwork>(json).is_err());
    }

    #[test]
    fn test_out_of_range_breeding_is_rejected() {
        let cases = [
            (
                BreedingParams {
                    mutation_sigma: -0.1,
                    ..BreedingParams::default()
                },
                "mutation_sigma",
            ),
            (
                BreedingParams {
                    mutation_rate: 1.5,
                    ..BreedingParams::default()
                },
                "mutation_rate",
            ),
            (
                BreedingParams {
                    mutation_rate: -0.5,
                    ..BreedingParams::default()
                },
                "mutation_rate",
            ),
            (
                BreedingParams {
                    init_range: -1.0,
                    ..BreedingParams::default()
                },
                "init_range",
            ),
            (
                BreedingParams {
                    blx_alpha: -0.5,
                    ..BreedingParams::default()
                },
                "blx_alpha",
            ),
            (
                BreedingParams {
                    max_weight: f32::NAN,
                    ..BreedingParams::default()
                },
                "max_weight",
            ),
        ];
        for (params, name) in cases {
            let expected = Err(NetworkError::InvalidBreeding(name));
            assert_eq!(params.validate(), expected);
            assert_eq!(
                FeedForwardNetwork::new(vec![0.0; WEIGHT_COUNT], params).map(|_| ()),
                expected
            );
        }
        assert_eq!(BreedingParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_loaded_breeding_is_validated() {
        let mut raw = serde_json::to_value(network(vec![0.0; WEIGHT_COUNT])).unwrap();
        raw["breeding"]["mutation_sigma"] = serde_json::json!(-2.0);
        let err = serde_json::from_value::<FeedForwardNetwork>(raw.clone()).unwrap_err();
        assert!(err.to_string().contains("mutation_sigma"));

        raw["breeding"]["mutation_sigma"] = serde_json::json!(0.5);
        raw["breeding"]["mutation_rate"] = serde_json::json!(2.0);
        let err = serde_json::from_value::<FeedForwardNetwork>(raw).unwrap_err();
        assert!(err.to_string().contains("mutation_rate"));
    }

    #[test]
    fn test_serde_keeps_weights_and_drops_fitness() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut original = FeedForwardNetwork::random(&BreedingParams::default(), &mut rng);
        original.set_fitness(123.0);

        let json = serde_json::to_string(&original).unwrap();
        let loaded: FeedForwardNetwork = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.weights(), original.weights());
        assert_eq!(loaded.breeding(), original.breeding());
        assert_eq!(loaded.fitness(), 0.0);
    }

    #[test]
    fn test_offspring_stays_within_bounds() {
        let params = BreedingParams {
            max_weight: 1.5,
            ..BreedingParams::default()
        };
        let mut rng = Pcg32::seed_from_u64(12);
        let pool = FeedForwardNetwork::random_population(8, &params, &mut rng);
        for _ in 0..50 {
            let child = FeedForwardNetwork::produce_offspring(&pool, &mut rng);
            assert_eq!(child.weights().len(), WEIGHT_COUNT);
            assert!(child.weights().iter().all(|w| (-1.5..=1.5).contains(w)));
            assert_eq!(child.fitness(), 0.0);
        }
    }

    #[test]
    fn test_tournament_prefers_fitter_networks() {
        let mut pool = vec![
            network(vec![1.0; WEIGHT_COUNT]),
            network(vec![-1.0; WEIGHT_COUNT]),
        ];
        pool[0].set_fitness(100.0);
        pool[1].set_fitness(1.0);
        let mut rng = Pcg32::seed_from_u64(13);
        // A tournament of the whole pool always picks the best.
        for _ in 0..10 {
            assert_eq!(tournament_select(&pool, 2, &mut rng).fitness(), 100.0);
        }
    }
}
