//! Weight vector operators for the reference network's genetic operators.
//!
//! These are the building blocks [`FeedForwardNetwork`](crate::network::FeedForwardNetwork)
//! uses to initialise policies and to produce offspring. All of them work on flat
//! `[f32]` slices and keep every weight within a symmetric bound `[-max, max]`.
//!
//! # Operations
//!
//! - **Initialization**: [`random`] generates uniform weight vectors
//! - **Crossover**: [`blx_alpha`] implements the BLX-α crossover operator
//! - **Mutation**: [`mutate`] applies sparse Gaussian mutation
//!
//! # Design Decisions
//!
//! ## BLX-α Crossover
//!
//! Unlike uniform crossover, BLX-α samples each child weight from a range that extends
//! past both parents by `α × |p1 - p2|`. A converged population therefore still explores
//! a little around its consensus, and `α` tunes how far.
//!
//! ## Gaussian Mutation
//!
//! Perturbations are drawn from `N(0, σ)` so small refinements are far more likely than
//! large jumps. Each weight is only touched with probability `rate`, which keeps most of
//! a good parent intact.
//!
//! ## Signed Weights
//!
//! Network weights and biases must be able to inhibit as well as excite, so the bound is
//! symmetric around zero. There is no normalisation step: the sigmoid output already
//! makes the decision scale-sensitive, and clamping is enough to keep magnitudes sane.

use rand::Rng;
use rand_distr::Normal;

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use flappy_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f32 + 1.0), 4);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0, 0.25]);
///
/// let weights = weights::from_fn(|_| -0.5, 3);
/// assert_eq!(weights, vec![-0.5, -0.5, -0.5]);
/// ```
pub fn from_fn<F>(f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    (0..len).map(f).collect()
}

/// Generates a weight vector with every weight drawn uniformly from `[-range, range]`.
pub fn random<R>(rng: &mut R, range: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-range..=range), len)
}

/// Performs BLX-α (Blend Crossover) between two parent weight vectors.
///
/// For parents `x1` and `x2` at position `i`:
///
/// 1. Compute `d = |x2 - x1|`
/// 2. Expand the range to `[min - α·d, max + α·d]`
/// 3. Sample the child weight uniformly from the expanded range
/// 4. Clamp it to `[-max_weight, max_weight]`
///
/// With `alpha = 0.0` children lie strictly between their parents; `0.5` is the usual
/// choice.
///
/// # Panics
///
/// Panics if the parent vectors have different lengths.
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, max_weight: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    p1.iter()
        .zip(p2)
        .map(|(&x1, &x2)| {
            let min = f32::min(x1, x2);
            let max = f32::max(x1, x2);
            let d = max - min;
            rng.random_range((min - alpha * d)..=(max + alpha * d))
                .clamp(-max_weight, max_weight)
        })
        .collect()
}

/// Applies Gaussian mutation to a weight vector in place.
///
/// Each weight, with probability `rate`, receives a perturbation drawn from
/// `N(0, sigma)` and is clamped back to `[-max_weight, max_weight]`.
///
/// # Panics
///
/// Panics if `sigma` is negative or not finite, or if `rate` is outside `[0, 1]`.
pub fn mutate<R>(weights: &mut [f32], sigma: f32, max_weight: f32, rate: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).expect("mutation sigma must be finite and non-negative");
    for w in weights {
        if rng.random_bool(rate.into()) {
            *w = (*w + rng.sample(normal)).clamp(-max_weight, max_weight);
        }
    }
}
