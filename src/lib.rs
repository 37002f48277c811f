#![cfg_attr(feature = "benchmark", feature(test))]
//! This library contains a Rust implementation of a time-invariant Hidden Markov model with
//! discrete observations. It solves the three classic HMM problems over a single observation
//! sequence of fixed length $T$:
//!
//! - **Likelihood**: $P(Y|θ)$ via the forward algorithm ([`Hmm::likelihood`]), cross-checked by
//!   the backward algorithm ([`Hmm::reverse_likelihood`]).
//! - **Decoding**: the most likely hidden state path via the Viterbi algorithm
//!   ([`Hmm::decode`], [`Hmm::most_likely_sequence`]).
//! - **Learning**: maximum likelihood estimates of $A$ and $B$ via Baum-Welch
//!   ([`Hmm::learn`], [`Hmm::learn_with`]).
//!
//! See [`Hmm`] for the notation used throughout.
//!
//! ```
//! use hmm_baum_welch::{Hmm, TrainConfig};
//! use ndarray::array;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut hmm = Hmm::configure(2, 2, 3, array![0.5, 0.5])?;
//! hmm.set_a(array![[0.7, 0.3], [0.4, 0.6]])?;
//! hmm.set_b(array![[0.9, 0.1], [0.2, 0.8]])?;
//!
//! let ys = [0, 0, 1];
//! assert!((hmm.likelihood(&ys)? - 0.119325).abs() < 1e-12);
//! assert_eq!(hmm.most_likely_sequence(&ys)?.states, vec![0, 0, 1]);
//!
//! let mut rng = StdRng::seed_from_u64(1337);
//! let report = hmm.learn_with(&ys, &TrainConfig::default(), &mut rng)?;
//! assert_eq!(report.iterations, report.likelihoods.len());
//! # Ok::<(), hmm_baum_welch::HmmError>(())
//! ```
//!
//! ## Numerics
//!
//! Every lattice holds plain probabilities, without log-space arithmetic or rescaling. Long
//! sequences therefore underflow towards zero; during training this surfaces as
//! [`HmmError::InternalInconsistency`].
//!
//! ## Logging
//!
//! Training progress is reported through [`tracing`]: one `debug` event per Baum-Welch
//! iteration, and an `info` or `warn` event when training stops. Install a subscriber to see
//! them.
//!
//! There is a small amount of benchmarking functionality gated by the `benchmark` feature.
#[cfg(feature = "benchmark")]
extern crate test;

mod backward;
mod config;
mod error;
mod forward;
mod model;
mod ndarray_utils;
mod posterior;
mod sample;
#[cfg(test)]
mod test_fixtures;
mod train;
mod viterbi;

pub use self::backward::Backward;
pub use self::config::{
    Capacity, TrainConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_LATTICE, DEFAULT_MAX_LEN,
    DEFAULT_MAX_STATES, DEFAULT_MAX_SYMBOLS, DEFAULT_TOLERANCE,
};
pub use self::error::{HmmError, Result};
pub use self::forward::Forward;
pub use self::model::{Hmm, ParameterSnapshot, DISTRIBUTION_TOLERANCE};
pub use self::ndarray_utils::approx_eq;
pub use self::posterior::Posteriors;
pub use self::sample::{HmmSample, HmmSampleIter};
pub use self::train::{parameters_unchanged, reestimate, TrainReport};
pub use self::viterbi::ViterbiPath;

/// A seeded RNG so that tests are reproducible.
#[cfg(test)]
fn new_rng() -> impl rand::Rng {
    use rand::SeedableRng;
    rand::rngs::StdRng::seed_from_u64(1337)
}
