//! Model capacity bounds and training knobs.

use crate::error::{HmmError, Result};

/// Default cap on $N$, the number of hidden states.
pub const DEFAULT_MAX_STATES: usize = 1_000;
/// Default cap on $M$, the number of observation symbols.
pub const DEFAULT_MAX_SYMBOLS: usize = 1_000;
/// Default cap on $T$, the length of an observation sequence.
pub const DEFAULT_MAX_LEN: usize = 1_000_000;
/// Default cap on $N^2 T$, the size of the transition posterior table built while
/// training. $2^{27}$ entries of `f64` is 1 GiB.
pub const DEFAULT_MAX_LATTICE: usize = 1 << 27;

/// The Baum-Welch loop gives up after this many iterations unless told otherwise.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
/// Relative tolerance used both for the forward/backward agreement check and for the
/// per-entry convergence test.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Upper bounds on the dimensions a model may be configured with. Anything larger is
/// rejected rather than truncated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capacity {
    pub max_states: usize,
    pub max_symbols: usize,
    pub max_len: usize,
    /// Bound on $N^2 T$.
    pub max_lattice: usize,
}

impl Capacity {
    pub fn unbounded() -> Self {
        Self {
            max_states: usize::MAX,
            max_symbols: usize::MAX,
            max_len: usize::MAX,
            max_lattice: usize::MAX,
        }
    }

    pub(crate) fn check(&self, n: usize, m: usize, t: usize) -> Result<()> {
        check_dimension("N", n, self.max_states)?;
        check_dimension("M", m, self.max_symbols)?;
        check_dimension("T", t, self.max_len)?;
        let lattice = n.saturating_mul(n).saturating_mul(t);
        if lattice > self.max_lattice {
            return Err(HmmError::invalid(format!(
                "N² · T = {} exceeds the configured capacity of {}",
                lattice, self.max_lattice
            )));
        }
        Ok(())
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            max_states: DEFAULT_MAX_STATES,
            max_symbols: DEFAULT_MAX_SYMBOLS,
            max_len: DEFAULT_MAX_LEN,
            max_lattice: DEFAULT_MAX_LATTICE,
        }
    }
}

fn check_dimension(name: &str, value: usize, max: usize) -> Result<()> {
    if value == 0 {
        return Err(HmmError::invalid(format!("{} must be positive", name)));
    }
    if value > max {
        return Err(HmmError::invalid(format!(
            "{} = {} exceeds the configured capacity of {}",
            name, value, max
        )));
    }
    Ok(())
}

/// Settings for [`Hmm::learn_with`](crate::Hmm::learn_with).
#[derive(Clone, Debug, PartialEq)]
pub struct TrainConfig {
    max_iterations: usize,
    tolerance: f64,
    normalize_init: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            normalize_init: false,
        }
    }
}

impl TrainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration budget (builder pattern). Must be at least 1.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self> {
        if max_iterations == 0 {
            return Err(HmmError::invalid("max_iterations must be positive"));
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }

    /// Set the relative tolerance ε (builder pattern). Must be finite and positive.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(HmmError::invalid("tolerance must be finite and positive"));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Renormalize the randomly drawn rows of A and B before the first iteration.
    ///
    /// Off by default: the raw U[0, 1) draws are used as-is and the first
    /// re-estimation turns every row into a distribution.
    pub fn with_normalized_init(mut self, normalize_init: bool) -> Self {
        self.normalize_init = normalize_init;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn normalize_init(&self) -> bool {
        self.normalize_init
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_rejects_zero_dimensions() {
        let capacity = Capacity::default();
        assert_eq!(
            capacity.check(0, 2, 3),
            Err(HmmError::invalid("N must be positive"))
        );
        assert_eq!(
            capacity.check(2, 0, 3),
            Err(HmmError::invalid("M must be positive"))
        );
        assert_eq!(
            capacity.check(2, 2, 0),
            Err(HmmError::invalid("T must be positive"))
        );
    }

    #[test]
    fn capacity_rejects_oversized_dimensions() {
        let capacity = Capacity {
            max_states: 2,
            max_symbols: 3,
            max_len: 4,
            ..Capacity::default()
        };
        assert!(capacity.check(2, 3, 4).is_ok());
        assert!(capacity.check(3, 3, 4).is_err());
        assert!(capacity.check(2, 4, 4).is_err());
        assert_eq!(
            capacity.check(2, 3, 5).unwrap_err().to_string(),
            "invalid input: T = 5 exceeds the configured capacity of 4"
        );
    }

    #[test]
    fn capacity_bounds_the_transition_lattice() {
        let capacity = Capacity::default();
        assert!(capacity.check(1_000, 2, 100).is_ok());
        assert!(capacity.check(2, 2, DEFAULT_MAX_LEN).is_ok());
        assert_eq!(
            capacity.check(1_000, 1_000, DEFAULT_MAX_LEN),
            Err(HmmError::invalid(
                "N² · T = 1000000000000 exceeds the configured capacity of 134217728"
            ))
        );
    }

    #[test]
    fn unbounded_capacity_accepts_large_models() {
        assert!(Capacity::unbounded().check(5_000, 5_000, 10_000_000).is_ok());
    }

    #[test]
    fn train_config_defaults() {
        let config = TrainConfig::new();
        assert_eq!(config.max_iterations(), DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.tolerance(), DEFAULT_TOLERANCE);
        assert!(!config.normalize_init());
    }

    #[test]
    fn train_config_validation() {
        assert!(TrainConfig::new().with_max_iterations(0).is_err());
        assert!(TrainConfig::new().with_tolerance(0.0).is_err());
        assert!(TrainConfig::new().with_tolerance(-1e-3).is_err());
        assert!(TrainConfig::new().with_tolerance(f64::NAN).is_err());

        let config = TrainConfig::new()
            .with_max_iterations(25)
            .and_then(|config| config.with_tolerance(1e-6))
            .unwrap()
            .with_normalized_init(true);
        assert_eq!(config.max_iterations(), 25);
        assert_eq!(config.tolerance(), 1e-6);
        assert!(config.normalize_init());
    }
}
