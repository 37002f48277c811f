//! Error types shared by every engine in the crate.

use thiserror::Error;

/// Everything that can go wrong when configuring, querying or training an [`Hmm`](crate::Hmm).
///
/// Failing to converge within the iteration budget is not an error; see
/// [`TrainReport::converged`](crate::TrainReport).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HmmError {
    /// Malformed dimensions, an over-capacity model, an invalid distribution, or an
    /// observation sequence of the wrong length or with an out-of-range symbol.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The forward and backward passes disagree on P(Y), or P(Y) vanished. Either the
    /// recurrences are wrong or floating point broke down; training cannot continue.
    #[error(
        "internal inconsistency at iteration {iteration}: \
         forward likelihood {forward:e} vs backward likelihood {backward:e}"
    )]
    InternalInconsistency {
        iteration: usize,
        forward: f64,
        backward: f64,
    },
}

impl HmmError {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        HmmError::InvalidInput(message.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HmmError>;
