use crate::error::Result;
use crate::model::Hmm;
use ndarray::prelude::*;

/// The output of the backward pass over one observation sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Backward {
    /// A $T × N$ matrix: $β_i(t) = P(Y_{t+1}=y_{t+1}, \ldots, Y_{T-1}=y_{T-1} | X_t=i, θ)$
    pub beta: Array2<f64>,
    /// $P(Y|θ) = \sum_i π_i b_i(y_0) β_i(0)$
    pub likelihood: f64,
}

impl Hmm {
    /// The backward algorithm. Runs in $O(N^2 T)$.
    ///
    /// $$β_i(T-1) = 1$$
    ///
    /// $$β_i(t) = \sum_j a_{ij} b_j(y_{t+1}) β_j(t+1)$$
    ///
    /// Its likelihood is derived independently of [`Hmm::forward`] and must agree with it.
    pub fn backward(&self, ys: &[usize]) -> Result<Backward> {
        self.validate_observations(ys)?;
        Ok(self.backward_unchecked(ys))
    }

    /// $P(Y|θ)$, computed from the end of the sequence towards the beginning.
    pub fn reverse_likelihood(&self, ys: &[usize]) -> Result<f64> {
        self.backward(ys).map(|backward| backward.likelihood)
    }

    pub(crate) fn backward_unchecked(&self, ys: &[usize]) -> Backward {
        let mut beta = Array2::<f64>::ones((ys.len(), self.n()));
        for t in (1..ys.len()).rev() {
            let emitted = &beta.row(t) * &self.b.column(ys[t]);
            let previous = self.a.dot(&emitted);
            beta.row_mut(t - 1).assign(&previous);
        }

        let likelihood = match ys.first() {
            Some(&y) => (&self.pi * &self.b.column(y) * &beta.row(0)).sum(),
            None => 0.0,
        };
        Backward { beta, likelihood }
    }
}
