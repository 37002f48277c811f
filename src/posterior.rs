use crate::backward::Backward;
use crate::error::{HmmError, Result};
use crate::forward::Forward;
use crate::model::Hmm;
use itertools::Itertools;
use ndarray::prelude::*;

/// The E-step of Baum-Welch: posterior state and transition occupancies.
///
/// $$
/// γ_i(t) = P(X_t=i|Y,θ) = \frac{α_i(t)β_i(t)}{P(Y|θ)}
/// $$
///
/// $ξ_{ij}(t)$ is the probability of being in state $i$ at time $t$ and in state $j$ at time
/// $t + 1$:
///
/// $$
/// ξ_{ij}(t) = P(X_t=i,X_{t+1}=j|Y,θ) = \frac{α_i(t) a_{ij} b_j(y_{t+1}) β_j(t+1)}{P(Y|θ)}
/// $$
#[derive(Clone, Debug, PartialEq)]
pub struct Posteriors {
    /// $T × N$
    pub gamma: Array2<f64>,
    /// $(T - 1) × N × N$
    pub xi: Array3<f64>,
}

impl Posteriors {
    /// Combine the two lattices of one sequence. Both passes must have been run on `ys`
    /// with the current parameters of `hmm`, and the likelihood must be positive.
    pub fn compute(hmm: &Hmm, ys: &[usize], forward: &Forward, backward: &Backward) -> Self {
        let likelihood = forward.likelihood;
        let gamma = &forward.alpha * &backward.beta / likelihood;

        let n = hmm.n();
        let mut xi = Array3::<f64>::zeros((ys.len().saturating_sub(1), n, n));
        for (t, (_y_t0, &y_t1)) in ys.iter().tuple_windows().enumerate() {
            for i in 0..n {
                for j in 0..n {
                    xi[(t, i, j)] = forward.alpha[(t, i)]
                        * hmm.a[(i, j)]
                        * hmm.b[(j, y_t1)]
                        * backward.beta[(t + 1, j)]
                        / likelihood;
                }
            }
        }

        Self { gamma, xi }
    }
}

impl Hmm {
    /// Given a sequence of observations, compute the probability of being in each state at
    /// each point in time ($γ$), and of each transition between consecutive points ($ξ$).
    ///
    /// Fails if `ys` is malformed or impossible under the current parameters.
    pub fn posteriors(&self, ys: &[usize]) -> Result<Posteriors> {
        let forward = self.forward(ys)?;
        if forward.likelihood <= 0.0 {
            return Err(HmmError::invalid(
                "observation sequence has zero probability under the model",
            ));
        }
        let backward = self.backward_unchecked(ys);
        Ok(Posteriors::compute(self, ys, &forward, &backward))
    }
}
