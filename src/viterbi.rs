use crate::error::Result;
use crate::model::Hmm;
use crate::ndarray_utils::*;
use ndarray::prelude::*;

/// The most likely hidden state sequence for some observations, and its joint probability
/// with them.
#[derive(Clone, Debug, PartialEq)]
pub struct ViterbiPath {
    pub states: Vec<usize>,
    pub probability: f64,
}

impl Hmm {
    /// The probability of the single most likely hidden state path, $\max_X P(X, Y|θ)$.
    ///
    /// This can never exceed [`Hmm::likelihood`], which sums over every path.
    pub fn decode(&self, ys: &[usize]) -> Result<f64> {
        self.most_likely_sequence(ys).map(|path| path.probability)
    }

    /// This is the Viterbi algorithm. Given a sequence of observations, return the most likely
    /// sequence of states.
    ///
    /// The recurrence is the forward algorithm with the sum replaced by a max. Probabilities
    /// are not renormalized between steps, so `probability` is exact but underflows on long
    /// sequences. When several predecessors tie, the lowest-numbered state wins.
    pub fn most_likely_sequence(&self, ys: &[usize]) -> Result<ViterbiPath> {
        self.validate_observations(ys)?;
        let t_len = ys.len();

        // probs is a T × N matrix where probs[t, i] is the probability of the most likely
        // sequence of hidden states ending in state i at time t, jointly with the
        // observations up to time t.
        let mut probs = Array2::<f64>::zeros((t_len, self.n()));

        // x_to_prev_x is a (T - 1) × N matrix where each entry x_to_prev_x[t, i] is the most likely
        // state that would have occurred at time t given that we're in state i at time t + 1.
        let mut x_to_prev_x = Array2::<usize>::zeros((t_len - 1, self.n()));

        probs
            .row_mut(0)
            .assign(&(&self.pi * &self.b.column(ys[0])));

        for t in 1..t_len {
            let y = ys[t];
            for i in 0..self.n() {
                for j in 0..self.n() {
                    let prob_i_j = probs[(t - 1, i)] * self.a[(i, j)] * self.b[(j, y)];
                    if prob_i_j > probs[(t, j)] {
                        probs[(t, j)] = prob_i_j;
                        x_to_prev_x[(t - 1, j)] = i;
                    }
                }
            }
        }

        let (mut i, probability) = probs.row(t_len - 1).maxf().unwrap_or((0, 0.0));
        let mut states = vec![0; t_len];
        states[t_len - 1] = i;
        for t in (0..t_len - 1).rev() {
            i = x_to_prev_x[(t, i)];
            states[t] = i;
        }
        Ok(ViterbiPath {
            states,
            probability,
        })
    }
}
