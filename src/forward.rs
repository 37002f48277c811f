use crate::error::Result;
use crate::model::Hmm;
use ndarray::prelude::*;

/// The output of the forward pass over one observation sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Forward {
    /// A $T × N$ matrix: $α_i(t) = P(Y_0=y_0, \ldots, Y_t=y_t, X_t=i | θ)$
    pub alpha: Array2<f64>,
    /// $P(Y|θ) = \sum_i α_i(T-1)$
    pub likelihood: f64,
}

impl Hmm {
    /// The forward algorithm. Runs in $O(N^2 T)$.
    ///
    /// $$α_i(0) = π_i b_i(y_0)$$
    ///
    /// $$α_i(t) = b_i(y_t) \sum_j α_j(t-1) a_{ji}$$
    ///
    /// No rescaling is applied, so long sequences underflow towards zero.
    pub fn forward(&self, ys: &[usize]) -> Result<Forward> {
        self.validate_observations(ys)?;
        Ok(self.forward_unchecked(ys))
    }

    /// $P(Y|θ)$, summed over every hidden state path.
    pub fn likelihood(&self, ys: &[usize]) -> Result<f64> {
        self.forward(ys).map(|forward| forward.likelihood)
    }

    pub(crate) fn forward_unchecked(&self, ys: &[usize]) -> Forward {
        let mut alpha = Array2::<f64>::zeros((ys.len(), self.n()));
        for (t, &y) in ys.iter().enumerate() {
            let transition_probs = if t == 0 {
                self.pi.to_owned()
            } else {
                alpha.row(t - 1).dot(&self.a)
            };
            alpha
                .row_mut(t)
                .assign(&(transition_probs * &self.b.column(y)));
        }

        let likelihood = alpha
            .rows()
            .into_iter()
            .last()
            .map_or(0.0, |alpha_last| alpha_last.sum());
        Forward { alpha, likelihood }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::HmmError;
    use crate::test_fixtures::*;
    use ndarray::array;
    use spectral::prelude::*;

    /// Calculated by hand from the parameters of HMM_WEATHER
    #[test]
    fn forward_weather() {
        let forward = HMM_WEATHER.forward(&[0, 0, 1]).unwrap();
        let expected = array![[0.45, 0.1], [0.3195, 0.039], [0.023925, 0.0954]];
        for (actual, expected) in forward.alpha.iter().zip(expected.iter()) {
            assert_that(actual).is_close_to(*expected, 1e-12);
        }
        assert_that(&forward.likelihood).is_close_to(0.119325, 1e-12);
    }

    #[test]
    fn single_step_is_the_base_case() {
        let mut hmm = HMM_WEATHER.clone();
        hmm.set_t(1).unwrap();
        let forward = hmm.forward(&[1]).unwrap();
        assert_eq!(forward.alpha.dim(), (1, 2));
        // π_0 b_0(1) + π_1 b_1(1)
        assert_that(&forward.likelihood).is_close_to(0.5 * 0.1 + 0.5 * 0.8, 1e-15);
    }

    #[test]
    fn certain_sequence() {
        let hmm = periodic(3);
        assert_eq!(hmm.likelihood(&[1, 0, 1]).unwrap(), 1.0);
        assert_eq!(hmm.likelihood(&[0, 1, 0]).unwrap(), 0.0);
    }

    #[test]
    fn likelihoods_of_every_sequence_sum_to_one() {
        let hmm = fancy(2);
        let total: f64 = [[0, 0], [0, 1], [1, 0], [1, 1]]
            .iter()
            .map(|ys| hmm.likelihood(ys).unwrap())
            .sum();
        assert_that(&total).is_close_to(1.0, 1e-12);
    }

    #[test]
    fn rejects_malformed_observations() {
        assert!(matches!(
            HMM_WEATHER.forward(&[0, 0]),
            Err(HmmError::InvalidInput(_))
        ));
        assert!(matches!(
            HMM_WEATHER.likelihood(&[0, 0, 2]),
            Err(HmmError::InvalidInput(_))
        ));
    }
}
