use crate::model::Hmm;
use rand::distributions::Distribution;
use rand::Rng;

impl Hmm {
    /// An endless stream of (state, observation) pairs drawn from the model. Handy for
    /// generating synthetic training data.
    ///
    /// Rows of $A$ and $B$ are treated as categorical distributions; rows that do not sum
    /// to 1 are effectively truncated or padded onto their last category.
    pub fn sampler<'a, R: Rng + ?Sized>(&'a self, rng: &'a mut R) -> HmmSampleIter<'a, R> {
        let a_weighted_choices = self
            .a
            .rows()
            .into_iter()
            .map(|row| WeightedChoiceFloat::from_pmf(row.iter().cloned()))
            .collect();
        let b_weighted_choices = self
            .b
            .rows()
            .into_iter()
            .map(|row| WeightedChoiceFloat::from_pmf(row.iter().cloned()))
            .collect();
        let pi_weighted_choice = WeightedChoiceFloat::from_pmf(self.pi.iter().cloned());
        HmmSampleIter {
            a_weighted_choices,
            b_weighted_choices,
            pi_weighted_choice,
            rng,
            current_state: None,
        }
    }
}

/// The item yielded by `HmmSampleIter`
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HmmSample {
    pub x: usize,
    pub y: usize,
}

/// An iterator that returns random samples from an HMM
pub struct HmmSampleIter<'a, R: Rng + ?Sized + 'a> {
    a_weighted_choices: Vec<WeightedChoiceFloat>,
    b_weighted_choices: Vec<WeightedChoiceFloat>,
    pi_weighted_choice: WeightedChoiceFloat,
    rng: &'a mut R,
    current_state: Option<usize>,
}

impl<'a, R: Rng + ?Sized> Iterator for HmmSampleIter<'a, R> {
    type Item = HmmSample;

    fn next(&mut self) -> Option<Self::Item> {
        let state = if let Some(current_state) = self.current_state {
            self.a_weighted_choices[current_state].sample(self.rng)
        } else {
            self.pi_weighted_choice.sample(self.rng)
        };
        self.current_state = Some(state);
        Some(HmmSample {
            x: state,
            y: self.b_weighted_choices[state].sample(self.rng),
        })
    }
}

/// Sample from a [categorical distribution](https://en.wikipedia.org/wiki/Categorical_distribution)
/// where the weight for each category is a float.
pub(crate) struct WeightedChoiceFloat {
    cmf: Vec<f64>,
}

impl WeightedChoiceFloat {
    pub(crate) fn from_pmf<I: IntoIterator<Item = f64>>(pmf: I) -> Self {
        let cmf = pmf
            .into_iter()
            .scan(0.0, |state, x| {
                *state += x;
                Some(*state)
            })
            .collect();
        Self { cmf }
    }
}

impl Distribution<usize> for WeightedChoiceFloat {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let sampled_uniform = rng.gen::<f64>();
        self.cmf
            .iter()
            .position(|&x| sampled_uniform < x)
            .unwrap_or_else(|| self.cmf.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests_weighted_choice_float {
    use super::*;
    use crate::new_rng;

    #[test]
    fn unit() {
        let wcf = WeightedChoiceFloat::from_pmf(vec![1.0]);
        assert_eq!(0, wcf.sample(&mut new_rng()))
    }

    #[test]
    fn first() {
        let wcf = WeightedChoiceFloat::from_pmf(vec![1.0, 0.0]);
        assert_eq!(0, wcf.sample(&mut new_rng()))
    }

    #[test]
    fn last() {
        let wcf = WeightedChoiceFloat::from_pmf(vec![0.0, 1.0]);
        assert_eq!(1, wcf.sample(&mut new_rng()))
    }

    #[test]
    fn middle() {
        let wcf = WeightedChoiceFloat::from_pmf(vec![0.0, 1.0, 0.0]);
        assert_eq!(1, wcf.sample(&mut new_rng()))
    }

    #[test]
    fn short_mass_falls_onto_the_last_category() {
        let wcf = WeightedChoiceFloat::from_pmf(vec![0.0, 0.0]);
        assert_eq!(1, wcf.sample(&mut new_rng()))
    }
}
