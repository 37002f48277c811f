use crate::config::TrainConfig;
use crate::error::{HmmError, Result};
use crate::model::Hmm;
use crate::ndarray_utils::*;
use crate::posterior::Posteriors;
use ndarray::prelude::*;
use rand::Rng;
use tracing::{debug, error, info, warn};

/// What happened during one call to [`Hmm::learn_with`].
#[derive(Clone, Debug, PartialEq)]
pub struct TrainReport {
    /// Whether the last iteration left every entry of $A$ and $B$ unchanged within
    /// tolerance. `false` means the iteration budget ran out first.
    pub converged: bool,
    pub iterations: usize,
    /// $P(Y|θ)$ under the parameters at the start of each iteration.
    pub likelihoods: Vec<f64>,
}

/// The M-step: new $A$ and $B$ from the posteriors of one sequence.
///
/// $$
/// a_{ij}^*=\frac{\sum^{T-2}\_{t=0}ξ\_{ij}(t)}{\sum^{T-2}\_{t=0}\sum_k ξ\_{ik}(t)}
/// $$
///
/// $$
/// b_i^*(k)=\frac{\sum^{T-1}_{t=0} 1_{y_t=k} γ_i(t)}{\sum^{T-1}_{t=0} γ_i(t)}
/// $$
///
/// A state with no expected transitions out of it (always the case when $T = 1$) gets a
/// uniform row in $A$; a state with no expected occupancy gets a uniform row in $B$.
pub fn reestimate(posteriors: &Posteriors, ys: &[usize], m: usize) -> (Array2<f64>, Array2<f64>) {
    let n = posteriors.gamma.ncols();

    // Expected number of i → j transitions
    let transitions = posteriors.xi.sum_axis(Axis(0));

    // Expected number of times state i emits symbol k
    let mut emissions = Array2::<f64>::zeros((n, m));
    for (gamma_t, &y) in posteriors.gamma.rows().into_iter().zip(ys) {
        let mut emitted = emissions.column_mut(y);
        emitted += &gamma_t;
    }

    (normalize_counts(transitions), normalize_counts(emissions))
}

fn normalize_counts(mut counts: Array2<f64>) -> Array2<f64> {
    let fallback = uniform(counts.ncols());
    for mut row in counts.rows_mut() {
        let total = row.sum();
        if total == 0.0 {
            row.assign(&fallback);
        } else {
            row /= total;
        }
    }
    counts
}

/// `true` when every entry of both tables is unchanged within the relative `tolerance`.
pub fn parameters_unchanged(
    old_a: &Array2<f64>,
    old_b: &Array2<f64>,
    new_a: &Array2<f64>,
    new_b: &Array2<f64>,
    tolerance: f64,
) -> bool {
    old_a.all_close(new_a, tolerance) && old_b.all_close(new_b, tolerance)
}

impl Hmm {
    /// [`Hmm::learn_with`] using [`TrainConfig::default`], reporting only whether training
    /// converged.
    pub fn learn<R: Rng + ?Sized>(&mut self, ys: &[usize], rng: &mut R) -> Result<bool> {
        self.learn_with(ys, &TrainConfig::default(), rng)
            .map(|report| report.converged)
    }

    /// Find a maximum likelihood estimate for $A$ and $B$ with Baum-Welch (Baum et. al. 1970),
    /// the Expectation-Maximization algorithm for HMMs. $π$ is taken as given and is never
    /// updated.
    ///
    /// $A$ and $B$ are first overwritten with random values drawn from `rng`. Each iteration
    /// then runs the forward and backward passes, computes [`Posteriors`], and commits the
    /// re-estimated tables. Training stops after the first iteration in which no entry moved
    /// by more than `config.tolerance()`, or when `config.max_iterations()` is reached.
    ///
    /// Caveats:
    /// - This is not guaranteed to find a global maximum, only a local one.
    /// - Due to a lack of identifiability, an HMM with $N$ states has up to $N!$ equivalent
    ///   solutions.
    ///
    /// Malformed observations are rejected before anything is modified. If the forward and
    /// backward likelihoods disagree, or vanish, the call fails with
    /// [`HmmError::InternalInconsistency`] and the tables keep the values committed by the
    /// previous iteration. A failure in the very first iteration restores the tables the
    /// model had before the call, since the random draws are not distributions.
    pub fn learn_with<R: Rng + ?Sized>(
        &mut self,
        ys: &[usize],
        config: &TrainConfig,
        rng: &mut R,
    ) -> Result<TrainReport> {
        self.validate_observations(ys)?;
        let initial = (self.a.clone(), self.b.clone());
        self.randomize(rng, config.normalize_init());

        let mut report = TrainReport {
            converged: false,
            iterations: 0,
            likelihoods: Vec::new(),
        };
        while !report.converged && report.iterations < config.max_iterations() {
            let (likelihood, a, b) = match self.baum_welch_step(ys, config, report.iterations) {
                Ok(step) => step,
                Err(err) => {
                    if report.iterations == 0 {
                        let (a, b) = initial;
                        self.a = a;
                        self.b = b;
                    }
                    return Err(err);
                }
            };
            report.converged =
                parameters_unchanged(&self.a, &self.b, &a, &b, config.tolerance());
            self.a = a;
            self.b = b;
            report.iterations += 1;
            report.likelihoods.push(likelihood);
            debug!(
                "Baum-Welch iteration {}: likelihood={:e}",
                report.iterations, likelihood
            );
        }

        if report.converged {
            info!("Baum-Welch converged after {} iterations", report.iterations);
        } else {
            warn!(
                "Baum-Welch did not converge within {} iterations",
                report.iterations
            );
        }
        Ok(report)
    }

    fn baum_welch_step(
        &self,
        ys: &[usize],
        config: &TrainConfig,
        iteration: usize,
    ) -> Result<(f64, Array2<f64>, Array2<f64>)> {
        let forward = self.forward_unchecked(ys);
        let backward = self.backward_unchecked(ys);

        let usable = forward.likelihood.is_finite() && forward.likelihood > 0.0;
        if !usable || !approx_eq(forward.likelihood, backward.likelihood, config.tolerance()) {
            error!(
                "forward likelihood {:e} and backward likelihood {:e} are inconsistent at iteration {}",
                forward.likelihood, backward.likelihood, iteration
            );
            return Err(HmmError::InternalInconsistency {
                iteration,
                forward: forward.likelihood,
                backward: backward.likelihood,
            });
        }

        let posteriors = Posteriors::compute(self, ys, &forward, &backward);
        let (a, b) = reestimate(&posteriors, ys, self.m());
        Ok((forward.likelihood, a, b))
    }
}


#[cfg(feature = "benchmark")]
mod benchmark {
    use crate::*;
    use ndarray::array;
    use test::Bencher;

    #[bench]
    fn bench(b: &mut Bencher) {
        let mut rng = new_rng();
        let observations: Vec<usize> = [0, 1].iter().cycle().take(101).cloned().collect();
        let config = TrainConfig::new().with_max_iterations(10).unwrap();
        let mut hmm = Hmm::configure(2, 2, observations.len(), array![0.5, 0.5]).unwrap();
        b.iter(|| hmm.learn_with(&observations, &config, &mut rng));
    }
}
