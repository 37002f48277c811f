use crate::config::Capacity;
use crate::error::{HmmError, Result};
use crate::ndarray_utils::*;
use ndarray::prelude::*;
use rand::Rng;
use std::fmt;

/// Distributions handed to us by the caller must sum to 1 within this tolerance.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-5;

/// The parameters of a time-invariant HMM with discrete observations, together with the
/// fixed sequence length $T$ every engine call is checked against.
///
/// # Math
///
/// The HMM is used to predict a sequence of observations:
///
/// $$Y=(Y_0=y_0, Y_1=y_1, \ldots, Y_{T-1}=y_{T-1})$$
///
/// ...where each $y_t \in [0, M)$.
///
/// It accomplishes this with latent variables for hidden state $X=(X_0, \ldots, X_{T-1})$ where each
/// $x_t \in [0, N)$.
///
/// An HMM has three parameters:
/// * $A$, the $N × N$ state transition matrix: $a_{ij}=P(X_t=j|X_{t-1}=i)$
/// * $B$, the $N × M$ observation matrix: $b_{ik}=P(Y_t=k|X_t=i)$
/// * $π$, the $N$-length initial state distribution: $π_i=P(X_0=i)$
///
/// While training, $A$ and $B$ may temporarily hold rows that are not distributions
/// (see [`Hmm::randomize`]).
#[derive(Clone, Debug, PartialEq)]
pub struct Hmm {
    pub(crate) a: Array2<f64>,
    pub(crate) b: Array2<f64>,
    pub(crate) pi: Array1<f64>,
    pub(crate) seq_len: usize,
    capacity: Capacity,
}

impl Hmm {
    /// Set the dimensions and the initial state distribution, with the default
    /// [`Capacity`]. $A$ and $B$ start out uniform.
    pub fn configure(n: usize, m: usize, t: usize, pi: Array1<f64>) -> Result<Self> {
        Self::configure_with_capacity(n, m, t, pi, &Capacity::default())
    }

    pub fn configure_with_capacity(
        n: usize,
        m: usize,
        t: usize,
        pi: Array1<f64>,
        capacity: &Capacity,
    ) -> Result<Self> {
        capacity.check(n, m, t)?;
        if pi.len() != n {
            return Err(HmmError::invalid(format!(
                "π has length {} but N = {}",
                pi.len(),
                n
            )));
        }
        check_distribution("π", pi.view())?;

        Ok(Self {
            a: Array2::from_elem((n, n), 1.0 / n as f64),
            b: Array2::from_elem((n, m), 1.0 / m as f64),
            pi,
            seq_len: t,
            capacity: *capacity,
        })
    }

    /// Create an HMM from a full set of parameters, e.g. a previously trained model.
    ///
    /// Fails with [`HmmError::InvalidInput`] if any of:
    /// - Dimensions are invalid
    /// - Probability distributions are invalid
    pub fn new(a: Array2<f64>, b: Array2<f64>, pi: Array1<f64>, t: usize) -> Result<Self> {
        let mut hmm = Self::configure_with_capacity(
            b.nrows(),
            b.ncols(),
            t,
            pi,
            &Capacity::unbounded(),
        )?;
        hmm.set_a(a)?;
        hmm.set_b(b)?;
        Ok(hmm)
    }

    /// $N$, the number of states in this HMM
    pub fn n(&self) -> usize {
        self.b.nrows()
    }

    /// $M$, the number of possible observations that this model can emit
    pub fn m(&self) -> usize {
        self.b.ncols()
    }

    /// $T$, the length of every observation sequence this model accepts
    pub fn t(&self) -> usize {
        self.seq_len
    }

    pub fn a(&self) -> ArrayView2<'_, f64> {
        self.a.view()
    }

    pub fn b(&self) -> ArrayView2<'_, f64> {
        self.b.view()
    }

    pub fn pi(&self) -> ArrayView1<'_, f64> {
        self.pi.view()
    }

    /// Replace $A$. It must be $N × N$ and every row must be a distribution.
    pub fn set_a(&mut self, a: Array2<f64>) -> Result<()> {
        if a.dim() != (self.n(), self.n()) {
            return Err(HmmError::invalid(format!(
                "A must be {0} × {0}, got {1} × {2}",
                self.n(),
                a.nrows(),
                a.ncols()
            )));
        }
        check_rows("A", a.view())?;
        self.a = a;
        Ok(())
    }

    /// Replace $B$. It must be $N × M$ and every row must be a distribution.
    pub fn set_b(&mut self, b: Array2<f64>) -> Result<()> {
        if b.dim() != (self.n(), self.m()) {
            return Err(HmmError::invalid(format!(
                "B must be {} × {}, got {} × {}",
                self.n(),
                self.m(),
                b.nrows(),
                b.ncols()
            )));
        }
        check_rows("B", b.view())?;
        self.b = b;
        Ok(())
    }

    /// Change $T$. The new length is checked against the capacity the model was
    /// configured with.
    pub fn set_t(&mut self, t: usize) -> Result<()> {
        self.capacity.check(self.n(), self.m(), t)?;
        self.seq_len = t;
        Ok(())
    }

    pub fn set_pi(&mut self, pi: Array1<f64>) -> Result<()> {
        if pi.len() != self.n() {
            return Err(HmmError::invalid(format!(
                "π has length {} but N = {}",
                pi.len(),
                self.n()
            )));
        }
        check_distribution("π", pi.view())?;
        self.pi = pi;
        Ok(())
    }

    /// Overwrite $A$ and $B$ with independent U[0, 1) draws. Unless `normalize` is set,
    /// the rows are not distributions; the first Baum-Welch re-estimation fixes that.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, normalize: bool) {
        let (n, m) = (self.n(), self.m());
        self.a = Array2::from_shape_fn((n, n), |_| rng.gen::<f64>());
        self.b = Array2::from_shape_fn((n, m), |_| rng.gen::<f64>());
        if normalize {
            self.a.nip_rows();
            self.b.nip_rows();
        }
    }

    /// Check that `ys` has length $T$ and only contains symbols in $[0, M)$.
    pub fn validate_observations(&self, ys: &[usize]) -> Result<()> {
        if ys.len() != self.t() {
            return Err(HmmError::invalid(format!(
                "observation sequence has length {} but T = {}",
                ys.len(),
                self.t()
            )));
        }
        if let Some((t, &y)) = ys.iter().enumerate().find(|&(_, &y)| y >= self.m()) {
            return Err(HmmError::invalid(format!(
                "observation {} at t = {} is outside [0, {})",
                y,
                t,
                self.m()
            )));
        }
        Ok(())
    }

    /// A textual dump of $A$, $B$ and $π$, one row per line.
    pub fn dump_parameters(&self) -> String {
        self.to_string()
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            a: self.a.clone(),
            b: self.b.clone(),
            pi: self.pi.clone(),
        }
    }
}

impl fmt::Display for Hmm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_row(f: &mut fmt::Formatter<'_>, row: ArrayView1<f64>) -> fmt::Result {
            let cells: Vec<String> = row.iter().map(|p| p.to_string()).collect();
            writeln!(f, "{}", cells.join(" "))
        }

        writeln!(f, "A")?;
        for row in self.a.rows() {
            write_row(f, row)?;
        }
        writeln!(f, "B")?;
        for row in self.b.rows() {
            write_row(f, row)?;
        }
        writeln!(f, "π")?;
        write_row(f, self.pi.view())
    }
}

/// A structured copy of the parameters of an [`Hmm`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSnapshot {
    pub a: Array2<f64>,
    pub b: Array2<f64>,
    pub pi: Array1<f64>,
}

fn check_distribution(label: &str, p: ArrayView1<f64>) -> Result<()> {
    if let Some(bad) = p.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(HmmError::invalid(format!(
            "{} contains {}, which is not a probability",
            label, bad
        )));
    }
    let sum = p.sum();
    if (sum - 1.0).abs() > DISTRIBUTION_TOLERANCE {
        return Err(HmmError::invalid(format!(
            "{} sums to {}, expected 1",
            label, sum
        )));
    }
    Ok(())
}

fn check_rows(label: &str, table: ArrayView2<f64>) -> Result<()> {
    for (i, row) in table.rows().into_iter().enumerate() {
        check_distribution(&format!("row {} of {}", i, label), row)?;
    }
    Ok(())
}
