use ndarray::prelude::*;
use ndarray::*;
use num_traits::Float;

/// `true` when `a` and `b` differ by less than `tolerance` relative to the larger
/// magnitude, or when both are exactly zero.
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    let d = a.abs().max(b.abs());
    d == 0.0 || (a - b).abs() / d < tolerance
}

pub fn uniform(n: usize) -> Array1<f64> {
    Array1::from_elem(n, 1.0 / (n as f64))
}

pub trait ArrayFloat<T: Float> {
    /// Entrywise [`approx_eq`]. Arrays of different shapes are never close.
    fn all_close(&self, rhs: &Self, tolerance: T) -> bool;
}

pub trait Array1Float<T: Float> {
    /// Along a 1D array, return the maximum float value and its index
    ///
    /// Among equal maxima the lowest index wins. The behavior of this function is
    /// unspecified if the array contains NaNs.
    fn maxf(&self) -> Option<(usize, T)>;
}

pub trait Array2FloatMut {
    /// Divide every row with a positive sum by that sum. Rows summing to zero are
    /// left alone.
    fn nip_rows(&mut self);
}

impl<D, S> ArrayFloat<f64> for ArrayBase<S, D>
where
    D: Dimension,
    S: Data<Elem = f64>,
{
    fn all_close(&self, rhs: &Self, tolerance: f64) -> bool {
        self.shape() == rhs.shape()
            && self
                .iter()
                .zip(rhs.iter())
                .all(|(&x, &y)| approx_eq(x, y, tolerance))
    }
}

impl<T, S> Array1Float<T> for ArrayBase<S, Ix1>
where
    T: Float,
    S: Data<Elem = T>,
{
    fn maxf(&self) -> Option<(usize, T)> {
        self.iter()
            .enumerate()
            .reduce(|(i0, v0), (i1, v1)| if v0 >= v1 { (i0, v0) } else { (i1, v1) })
            .map(|(i, &v)| (i, v))
    }
}

impl<S> Array2FloatMut for ArrayBase<S, Ix2>
where
    S: DataMut<Elem = f64>,
{
    fn nip_rows(&mut self) {
        for mut row in self.rows_mut() {
            let sum = row.sum();
            if sum > 0.0 {
                row /= sum;
            }
        }
    }
}
