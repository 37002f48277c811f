use crate::model::Hmm;
use lazy_static::lazy_static;
use ndarray::array;

lazy_static! {
    /// The 2-state, 2-symbol textbook example, sized for sequences of length 3.
    pub static ref HMM_WEATHER: Hmm = {
        Hmm::new(
            array![[0.7, 0.3], [0.4, 0.6]],
            array![[0.9, 0.1], [0.2, 0.8]],
            array![0.5, 0.5],
            3,
        )
        .unwrap()
    };
}

/// Always emits `1, 0, 1, 0, ...`
pub fn periodic(t: usize) -> Hmm {
    Hmm::new(
        array![[0.0, 1.0], [1.0, 0.0]],
        array![[0.0, 1.0], [1.0, 0.0]],
        array![1.0, 0.0],
        t,
    )
    .unwrap()
}

/// A hand-calculated table of paths where each path is equally likely.
///
/// 1 time step (state + observation)
/// 0/0
/// 2/1
///
/// 2 time steps (states + observations)
/// 0/0, 0/0
/// 0/0, 0/0
/// 0/0, 1/0
/// 0/0, 1/1
/// 0/0, 2/1
/// 0/0, 2/1
/// 0/0, 2/1
/// 0/0, 2/1
/// 2/1, 0/0
/// 2/1, 0/0
/// 2/1, 1/0
/// 2/1, 1/0
/// 2/1, 1/1
/// 2/1, 1/1
/// 2/1, 2/1
/// 2/1, 2/1
pub fn fancy(t: usize) -> Hmm {
    Hmm::new(
        array![[0.25, 0.25, 0.5], [0.5, 0.25, 0.25], [0.25, 0.5, 0.25]],
        array![[1.0, 0.0], [0.5, 0.5], [0.0, 1.0]],
        array![0.5, 0.0, 0.5],
        t,
    )
    .unwrap()
}
