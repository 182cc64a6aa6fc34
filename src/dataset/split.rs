//! Seeded train/test partitioning.

use crate::dataset::frame::Frame;
use crate::error::{FareError, Result};
use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Both halves of a held-out split.
#[derive(Clone, Debug)]
pub struct TrainTestSplit {
    pub x_train: Frame,
    pub x_test: Frame,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
}

/// Shuffle rows with a seeded generator and hold out `ceil(n * test_size)`
/// of them for evaluation.
///
/// The partition is disjoint and covers every row. The same seed always
/// produces the same split.
///
/// # Errors
/// - [`FareError::DimensionMismatch`] if `y` does not have one label per row.
/// - [`FareError::InvalidParameter`] if `test_size` is outside `(0, 1)` or
///   either side would be empty.
pub fn train_test_split(
    x: &Frame,
    y: &[f64],
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    let n = x.n_rows();
    if y.len() != n {
        return Err(FareError::DimensionMismatch {
            expected: n,
            got: y.len(),
            missing: None,
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(FareError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(FareError::InvalidParameter(format!(
            "cannot split {} rows with test_size {}",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_idx, train_idx) = indices.split_at(n_test);

    info!("split {} rows into {} train / {} test", n, train_idx.len(), n_test);

    Ok(TrainTestSplit {
        x_train: x.take(train_idx),
        x_test: x.take(test_idx),
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}
