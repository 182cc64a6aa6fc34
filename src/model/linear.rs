//! Ordinary least squares linear regression.

use crate::error::{FareError, Result};
use crate::model::{Fitted, InferenceModel, Unfitted};
use log::debug;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Learned coefficients of a linear model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// Linear model `y = X·w + b`, parametrized by training state.
#[derive(Clone, Debug)]
pub struct LinearModel<S> {
    params: LinearParams,
    fit_intercept: bool,
    _state: PhantomData<S>,
}

impl LinearModel<Fitted> {
    /// Create a new fitted linear model from params.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            fit_intercept: true,
            _state: PhantomData,
        }
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.params.weights
    }

    pub fn bias(&self) -> f64 {
        self.params.bias
    }

    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    fn check_features(&self, got: usize) -> Result<()> {
        if got != self.n_features() {
            return Err(FareError::DimensionMismatch {
                expected: self.n_features(),
                got,
                missing: None,
            });
        }
        Ok(())
    }
}

impl InferenceModel for LinearModel<Fitted> {
    type InputSingle = Array1<f64>;
    type InputBatch = Array2<f64>;
    type OutputSingle = f64;
    type OutputBatch = Array1<f64>;

    /// Predict on a single sample (feature vector).
    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle> {
        self.check_features(input.len())?;
        Ok(self.params.weights.dot(input) + self.params.bias)
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch> {
        self.check_features(input.ncols())?;
        Ok(input.dot(&self.params.weights) + self.params.bias)
    }
}

pub type LinearRegression = LinearModel<Unfitted>;

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            params: LinearParams {
                weights: Array1::zeros(0),
                bias: 0.0,
            },
            fit_intercept: true,
            _state: PhantomData,
        }
    }

    /// Whether to learn a bias term. When false the bias is fixed at zero.
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    /// Least-squares fit.
    ///
    /// Features and targets are centered (when fitting an intercept) and the
    /// minimum-norm solution of the centered system is taken from an SVD
    /// pseudo-inverse. Rank-deficient designs, such as one-hot blocks that sum
    /// to a constant, therefore still yield a unique, deterministic answer.
    ///
    /// # Errors
    /// - [`FareError::EmptyData`] if `x` has no rows.
    /// - [`FareError::DimensionMismatch`] if `y` has a different length.
    /// - [`FareError::Numerical`] if inputs or the solution are not finite.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<LinearModel<Fitted>> {
        let (rows, cols) = x.dim();

        if rows == 0 {
            return Err(FareError::EmptyData(
                "Cannot fit LinearRegression on empty data".to_string(),
            ));
        }
        if y.len() != rows {
            return Err(FareError::DimensionMismatch {
                expected: rows,
                got: y.len(),
                missing: None,
            });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(FareError::Numerical(
                "LinearRegression inputs contain NaN or infinite values".to_string(),
            ));
        }

        let (x_mean, y_mean) = if self.fit_intercept {
            (
                x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(cols)),
                y.mean().unwrap_or(0.0),
            )
        } else {
            (Array1::zeros(cols), 0.0)
        };

        let weights = if cols == 0 {
            Array1::zeros(0)
        } else {
            let xc = x - &x_mean;
            let yc = y - y_mean;
            solve_min_norm(&xc, yc.view())?
        };

        let bias = if self.fit_intercept {
            y_mean - x_mean.dot(&weights)
        } else {
            0.0
        };

        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(FareError::Numerical(
                "Least-squares solution is not finite".to_string(),
            ));
        }

        debug!(
            "fitted linear regression on {}x{} design, bias = {}",
            rows, cols, bias
        );

        Ok(LinearModel {
            params: LinearParams { weights, bias },
            fit_intercept: self.fit_intercept,
            _state: PhantomData,
        })
    }
}

/// Minimum-norm least-squares solution of `a·w = b`.
fn solve_min_norm(a: &Array2<f64>, b: ArrayView1<f64>) -> Result<Array1<f64>> {
    let (rows, cols) = a.dim();
    let a = DMatrix::from_fn(rows, cols, |i, j| a[[i, j]]);
    let b = DVector::from_fn(rows, |i, _| b[i]);

    let svd = a.svd(true, true);
    let max_sv = svd.singular_values.max();
    // Singular values below this are treated as zero.
    let eps = f64::EPSILON * rows.max(cols) as f64 * max_sv;

    let w = svd
        .solve(&b, eps)
        .map_err(|e| FareError::Numerical(e.to_string()))?;
    Ok(w.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_fit_with_bias() {
        // y = 2 * x + 1
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![1.0, 3.0, 5.0];

        let fitted = LinearRegression::new().fit(&x, &y).unwrap();

        assert_relative_eq!(fitted.weights()[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(fitted.bias(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(fitted.predict(&array![3.0]).unwrap(), 7.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fit_two_features() {
        // y = 1.5 * a - 0.5 * b + 4
        let x = array![[1.0, 0.0], [0.0, 1.0], [2.0, 3.0], [4.0, 1.0], [3.0, 5.0]];
        let y = x.column(0).mapv(|a| 1.5 * a) - x.column(1).mapv(|b| 0.5 * b) + 4.0;

        let fitted = LinearRegression::new().fit(&x, &y).unwrap();
        let preds = fitted.predict_batch(&x).unwrap();

        assert_relative_eq!(fitted.weights()[0], 1.5, epsilon = 1e-9);
        assert_relative_eq!(fitted.weights()[1], -0.5, epsilon = 1e-9);
        for (p, t) in preds.iter().zip(y.iter()) {
            assert_relative_eq!(*p, *t, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fit_collinear_columns() {
        // Duplicated column: min-norm solution splits the weight evenly.
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        let y = array![2.0, 4.0, 6.0];

        let fitted = LinearRegression::new().fit(&x, &y).unwrap();

        assert_relative_eq!(fitted.weights()[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(fitted.weights()[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(fitted.bias(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_more_features_than_rows() {
        let x = array![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 0.0]];
        let y = array![10.0, 20.0];

        let fitted = LinearRegression::new().fit(&x, &y).unwrap();
        let preds = fitted.predict_batch(&x).unwrap();

        assert_relative_eq!(preds[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(preds[1], 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_single_row() {
        let fitted = LinearRegression::new()
            .fit(&array![[3.0, 1.0]], &array![9.5])
            .unwrap();
        assert_eq!(fitted.weights(), &array![0.0, 0.0]);
        assert_eq!(fitted.bias(), 9.5);
    }

    #[test]
    fn test_fit_without_intercept() {
        let x = array![[1.0], [2.0], [4.0]];
        let y = array![3.0, 6.0, 12.0];

        let fitted = LinearRegression::new()
            .with_fit_intercept(false)
            .fit(&x, &y)
            .unwrap();

        assert_relative_eq!(fitted.weights()[0], 3.0, epsilon = 1e-10);
        assert_eq!(fitted.bias(), 0.0);
    }

    #[test]
    fn test_fit_deterministic() {
        let x = array![[1.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.5, 0.2, 0.9]];
        let y = array![3.0, 1.0, 2.0, 7.0];
        let a = LinearRegression::new().fit(&x, &y).unwrap();
        let b = LinearRegression::new().fit(&x, &y).unwrap();
        assert_eq!(a.params(), b.params());
    }

    #[test]
    fn test_fit_errors() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(matches!(
            LinearRegression::new().fit(&empty, &Array1::zeros(0)),
            Err(FareError::EmptyData(_))
        ));

        assert!(matches!(
            LinearRegression::new().fit(&array![[1.0], [2.0]], &array![1.0]),
            Err(FareError::DimensionMismatch {
                expected: 2,
                got: 1,
                missing: None
            })
        ));

        assert!(matches!(
            LinearRegression::new().fit(&array![[f64::NAN], [2.0]], &array![1.0, 2.0]),
            Err(FareError::Numerical(_))
        ));
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let model = LinearModel::<Fitted>::new(LinearParams {
            weights: array![1.0, 2.0],
            bias: 0.5,
        });
        assert_relative_eq!(model.predict(&array![1.0, 1.0]).unwrap(), 3.5);
        assert!(matches!(
            model.predict_batch(&array![[1.0, 2.0, 3.0]]),
            Err(FareError::DimensionMismatch {
                expected: 2,
                got: 3,
                missing: None
            })
        ));
    }
}
