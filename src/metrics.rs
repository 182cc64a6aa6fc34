//! Regression metrics.
//!
//! Every function takes predictions first and ground truth second, requires
//! both to have the same non-zero length, and reports the error otherwise.

use crate::error::{FareError, Result};
use serde::{Deserialize, Serialize};

fn check(y_pred: &[f64], y_true: &[f64]) -> Result<()> {
    if y_pred.len() != y_true.len() {
        return Err(FareError::DimensionMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
            missing: None,
        });
    }
    if y_true.is_empty() {
        return Err(FareError::EmptyData(
            "Cannot compute a metric over zero samples".to_string(),
        ));
    }
    Ok(())
}

/// Mean Squared Error.
///
/// MSE = mean((y_pred - y_true)^2)
pub fn mse(y_pred: &[f64], y_true: &[f64]) -> Result<f64> {
    check(y_pred, y_true)?;
    let sum_sq: f64 = y_pred
        .iter()
        .zip(y_true)
        .map(|(&p, &t)| (p - t).powi(2))
        .sum();
    Ok(sum_sq / y_true.len() as f64)
}

/// Root Mean Squared Error, in the same units as the target.
///
/// RMSE = sqrt(MSE)
///
/// # Example
/// ```
/// use taxifare::metrics::rmse;
///
/// assert_eq!(rmse(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.0);
/// assert_eq!(rmse(&[0.0, 0.0], &[3.0, -3.0]).unwrap(), 3.0);
/// ```
pub fn rmse(y_pred: &[f64], y_true: &[f64]) -> Result<f64> {
    Ok(mse(y_pred, y_true)?.sqrt())
}

/// Mean Absolute Error.
///
/// MAE = mean(|y_pred - y_true|)
pub fn mae(y_pred: &[f64], y_true: &[f64]) -> Result<f64> {
    check(y_pred, y_true)?;
    let sum_abs: f64 = y_pred
        .iter()
        .zip(y_true)
        .map(|(&p, &t)| (p - t).abs())
        .sum();
    Ok(sum_abs / y_true.len() as f64)
}

/// Coefficient of determination.
///
/// R² = 1 - SS_res / SS_tot. A constant target scores 1.0 when predicted
/// exactly and 0.0 otherwise.
pub fn r_squared(y_pred: &[f64], y_true: &[f64]) -> Result<f64> {
    check(y_pred, y_true)?;
    let mean_true = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_pred
        .iter()
        .zip(y_true)
        .map(|(&p, &t)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// All regression metrics for one set of predictions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mse: f64,
    pub mae: f64,
    pub r_squared: f64,
    pub n_samples: usize,
}

impl RegressionMetrics {
    pub fn compute(y_pred: &[f64], y_true: &[f64]) -> Result<Self> {
        let mse = mse(y_pred, y_true)?;
        Ok(Self {
            rmse: mse.sqrt(),
            mse,
            mae: mae(y_pred, y_true)?,
            r_squared: r_squared(y_pred, y_true)?,
            n_samples: y_true.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rmse_identical_is_zero() {
        let y = [4.5, 16.9, 5.7, 7.7];
        assert_eq!(rmse(&y, &y).unwrap(), 0.0);
    }

    #[test]
    fn test_rmse_known_value() {
        // errors 1, -2, 2 -> mse 3
        let value = rmse(&[2.0, 0.0, 5.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(value, 3.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_rmse_length_mismatch() {
        let result = rmse(&[1.0, 2.0], &[1.0]);
        assert!(matches!(
            result,
            Err(FareError::DimensionMismatch {
                expected: 1,
                got: 2,
                missing: None
            })
        ));
    }

    #[test]
    fn test_rmse_empty() {
        assert!(matches!(rmse(&[], &[]), Err(FareError::EmptyData(_))));
    }

    #[test]
    fn test_mae() {
        assert_relative_eq!(mae(&[2.0, 0.0], &[1.0, 3.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_r_squared() {
        let y = [1.0, 2.0, 3.0];
        assert_relative_eq!(r_squared(&y, &y).unwrap(), 1.0);
        assert_relative_eq!(r_squared(&[2.0, 2.0, 2.0], &y).unwrap(), 0.0);
        assert_eq!(r_squared(&[1.0, 1.0], &[1.0, 1.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_regression_metrics_compute() {
        let metrics = RegressionMetrics::compute(&[2.0, 0.0, 5.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(metrics.mse, 3.0);
        assert_relative_eq!(metrics.rmse, 3.0f64.sqrt());
        assert_relative_eq!(metrics.mae, 5.0 / 3.0);
        assert_eq!(metrics.n_samples, 3);
    }
}
