//! One-hot encoding for categorical features.
//!
//! Transforms categorical integer values to one-hot (dummy) encoded vectors.

use crate::error::{FareError, Result};
use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use std::collections::BTreeSet;

/// One-hot encoder for categorical features.
///
/// Converts integer categories to one-hot encoded vectors. Each input column
/// is treated as a categorical feature, and the encoder learns the unique
/// values (categories) present in each column during fitting.
///
/// # Example
/// ```
/// use ndarray::array;
/// use taxifare::preprocessing::{FittedTransformer, HandleUnknown, OneHotEncoder, Transformer};
///
/// // Categories seen at fit: 0, 1, 2
/// let train = array![[0.0], [1.0], [2.0]];
/// let encoder = OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore);
/// let fitted = encoder.fit(&train).unwrap();
///
/// // Unknown category 5 encodes as all zeros
/// let encoded = fitted.transform(&array![[1.0], [5.0]]).unwrap();
/// assert_eq!(encoded, array![[0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OneHotEncoder {
    /// How to handle unknown categories during transform.
    handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    pub fn handle_unknown(&self) -> HandleUnknown {
        self.handle_unknown
    }
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedOneHotEncoder {
    /// Categories (unique sorted values) for each input column.
    categories: Vec<Vec<i64>>,
    /// Total number of output features.
    n_features_out: usize,
    /// Handle unknown strategy.
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Get the categories learned for each feature.
    pub fn categories(&self) -> &[Vec<i64>] {
        &self.categories
    }
}

fn as_category(val: f64, row: usize, col: usize) -> Result<i64> {
    if !val.is_finite() || val < 0.0 || val.fract() != 0.0 {
        return Err(FareError::InvalidParameter(format!(
            "OneHotEncoder expects non-negative integer values, got {} at ({}, {})",
            val, row, col
        )));
    }
    Ok(val as i64)
}

impl Transformer for OneHotEncoder {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        let (rows, _) = data.dim();

        if rows == 0 {
            return Err(FareError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let mut categories = Vec::with_capacity(data.ncols());
        for (col, values) in data.columns().into_iter().enumerate() {
            let mut seen = BTreeSet::new();
            for (row, &val) in values.iter().enumerate() {
                seen.insert(as_category(val, row, col)?);
            }
            categories.push(seen.into_iter().collect::<Vec<_>>());
        }

        let n_features_out = categories.iter().map(Vec::len).sum();

        Ok(FittedOneHotEncoder {
            categories,
            n_features_out,
            handle_unknown: self.handle_unknown,
        })
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = Array2<f64>;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let (rows, cols) = data.dim();

        if cols != self.categories.len() {
            return Err(FareError::DimensionMismatch {
                expected: self.categories.len(),
                got: cols,
                missing: None,
            });
        }

        let mut result = Array2::<f64>::zeros((rows, self.n_features_out));

        for (row, values) in data.rows().into_iter().enumerate() {
            let mut offset = 0;
            for (col, &val) in values.iter().enumerate() {
                let cats = &self.categories[col];
                let found = match as_category(val, row, col) {
                    Ok(cat) => cats.binary_search(&cat).ok(),
                    Err(e) if self.handle_unknown == HandleUnknown::Error => return Err(e),
                    Err(_) => None,
                };

                match found {
                    Some(idx) => result[[row, offset + idx]] = 1.0,
                    None if self.handle_unknown == HandleUnknown::Error => {
                        return Err(FareError::InvalidParameter(format!(
                            "Unknown category {} in column {}",
                            val, col
                        )));
                    }
                    // With Ignore, leave as zeros
                    None => {}
                }

                offset += cats.len();
            }
        }

        Ok(result)
    }

    fn n_features_in(&self) -> usize {
        self.categories.len()
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    /// Names are `<input>_<category>`, e.g. `hour_17`.
    fn feature_names_out(&self, input_names: &[String]) -> Vec<String> {
        self.categories
            .iter()
            .enumerate()
            .flat_map(|(col, cats)| {
                let base = input_names
                    .get(col)
                    .cloned()
                    .unwrap_or_else(|| format!("x{}", col));
                cats.iter().map(move |c| format!("{}_{}", base, c))
            })
            .collect()
    }
}
