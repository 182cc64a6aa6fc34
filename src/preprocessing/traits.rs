//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; has hyperparameters and can learn from data.
//! - [`FittedTransformer`]: After fitting; ready for inference.

use crate::error::Result;

/// Trait for unfitted transformers with hyperparameters.
///
/// A transformer learns parameters from training data and can then transform
/// new data using those learned parameters. This trait represents the
/// configurable, unfitted state.
///
/// # Type Parameters
/// - `Input`: Input data type (a [`Frame`](crate::dataset::Frame) or an `Array2<f64>`).
/// - `Output`: Output data type (always a feature matrix here).
/// - `Fitted`: The corresponding fitted transformer type.
///
/// # Example
/// ```
/// use ndarray::array;
/// use taxifare::preprocessing::{FittedTransformer, StandardScaler, Transformer};
///
/// let data = array![[1.0], [3.0]];
/// let fitted = StandardScaler::new().fit(&data).unwrap();
/// let scaled = fitted.transform(&data).unwrap();
/// assert_eq!(scaled[[0, 0]], -1.0);
/// ```
pub trait Transformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`FareError`](crate::error::FareError) if:
    /// - Data is empty
    /// - A required column is missing or has the wrong type
    /// - Shape is incompatible with the transformer
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fit the transformer and transform the data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// After fitting, a transformer owns its learned parameters (e.g. `mean` and
/// `std` for a scaler) and applies them unchanged to any later input.
pub trait FittedTransformer: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`FareError`](crate::error::FareError) if:
    /// - Input shape doesn't match the number of features seen at fit
    /// - Input contains values that cannot be parsed
    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Returns the number of columns produced by [`transform`](Self::transform).
    fn n_features_out(&self) -> usize;

    /// Output column names, given the names of the input columns.
    fn feature_names_out(&self, input_names: &[String]) -> Vec<String>;
}

/// Marker trait for transformers that don't require fitting.
///
/// Stateless transformers (like the distance transformer) can transform data
/// without learning any parameters. They implement both `Transformer` and
/// this trait.
pub trait StatelessTransformer: Transformer {
    /// Transform data without fitting.
    ///
    /// For stateless transformers, this is equivalent to `fit_transform`
    /// but communicates that no learning occurs.
    fn transform_direct(&self, data: &Self::Input) -> Result<Self::Output>;
}
