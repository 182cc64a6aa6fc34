//! Predictive pipeline combining preprocessing and model inference.
//!
//! This module provides a unified wrapper for a complete fare model that
//! combines the column transformer with a linear regression.

use crate::dataset::Frame;
use crate::error::{FareError, Result};
use crate::model::{Fitted, InferenceModel, LinearModel, LinearRegression};
use crate::preprocessing::{
    ColumnTransformer, FittedColumnTransformer, FittedTransformer, Transformer,
};
use log::debug;
use ndarray::{Array1, Array2};

/// Unfitted preprocessing plus model, ready to be trained.
#[derive(Clone, Debug)]
pub struct FarePipeline {
    preprocessor: ColumnTransformer,
    model: LinearRegression,
}

impl FarePipeline {
    pub fn new(preprocessor: ColumnTransformer, model: LinearRegression) -> Self {
        Self {
            preprocessor,
            model,
        }
    }

    pub fn preprocessor(&self) -> &ColumnTransformer {
        &self.preprocessor
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    /// Fit the preprocessor on `x`, transform it, then fit the model on the
    /// resulting feature matrix.
    pub fn fit(&self, x: &Frame, y: &[f64]) -> Result<FittedFarePipeline> {
        if y.len() != x.n_rows() {
            return Err(FareError::DimensionMismatch {
                expected: x.n_rows(),
                got: y.len(),
                missing: None,
            });
        }

        let preprocessor = self.preprocessor.fit(x)?;
        let features = preprocessor.transform(x)?;
        debug!(
            "preprocessed {} rows into {} features",
            features.nrows(),
            features.ncols()
        );

        let model = self.model.fit(&features, &Array1::from(y.to_vec()))?;

        Ok(FittedFarePipeline {
            preprocessor,
            model,
        })
    }
}

/// A trained fare model: fitted preprocessing plus fitted regression.
///
/// Created by a single fit and read-only afterwards.
#[derive(Clone, Debug)]
pub struct FittedFarePipeline {
    /// Fitted column transformer for preprocessing.
    preprocessor: FittedColumnTransformer,
    /// Trained model for inference.
    model: LinearModel<Fitted>,
}

impl FittedFarePipeline {
    pub fn preprocessor(&self) -> &FittedColumnTransformer {
        &self.preprocessor
    }

    pub fn model(&self) -> &LinearModel<Fitted> {
        &self.model
    }

    /// Number of engineered features the model consumes.
    pub fn n_features(&self) -> usize {
        self.preprocessor.n_features_out()
    }

    /// Names of the engineered features, in model column order.
    pub fn feature_names(&self) -> Vec<String> {
        self.preprocessor.get_feature_names_out()
    }

    /// Transform raw rows into the feature matrix.
    pub fn preprocess(&self, x: &Frame) -> Result<Array2<f64>> {
        self.preprocessor.transform(x)
    }

    /// Make predictions on new rows.
    pub fn predict(&self, x: &Frame) -> Result<Array1<f64>> {
        let processed = self.preprocess(x)?;
        self.model.predict_batch(&processed)
    }
}
