//! ColumnTransformer implementation.
//!
//! Applies different pipelines to different column subsets and concatenates results.

use crate::dataset::Frame;
use crate::error::{FareError, Result};
use crate::preprocessing::pipeline::{FittedPipeline, Pipeline};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use log::debug;
use ndarray::{concatenate, Array2, ArrayView2, Axis};

/// Specifies which columns a transformer should be applied to.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnSpec {
    /// Apply to the named columns, in this order.
    Names(Vec<String>),
    /// Apply to all columns.
    All,
}

impl ColumnSpec {
    /// Build a [`ColumnSpec::Names`] from anything string-like.
    pub fn names<S: AsRef<str>>(names: &[S]) -> Self {
        ColumnSpec::Names(names.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// Resolve the column spec to actual column names.
    fn resolve(&self, data: &Frame) -> Vec<String> {
        match self {
            ColumnSpec::Names(names) => names.clone(),
            ColumnSpec::All => data.column_names().to_vec(),
        }
    }
}

/// ColumnTransformer applies different pipelines to different columns.
///
/// Each named step selects its columns from the input frame, runs its own
/// pipeline, and contributes a block of output columns. Blocks are
/// concatenated horizontally in step order. Columns not referenced by any
/// step are dropped.
///
/// # Example
/// ```
/// use taxifare::preprocessing::{
///     ColumnSpec, ColumnTransformer, DistanceTransformer, Pipeline, StandardScaler,
///     TimeFeaturesEncoder, OneHotEncoder,
/// };
///
/// let ct = ColumnTransformer::new()
///     .add(
///         "distance",
///         Pipeline::new()
///             .add_distance(DistanceTransformer::new())
///             .add_standard_scaler(StandardScaler::new()),
///         ColumnSpec::names(&[
///             "pickup_latitude",
///             "pickup_longitude",
///             "dropoff_latitude",
///             "dropoff_longitude",
///         ]),
///     )
///     .add(
///         "time",
///         Pipeline::new()
///             .add_time_features(TimeFeaturesEncoder::new())
///             .add_one_hot_encoder(OneHotEncoder::new()),
///         ColumnSpec::names(&["pickup_datetime"]),
///     );
/// assert_eq!(ct.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ColumnTransformer {
    steps: Vec<(String, Pipeline, ColumnSpec)>,
}

impl ColumnTransformer {
    /// Create a new empty ColumnTransformer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named pipeline for the specified columns.
    pub fn add(mut self, name: impl Into<String>, pipeline: Pipeline, spec: ColumnSpec) -> Self {
        self.steps.push((name.into(), pipeline, spec));
        self
    }

    /// Get the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _, _)| name.as_str()).collect()
    }
}

impl Transformer for ColumnTransformer {
    type Input = Frame;
    type Output = Array2<f64>;
    type Fitted = FittedColumnTransformer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        if data.is_empty() {
            return Err(FareError::EmptyData(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }

        if self.steps.is_empty() {
            return Err(FareError::InvalidParameter(
                "Cannot fit empty ColumnTransformer".to_string(),
            ));
        }

        let mut fitted_steps = Vec::with_capacity(self.steps.len());
        let mut n_features_out = 0;

        for (name, pipeline, spec) in &self.steps {
            let columns = spec.resolve(data);
            let subset = data.select(&columns)?;
            let fitted = pipeline.fit(&subset)?;

            debug!(
                "fitted column step `{}` on {:?}: {} output features",
                name,
                columns,
                fitted.n_features_out()
            );

            n_features_out += fitted.n_features_out();
            fitted_steps.push(FittedColumnStep {
                name: name.clone(),
                columns,
                pipeline: fitted,
            });
        }

        Ok(FittedColumnTransformer {
            steps: fitted_steps,
            n_features_out,
        })
    }
}

/// One fitted step of a [`FittedColumnTransformer`].
#[derive(Clone, Debug)]
pub struct FittedColumnStep {
    name: String,
    columns: Vec<String>,
    pipeline: FittedPipeline,
}

impl FittedColumnStep {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input columns this step reads.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn pipeline(&self) -> &FittedPipeline {
        &self.pipeline
    }
}

/// Fitted ColumnTransformer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedColumnTransformer {
    steps: Vec<FittedColumnStep>,
    n_features_out: usize,
}

impl FittedColumnTransformer {
    /// Fitted steps in output order.
    pub fn steps(&self) -> &[FittedColumnStep] {
        &self.steps
    }

    /// Get step names with the columns each one reads.
    pub fn step_names(&self) -> Vec<(&str, &[String])> {
        self.steps
            .iter()
            .map(|s| (s.name.as_str(), s.columns.as_slice()))
            .collect()
    }

    /// Output feature names, each prefixed with its step: `step__feature`.
    pub fn get_feature_names_out(&self) -> Vec<String> {
        self.steps
            .iter()
            .flat_map(|s| {
                s.pipeline
                    .feature_names_out(&s.columns)
                    .into_iter()
                    .map(move |f| format!("{}__{}", s.name, f))
            })
            .collect()
    }
}

impl FittedTransformer for FittedColumnTransformer {
    type Input = Frame;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        // Referenced columns must all be present, even for an empty frame.
        let subsets = self
            .steps
            .iter()
            .map(|step| data.select(&step.columns))
            .collect::<Result<Vec<_>>>()?;

        if data.n_rows() == 0 {
            return Ok(Array2::zeros((0, self.n_features_out)));
        }

        let mut blocks = Vec::with_capacity(self.steps.len());
        for (step, subset) in self.steps.iter().zip(&subsets) {
            let block = step.pipeline.transform(subset)?;
            if block.ncols() != step.pipeline.n_features_out() {
                return Err(FareError::DimensionMismatch {
                    expected: step.pipeline.n_features_out(),
                    got: block.ncols(),
                    missing: None,
                });
            }
            blocks.push(block);
        }

        let views: Vec<ArrayView2<f64>> = blocks.iter().map(|b| b.view()).collect();
        concatenate(Axis(1), &views).map_err(|e| {
            FareError::InvalidParameter(format!("Cannot concatenate step outputs: {}", e))
        })
    }

    fn n_features_in(&self) -> usize {
        self.steps.iter().map(|s| s.columns.len()).sum()
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    fn feature_names_out(&self, _input_names: &[String]) -> Vec<String> {
        self.get_feature_names_out()
    }
}
