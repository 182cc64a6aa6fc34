//! Pipeline for chaining transformers.
//!
//! A Pipeline chains multiple transformers together, where the output of one
//! transformer becomes the input to the next. The input is always a
//! [`Frame`]; steps that read named columns must come first, and everything
//! after the first matrix-producing step works on `Array2<f64>`.
//!
//! # Example
//! ```
//! use taxifare::preprocessing::{
//!     DistanceTransformer, FittedTransformer, Pipeline, StandardScaler, Transformer,
//! };
//! # use taxifare::dataset::{Column, Frame};
//! # let frame = Frame::new()
//! #     .with_column("pickup_latitude", Column::Numeric(vec![40.7, 40.8])).unwrap()
//! #     .with_column("pickup_longitude", Column::Numeric(vec![-73.9, -73.9])).unwrap()
//! #     .with_column("dropoff_latitude", Column::Numeric(vec![40.8, 40.7])).unwrap()
//! #     .with_column("dropoff_longitude", Column::Numeric(vec![-73.8, -74.0])).unwrap();
//!
//! let pipeline = Pipeline::new()
//!     .add_distance(DistanceTransformer::new())
//!     .add_standard_scaler(StandardScaler::new());
//!
//! let fitted = pipeline.fit(&frame).unwrap();
//! let scaled = fitted.transform(&frame).unwrap();
//! assert_eq!(scaled.dim(), (2, 1));
//! ```

use crate::dataset::Frame;
use crate::error::{FareError, Result};
use crate::preprocessing::distance::DistanceTransformer;
use crate::preprocessing::encoding::{FittedOneHotEncoder, OneHotEncoder};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler};
use crate::preprocessing::time_features::TimeFeaturesEncoder;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;

/// Data travelling between pipeline steps.
enum Flow<'a> {
    Table(&'a Frame),
    Matrix(Array2<f64>),
}

impl<'a> Flow<'a> {
    fn table(&self, step: &str) -> Result<&'a Frame> {
        match self {
            Flow::Table(frame) => Ok(*frame),
            Flow::Matrix(_) => Err(FareError::InvalidParameter(format!(
                "{} reads named columns and cannot follow a matrix-producing step",
                step
            ))),
        }
    }

    fn matrix(&self, step: &str) -> Result<&Array2<f64>> {
        match self {
            Flow::Matrix(m) => Ok(m),
            Flow::Table(_) => Err(FareError::InvalidParameter(format!(
                "{} needs a numeric matrix; put a column-reading step before it",
                step
            ))),
        }
    }
}

/// A step in the unfitted pipeline.
#[derive(Clone, Debug)]
pub enum PipelineStep {
    Distance(DistanceTransformer),
    TimeFeatures(TimeFeaturesEncoder),
    StandardScaler(StandardScaler),
    OneHotEncoder(OneHotEncoder),
}

impl PipelineStep {
    /// Get the step name for debugging.
    pub fn step_name(&self) -> &'static str {
        match self {
            PipelineStep::Distance(_) => "DistanceTransformer",
            PipelineStep::TimeFeatures(_) => "TimeFeaturesEncoder",
            PipelineStep::StandardScaler(_) => "StandardScaler",
            PipelineStep::OneHotEncoder(_) => "OneHotEncoder",
        }
    }

    fn fit(&self, data: &Flow<'_>) -> Result<FittedPipelineStep> {
        let name = self.step_name();
        match self {
            PipelineStep::Distance(t) => t.fit(data.table(name)?).map(FittedPipelineStep::Distance),
            PipelineStep::TimeFeatures(t) => t
                .fit(data.table(name)?)
                .map(FittedPipelineStep::TimeFeatures),
            PipelineStep::StandardScaler(t) => t
                .fit(data.matrix(name)?)
                .map(FittedPipelineStep::StandardScaler),
            PipelineStep::OneHotEncoder(t) => t
                .fit(data.matrix(name)?)
                .map(FittedPipelineStep::OneHotEncoder),
        }
    }
}

impl From<DistanceTransformer> for PipelineStep {
    fn from(t: DistanceTransformer) -> Self {
        PipelineStep::Distance(t)
    }
}

impl From<TimeFeaturesEncoder> for PipelineStep {
    fn from(t: TimeFeaturesEncoder) -> Self {
        PipelineStep::TimeFeatures(t)
    }
}

impl From<StandardScaler> for PipelineStep {
    fn from(t: StandardScaler) -> Self {
        PipelineStep::StandardScaler(t)
    }
}

impl From<OneHotEncoder> for PipelineStep {
    fn from(t: OneHotEncoder) -> Self {
        PipelineStep::OneHotEncoder(t)
    }
}

/// A fitted pipeline step, owning its learned parameters.
#[derive(Clone, Debug)]
pub enum FittedPipelineStep {
    Distance(DistanceTransformer),
    TimeFeatures(TimeFeaturesEncoder),
    StandardScaler(FittedStandardScaler),
    OneHotEncoder(FittedOneHotEncoder),
}

impl FittedPipelineStep {
    /// Get the step name for debugging.
    pub fn step_name(&self) -> &'static str {
        match self {
            FittedPipelineStep::Distance(_) => "DistanceTransformer",
            FittedPipelineStep::TimeFeatures(_) => "TimeFeaturesEncoder",
            FittedPipelineStep::StandardScaler(_) => "StandardScaler",
            FittedPipelineStep::OneHotEncoder(_) => "OneHotEncoder",
        }
    }

    fn transform_step(&self, data: &Flow<'_>) -> Result<Array2<f64>> {
        let name = self.step_name();
        match self {
            FittedPipelineStep::Distance(t) => t.transform(data.table(name)?),
            FittedPipelineStep::TimeFeatures(t) => t.transform(data.table(name)?),
            FittedPipelineStep::StandardScaler(t) => t.transform(data.matrix(name)?),
            FittedPipelineStep::OneHotEncoder(t) => t.transform(data.matrix(name)?),
        }
    }

    fn n_features_out(&self) -> usize {
        match self {
            FittedPipelineStep::Distance(t) => t.n_features_out(),
            FittedPipelineStep::TimeFeatures(t) => t.n_features_out(),
            FittedPipelineStep::StandardScaler(t) => t.n_features_out(),
            FittedPipelineStep::OneHotEncoder(t) => t.n_features_out(),
        }
    }

    fn feature_names_out(&self, input_names: &[String]) -> Vec<String> {
        match self {
            FittedPipelineStep::Distance(t) => t.feature_names_out(input_names),
            FittedPipelineStep::TimeFeatures(t) => t.feature_names_out(input_names),
            FittedPipelineStep::StandardScaler(t) => t.feature_names_out(input_names),
            FittedPipelineStep::OneHotEncoder(t) => t.feature_names_out(input_names),
        }
    }
}

/// Pipeline transformer (unfitted).
///
/// Chains multiple transformers together.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any step.
    pub fn add(mut self, step: impl Into<PipelineStep>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Add a DistanceTransformer to the pipeline.
    pub fn add_distance(self, transformer: DistanceTransformer) -> Self {
        self.add(transformer)
    }

    /// Add a TimeFeaturesEncoder to the pipeline.
    pub fn add_time_features(self, encoder: TimeFeaturesEncoder) -> Self {
        self.add(encoder)
    }

    /// Add a StandardScaler to the pipeline.
    pub fn add_standard_scaler(self, scaler: StandardScaler) -> Self {
        self.add(scaler)
    }

    /// Add a OneHotEncoder to the pipeline.
    pub fn add_one_hot_encoder(self, encoder: OneHotEncoder) -> Self {
        self.add(encoder)
    }

    /// Get the number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }
}

impl Transformer for Pipeline {
    type Input = Frame;
    type Output = Array2<f64>;
    type Fitted = FittedPipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        if self.steps.is_empty() {
            return Err(FareError::InvalidParameter(
                "Cannot fit an empty pipeline".to_string(),
            ));
        }

        if data.is_empty() {
            return Err(FareError::EmptyData(
                "Cannot fit pipeline on empty data".to_string(),
            ));
        }

        let mut fitted_steps = Vec::with_capacity(self.steps.len());
        let mut current = Flow::Table(data);

        for step in &self.steps {
            let fitted = step.fit(&current)?;
            current = Flow::Matrix(fitted.transform_step(&current)?);
            fitted_steps.push(fitted);
        }

        Ok(FittedPipeline {
            steps: fitted_steps,
            input_columns: data.column_names().to_vec(),
        })
    }
}

/// Fitted Pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPipeline {
    steps: Vec<FittedPipelineStep>,
    input_columns: Vec<String>,
}

impl FittedPipeline {
    /// Get the number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the names of all steps in the pipeline.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }

    pub fn steps(&self) -> &[FittedPipelineStep] {
        &self.steps
    }

    /// Columns of the frame seen during fit.
    pub fn input_columns(&self) -> &[String] {
        &self.input_columns
    }
}

impl FittedTransformer for FittedPipeline {
    type Input = Frame;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        let mut current = Flow::Table(data);
        for step in &self.steps {
            current = Flow::Matrix(step.transform_step(&current)?);
        }
        match current {
            Flow::Matrix(m) => Ok(m),
            Flow::Table(_) => Err(FareError::InvalidParameter(
                "Pipeline has no steps".to_string(),
            )),
        }
    }

    fn n_features_in(&self) -> usize {
        self.input_columns.len()
    }

    fn n_features_out(&self) -> usize {
        self.steps.last().map_or(0, |s| s.n_features_out())
    }

    fn feature_names_out(&self, input_names: &[String]) -> Vec<String> {
        self.steps
            .iter()
            .fold(input_names.to_vec(), |names, step| {
                step.feature_names_out(&names)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::preprocessing::encoding::HandleUnknown;
    use crate::preprocessing::time_features::CalendarField;
    use approx::assert_relative_eq;

    fn rides() -> Frame {
        Frame::new()
            .with_column("pickup_latitude", Column::Numeric(vec![40.70, 40.75, 40.80]))
            .unwrap()
            .with_column("pickup_longitude", Column::Numeric(vec![-73.90, -73.95, -74.00]))
            .unwrap()
            .with_column("dropoff_latitude", Column::Numeric(vec![40.72, 40.85, 40.80]))
            .unwrap()
            .with_column("dropoff_longitude", Column::Numeric(vec![-73.91, -73.85, -73.99]))
            .unwrap()
            .with_column(
                "pickup_datetime",
                Column::Text(vec![
                    "2013-07-02 19:54:00 UTC".to_string(),
                    "2013-07-03 08:10:00 UTC".to_string(),
                    "2013-07-02 19:10:00 UTC".to_string(),
                ]),
            )
            .unwrap()
    }

    #[test]
    fn test_pipeline_distance_then_scale() {
        let pipeline = Pipeline::new()
            .add_distance(DistanceTransformer::new())
            .add_standard_scaler(StandardScaler::new());
        let fitted = pipeline.fit(&rides()).unwrap();
        let out = fitted.transform(&rides()).unwrap();

        assert_eq!(out.dim(), (3, 1));
        assert_relative_eq!(out.sum(), 0.0, epsilon = 1e-10);
        assert_eq!(
            fitted.step_names(),
            vec!["DistanceTransformer", "StandardScaler"]
        );
    }

    #[test]
    fn test_pipeline_time_then_one_hot() {
        let pipeline = Pipeline::new()
            .add_time_features(
                TimeFeaturesEncoder::new().with_fields(vec![CalendarField::Hour]),
            )
            .add_one_hot_encoder(OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore));
        let fitted = pipeline.fit(&rides()).unwrap();
        let out = fitted.transform(&rides()).unwrap();

        // Hours in New York: 15, 4, 15
        assert_eq!(out.dim(), (3, 2));
        assert_eq!(fitted.n_features_out(), 2);
        assert_eq!(out.row(0).to_vec(), vec![0.0, 1.0]);
        assert_eq!(out.row(1).to_vec(), vec![1.0, 0.0]);
        assert_eq!(
            fitted.feature_names_out(&["pickup_datetime".to_string()]),
            vec!["hour_4", "hour_15"]
        );
    }

    #[test]
    fn test_pipeline_empty() {
        let result = Pipeline::new().fit(&rides());
        assert!(matches!(result, Err(FareError::InvalidParameter(_))));
    }

    #[test]
    fn test_pipeline_empty_data() {
        let pipeline = Pipeline::new().add_distance(DistanceTransformer::new());
        let result = pipeline.fit(&Frame::new());
        assert!(matches!(result, Err(FareError::EmptyData(_))));
    }

    #[test]
    fn test_pipeline_matrix_step_first() {
        let pipeline = Pipeline::new().add_standard_scaler(StandardScaler::new());
        let result = pipeline.fit(&rides());
        assert!(matches!(result, Err(FareError::InvalidParameter(_))));
    }

    #[test]
    fn test_pipeline_frame_step_after_matrix() {
        let pipeline = Pipeline::new()
            .add_distance(DistanceTransformer::new())
            .add_time_features(TimeFeaturesEncoder::new());
        let result = pipeline.fit(&rides());
        assert!(matches!(result, Err(FareError::InvalidParameter(_))));
    }

    #[test]
    fn test_pipeline_len() {
        let pipeline = Pipeline::new()
            .add(DistanceTransformer::new())
            .add(StandardScaler::new());
        assert_eq!(pipeline.len(), 2);
        assert!(!pipeline.is_empty());
    }
}
