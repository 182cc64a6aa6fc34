//! Assembles, trains and evaluates the fare model.

use crate::config::FeatureConfig;
use crate::dataset::Frame;
use crate::error::{FareError, Result};
use crate::metrics::{rmse, RegressionMetrics};
use crate::model::LinearRegression;
use crate::pipeline::{FarePipeline, FittedFarePipeline};
use crate::preprocessing::{
    ColumnSpec, ColumnTransformer, DistanceTransformer, HandleUnknown, OneHotEncoder, Pipeline,
    StandardScaler, TimeFeaturesEncoder,
};
use log::{debug, info};
use ndarray::Array1;

/// Holds training rows and labels, and owns the pipeline built from them.
///
/// The lifecycle is `new` -> `run` -> `evaluate`/`predict`. Calling
/// [`evaluate`](Self::evaluate) or [`predict`](Self::predict) before a
/// successful [`run`](Self::run) returns [`FareError::UnfittedState`].
///
/// # Example
/// ```no_run
/// use taxifare::dataset::{load_rides, rides_to_frame, CleaningPolicy};
/// use taxifare::trainer::Trainer;
///
/// let rides = CleaningPolicy::default().clean(load_rides("train.csv", Some(10_000))?);
/// let (x, y) = rides_to_frame(&rides)?.split_target("fare_amount")?;
///
/// let mut trainer = Trainer::new(x.clone(), y.clone())?;
/// trainer.run()?;
/// let rmse = trainer.evaluate(&x, &y)?;
/// # Ok::<(), taxifare::error::FareError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Trainer {
    x: Frame,
    y: Vec<f64>,
    features: FeatureConfig,
    pipeline: Option<FarePipeline>,
    fitted: Option<FittedFarePipeline>,
}

impl Trainer {
    /// Store training rows and their labels.
    ///
    /// # Errors
    /// [`FareError::DimensionMismatch`] if there is not one label per row.
    pub fn new(x: Frame, y: Vec<f64>) -> Result<Self> {
        if x.n_rows() != y.len() {
            return Err(FareError::DimensionMismatch {
                expected: x.n_rows(),
                got: y.len(),
                missing: None,
            });
        }
        Ok(Self {
            x,
            y,
            features: FeatureConfig::default(),
            pipeline: None,
            fitted: None,
        })
    }

    /// Use different column names or calendar settings.
    ///
    /// Any assembled or trained pipeline was built from the old settings and
    /// is discarded.
    pub fn with_features(mut self, features: FeatureConfig) -> Self {
        self.features = features;
        self.pipeline = None;
        self.fitted = None;
        self
    }

    pub fn features(&self) -> &FeatureConfig {
        &self.features
    }

    /// Build the untrained pipeline and store it.
    ///
    /// Two branches feed a linear regression:
    /// - `distance`: haversine distance, then standard scaling, over the four
    ///   coordinate columns.
    /// - `time`: calendar fields, then one-hot encoding with unknown
    ///   categories mapped to zeros, over the timestamp column.
    ///
    /// All other columns are dropped. Any previously trained pipeline is
    /// discarded.
    ///
    /// # Errors
    /// [`FareError::InvalidParameter`] if the configured time zone is unknown.
    pub fn set_pipeline(&mut self) -> Result<&FarePipeline> {
        let pipeline = self.build_pipeline()?;
        self.fitted = None;
        Ok(self.pipeline.insert(pipeline))
    }

    fn build_pipeline(&self) -> Result<FarePipeline> {
        let distance = Pipeline::new()
            .add_distance(
                DistanceTransformer::new()
                    .with_pickup_columns(
                        &self.features.pickup_latitude,
                        &self.features.pickup_longitude,
                    )
                    .with_dropoff_columns(
                        &self.features.dropoff_latitude,
                        &self.features.dropoff_longitude,
                    ),
            )
            .add_standard_scaler(StandardScaler::new());

        let time = Pipeline::new()
            .add_time_features(
                TimeFeaturesEncoder::new()
                    .with_column(&self.features.datetime)
                    .with_time_zone(&self.features.time_zone)?
                    .with_fields(self.features.calendar_fields.clone()),
            )
            .add_one_hot_encoder(OneHotEncoder::new().with_handle_unknown(HandleUnknown::Ignore));

        let preprocessor = ColumnTransformer::new()
            .add(
                "distance",
                distance,
                ColumnSpec::names(&self.features.coordinate_columns()),
            )
            .add(
                "time",
                time,
                ColumnSpec::names(&[self.features.datetime.as_str()]),
            );

        Ok(FarePipeline::new(preprocessor, LinearRegression::new()))
    }

    /// Build a fresh pipeline and fit it on the stored rows.
    ///
    /// On failure the trainer is left without a fitted pipeline.
    pub fn run(&mut self) -> Result<&FittedFarePipeline> {
        let pipeline = self.set_pipeline()?.clone();
        info!(
            "training on {} rows with {} columns",
            self.x.n_rows(),
            self.x.n_cols()
        );

        let fitted = pipeline.fit(&self.x, &self.y)?;
        debug!("features: {:?}", fitted.feature_names());
        info!("trained linear model on {} features", fitted.n_features());

        Ok(self.fitted.insert(fitted))
    }

    fn require_fitted(&self) -> Result<&FittedFarePipeline> {
        self.fitted.as_ref().ok_or_else(|| {
            FareError::UnfittedState("the pipeline has not been trained; call run() first".to_string())
        })
    }

    /// Predict fares for new rows.
    pub fn predict(&self, x: &Frame) -> Result<Array1<f64>> {
        self.require_fitted()?.predict(x)
    }

    /// Predict on held-out rows and return the RMSE against their labels.
    pub fn evaluate(&self, x_test: &Frame, y_test: &[f64]) -> Result<f64> {
        let predictions = self.predict(x_test)?;
        let score = rmse(&predictions.to_vec(), y_test)?;
        info!("evaluated {} rows: rmse = {:.4}", y_test.len(), score);
        Ok(score)
    }

    /// Like [`evaluate`](Self::evaluate), reporting every regression metric.
    pub fn evaluate_metrics(&self, x_test: &Frame, y_test: &[f64]) -> Result<RegressionMetrics> {
        let predictions = self.predict(x_test)?;
        RegressionMetrics::compute(&predictions.to_vec(), y_test)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The assembled (untrained) pipeline, if any.
    pub fn pipeline(&self) -> Option<&FarePipeline> {
        self.pipeline.as_ref()
    }

    /// The trained pipeline, if `run` has succeeded.
    pub fn fitted_pipeline(&self) -> Option<&FittedFarePipeline> {
        self.fitted.as_ref()
    }
}
