//! In-process configuration for feature assembly and training runs.

use crate::dataset::record::{
    DROPOFF_LATITUDE, DROPOFF_LONGITUDE, FARE_AMOUNT, PICKUP_DATETIME, PICKUP_LATITUDE,
    PICKUP_LONGITUDE,
};
use crate::dataset::CleaningPolicy;
use crate::preprocessing::time_features::{CalendarField, DEFAULT_TIME_ZONE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Column names and calendar settings used to build the feature pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub pickup_latitude: String,
    pub pickup_longitude: String,
    pub dropoff_latitude: String,
    pub dropoff_longitude: String,
    /// Text column holding the pickup timestamp.
    pub datetime: String,
    /// IANA zone the timestamp is converted into.
    pub time_zone: String,
    pub calendar_fields: Vec<CalendarField>,
    /// Label column separated from the features before training.
    pub target: String,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            pickup_latitude: PICKUP_LATITUDE.to_string(),
            pickup_longitude: PICKUP_LONGITUDE.to_string(),
            dropoff_latitude: DROPOFF_LATITUDE.to_string(),
            dropoff_longitude: DROPOFF_LONGITUDE.to_string(),
            datetime: PICKUP_DATETIME.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            calendar_fields: CalendarField::ALL.to_vec(),
            target: FARE_AMOUNT.to_string(),
        }
    }
}

impl FeatureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    pub fn with_calendar_fields(mut self, fields: Vec<CalendarField>) -> Self {
        self.calendar_fields = fields;
        self
    }

    pub fn with_datetime_column(mut self, column: impl Into<String>) -> Self {
        self.datetime = column.into();
        self
    }

    pub fn with_target(mut self, column: impl Into<String>) -> Self {
        self.target = column.into();
        self
    }

    /// Coordinate columns in `[pickup lat, pickup lon, dropoff lat, dropoff lon]` order.
    pub fn coordinate_columns(&self) -> [&str; 4] {
        [
            self.pickup_latitude.as_str(),
            self.pickup_longitude.as_str(),
            self.dropoff_latitude.as_str(),
            self.dropoff_longitude.as_str(),
        ]
    }
}

/// Everything an end-to-end training run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data: PathBuf,
    /// Read at most this many rows; `None` reads the whole file.
    pub nrows: Option<usize>,
    /// Fraction of rows held out for evaluation.
    pub test_size: f64,
    pub seed: u64,
    pub cleaning: CleaningPolicy,
    pub features: FeatureConfig,
}

impl TrainConfig {
    pub fn new(data: impl Into<PathBuf>) -> Self {
        Self {
            data: data.into(),
            nrows: Some(10_000),
            test_size: 0.2,
            seed: 42,
            cleaning: CleaningPolicy::default(),
            features: FeatureConfig::default(),
        }
    }

    pub fn with_nrows(mut self, nrows: Option<usize>) -> Self {
        self.nrows = nrows;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_cleaning(mut self, cleaning: CleaningPolicy) -> Self {
        self.cleaning = cleaning;
        self
    }

    pub fn with_features(mut self, features: FeatureConfig) -> Self {
        self.features = features;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_config_defaults() {
        let config = FeatureConfig::default();
        assert_eq!(
            config.coordinate_columns(),
            [
                "pickup_latitude",
                "pickup_longitude",
                "dropoff_latitude",
                "dropoff_longitude"
            ]
        );
        assert_eq!(config.time_zone, "America/New_York");
        assert_eq!(config.target, "fare_amount");
        assert_eq!(config.calendar_fields.len(), 4);
    }

    #[test]
    fn test_train_config_builders() {
        let config = TrainConfig::new("train.csv")
            .with_nrows(None)
            .with_test_size(0.3)
            .with_seed(7);
        assert_eq!(config.nrows, None);
        assert_eq!(config.test_size, 0.3);
        assert_eq!(config.seed, 7);
        assert_eq!(config.data, PathBuf::from("train.csv"));
    }

    #[test]
    fn test_feature_config_json() {
        let config = FeatureConfig::new().with_calendar_fields(vec![CalendarField::Hour]);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"calendar_fields\":[\"hour\"]"));
        let back: FeatureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
