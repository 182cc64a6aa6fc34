//! Great-circle distance between pickup and dropoff.
//!
//! The haversine distance between two points is:
//! ```text
//! a = sin²(Δlat / 2) + cos(lat1) · cos(lat2) · sin²(Δlon / 2)
//! d = 2 · R · asin(√a)
//! ```
//! with `R` the mean Earth radius in kilometres.

use crate::dataset::record::{
    DROPOFF_LATITUDE, DROPOFF_LONGITUDE, PICKUP_LATITUDE, PICKUP_LONGITUDE,
};
use crate::dataset::Frame;
use crate::error::{FareError, Result};
use crate::preprocessing::traits::{FittedTransformer, StatelessTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Name of the single output column.
pub const DISTANCE_FEATURE: &str = "distance_km";

/// Haversine distance in kilometres between two points given in degrees.
///
/// Coordinates are not range-checked: any finite input gives a finite,
/// non-negative distance.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding and out-of-range latitudes can push `a` outside [0, 1].
    2.0 * EARTH_RADIUS_KM * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Computes one `distance_km` column from four coordinate columns.
///
/// Nothing is learned at fit time; fitting only checks that the columns
/// exist and are numeric, and returns the transformer unchanged.
///
/// # Example
/// ```
/// use taxifare::dataset::{Column, Frame};
/// use taxifare::preprocessing::{DistanceTransformer, StatelessTransformer};
///
/// let frame = Frame::new()
///     .with_column("pickup_latitude", Column::Numeric(vec![40.0])).unwrap()
///     .with_column("pickup_longitude", Column::Numeric(vec![-73.0])).unwrap()
///     .with_column("dropoff_latitude", Column::Numeric(vec![40.0])).unwrap()
///     .with_column("dropoff_longitude", Column::Numeric(vec![-73.0])).unwrap();
///
/// let distance = DistanceTransformer::new().transform_direct(&frame).unwrap();
/// assert_eq!(distance[[0, 0]], 0.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceTransformer {
    pickup_latitude: String,
    pickup_longitude: String,
    dropoff_latitude: String,
    dropoff_longitude: String,
}

impl Default for DistanceTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceTransformer {
    /// Create a transformer reading the standard coordinate columns.
    pub fn new() -> Self {
        Self {
            pickup_latitude: PICKUP_LATITUDE.to_string(),
            pickup_longitude: PICKUP_LONGITUDE.to_string(),
            dropoff_latitude: DROPOFF_LATITUDE.to_string(),
            dropoff_longitude: DROPOFF_LONGITUDE.to_string(),
        }
    }

    /// Read pickup coordinates from differently named columns.
    pub fn with_pickup_columns(
        mut self,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        self.pickup_latitude = latitude.into();
        self.pickup_longitude = longitude.into();
        self
    }

    /// Read dropoff coordinates from differently named columns.
    pub fn with_dropoff_columns(
        mut self,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Self {
        self.dropoff_latitude = latitude.into();
        self.dropoff_longitude = longitude.into();
        self
    }

    /// The four input columns, in `[pickup lat, pickup lon, dropoff lat, dropoff lon]` order.
    pub fn input_columns(&self) -> [&str; 4] {
        [
            self.pickup_latitude.as_str(),
            self.pickup_longitude.as_str(),
            self.dropoff_latitude.as_str(),
            self.dropoff_longitude.as_str(),
        ]
    }

    fn distances(&self, data: &Frame) -> Result<Array2<f64>> {
        let [plat, plon, dlat, dlon] = self.input_columns();
        let columns = [
            (plat, data.numeric(plat)?),
            (plon, data.numeric(plon)?),
            (dlat, data.numeric(dlat)?),
            (dlon, data.numeric(dlon)?),
        ];

        for (name, values) in &columns {
            if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                return Err(FareError::data_format(
                    name,
                    row,
                    format!("coordinate is not a finite number: {}", values[row]),
                ));
            }
        }

        let [(_, plat), (_, plon), (_, dlat), (_, dlon)] = columns;
        let distances: Array1<f64> = (0..data.n_rows())
            .map(|i| haversine_km(plat[i], plon[i], dlat[i], dlon[i]))
            .collect();
        Ok(distances.insert_axis(Axis(1)))
    }
}

impl Transformer for DistanceTransformer {
    type Input = Frame;
    type Output = Array2<f64>;
    type Fitted = DistanceTransformer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        for name in self.input_columns() {
            data.numeric(name)?;
        }
        Ok(self.clone())
    }
}

impl FittedTransformer for DistanceTransformer {
    type Input = Frame;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        self.distances(data)
    }

    fn n_features_in(&self) -> usize {
        4
    }

    fn n_features_out(&self) -> usize {
        1
    }

    fn feature_names_out(&self, _input_names: &[String]) -> Vec<String> {
        vec![DISTANCE_FEATURE.to_string()]
    }
}

impl StatelessTransformer for DistanceTransformer {
    fn transform_direct(&self, data: &Self::Input) -> Result<Self::Output> {
        self.distances(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use approx::assert_relative_eq;

    fn coords(plat: Vec<f64>, plon: Vec<f64>, dlat: Vec<f64>, dlon: Vec<f64>) -> Frame {
        Frame::new()
            .with_column(PICKUP_LATITUDE, Column::Numeric(plat))
            .unwrap()
            .with_column(PICKUP_LONGITUDE, Column::Numeric(plon))
            .unwrap()
            .with_column(DROPOFF_LATITUDE, Column::Numeric(dlat))
            .unwrap()
            .with_column(DROPOFF_LONGITUDE, Column::Numeric(dlon))
            .unwrap()
    }

    #[test]
    fn test_haversine_same_point() {
        assert_eq!(haversine_km(40.7, -73.9, 40.7, -73.9), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        // One degree along a meridian is R * pi / 180.
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert_relative_eq!(haversine_km(0.0, 0.0, 1.0, 0.0), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_haversine_symmetric() {
        let ab = haversine_km(40.72, -73.84, 40.71, -73.84);
        let ba = haversine_km(40.71, -73.84, 40.72, -73.84);
        assert_relative_eq!(ab, ba, epsilon = 1e-12);
        assert!(ab > 0.0);
    }

    #[test]
    fn test_transform_shape_and_values() {
        let frame = coords(
            vec![40.0, 0.0],
            vec![-73.0, 0.0],
            vec![40.0, 1.0],
            vec![-73.0, 0.0],
        );
        let out = DistanceTransformer::new().fit_transform(&frame).unwrap();
        assert_eq!(out.dim(), (2, 1));
        assert_eq!(out[[0, 0]], 0.0);
        assert_relative_eq!(out[[1, 0]], 111.19492664455873, epsilon = 1e-6);
    }

    #[test]
    fn test_distances_non_negative() {
        let frame = coords(
            vec![40.1, 41.9, 40.5],
            vec![-74.2, -73.0, -73.5],
            vec![41.8, 40.0, 40.5],
            vec![-72.95, -73.99, -73.6],
        );
        let out = DistanceTransformer::new().transform_direct(&frame).unwrap();
        assert!(out.iter().all(|&d| d >= 0.0));
    }

    #[test]
    fn test_haversine_out_of_range_latitudes() {
        let d = haversine_km(-176.5, 0.0, -3.5, 180.0);
        assert!(d.is_finite() && d >= 0.0);

        for step in 0..=72 {
            let lat1 = -180.0 + 5.0 * step as f64;
            for lat2 in [-180.0, -90.0, -3.5, 0.0, 45.0, 179.5] {
                let d = haversine_km(lat1, 0.0, lat2, 180.0);
                assert!(d.is_finite() && d >= 0.0, "{lat1}, {lat2} -> {d}");
                assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
            }
        }
    }

    #[test]
    fn test_missing_column() {
        let frame = Frame::new()
            .with_column(PICKUP_LATITUDE, Column::Numeric(vec![40.0]))
            .unwrap();
        let result = DistanceTransformer::new().fit(&frame);
        assert!(matches!(
            result,
            Err(FareError::DimensionMismatch {
                missing: Some(_),
                ..
            })
        ));
    }

    #[test]
    fn test_text_column_rejected() {
        let frame = coords(vec![40.0], vec![-73.0], vec![40.0], vec![-73.0])
            .drop_column(DROPOFF_LONGITUDE)
            .unwrap()
            .0
            .with_column(DROPOFF_LONGITUDE, Column::Text(vec!["west".into()]))
            .unwrap();
        let result = DistanceTransformer::new().fit(&frame);
        assert!(matches!(result, Err(FareError::DataFormat { .. })));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let frame = coords(vec![40.0, f64::NAN], vec![-73.0; 2], vec![40.0; 2], vec![-73.0; 2]);
        match DistanceTransformer::new().transform_direct(&frame) {
            Err(FareError::DataFormat { column, row, .. }) => {
                assert_eq!(column, PICKUP_LATITUDE);
                assert_eq!(row, 1);
            }
            other => panic!("expected DataFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_columns() {
        let frame = Frame::new()
            .with_column("a", Column::Numeric(vec![0.0]))
            .unwrap()
            .with_column("b", Column::Numeric(vec![0.0]))
            .unwrap()
            .with_column("c", Column::Numeric(vec![1.0]))
            .unwrap()
            .with_column("d", Column::Numeric(vec![0.0]))
            .unwrap();
        let transformer = DistanceTransformer::new()
            .with_pickup_columns("a", "b")
            .with_dropoff_columns("c", "d");
        let out = transformer.fit_transform(&frame).unwrap();
        assert!(out[[0, 0]] > 111.0);
        assert_eq!(
            transformer.feature_names_out(&[]),
            vec![DISTANCE_FEATURE.to_string()]
        );
    }
}
