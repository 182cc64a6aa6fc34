//! Row filtering for implausible or incomplete rides.

use crate::dataset::record::RideRecord;
use crate::preprocessing::distance::haversine_km;
use log::info;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Bounds a ride must satisfy to be kept for training.
///
/// Defaults describe the New York City area. Every bound can be replaced with
/// the `with_*` builders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleaningPolicy {
    /// Exclusive lower bound and inclusive upper bound on the fare.
    pub fare: (f64, f64),
    /// Inclusive lower bound and exclusive upper bound on passengers.
    pub passenger_count: (f64, f64),
    pub pickup_latitude: RangeInclusive<f64>,
    pub pickup_longitude: RangeInclusive<f64>,
    pub dropoff_latitude: RangeInclusive<f64>,
    pub dropoff_longitude: RangeInclusive<f64>,
    /// Drop rides whose pickup and dropoff coincide.
    pub drop_zero_distance: bool,
}

impl Default for CleaningPolicy {
    fn default() -> Self {
        Self {
            fare: (0.0, 4000.0),
            passenger_count: (0.0, 8.0),
            pickup_latitude: 40.0..=42.0,
            pickup_longitude: -74.3..=-72.9,
            dropoff_latitude: 40.0..=42.0,
            dropoff_longitude: -74.0..=-72.9,
            drop_zero_distance: true,
        }
    }
}

impl CleaningPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fare(mut self, min_exclusive: f64, max_inclusive: f64) -> Self {
        self.fare = (min_exclusive, max_inclusive);
        self
    }

    pub fn with_passenger_count(mut self, min_inclusive: f64, max_exclusive: f64) -> Self {
        self.passenger_count = (min_inclusive, max_exclusive);
        self
    }

    pub fn with_pickup_bounds(
        mut self,
        latitude: RangeInclusive<f64>,
        longitude: RangeInclusive<f64>,
    ) -> Self {
        self.pickup_latitude = latitude;
        self.pickup_longitude = longitude;
        self
    }

    pub fn with_dropoff_bounds(
        mut self,
        latitude: RangeInclusive<f64>,
        longitude: RangeInclusive<f64>,
    ) -> Self {
        self.dropoff_latitude = latitude;
        self.dropoff_longitude = longitude;
        self
    }

    pub fn with_drop_zero_distance(mut self, drop: bool) -> Self {
        self.drop_zero_distance = drop;
        self
    }

    /// Whether a single ride passes every bound.
    ///
    /// Rides missing a fare, a coordinate, a passenger count or a pickup
    /// timestamp never pass.
    pub fn accepts(&self, ride: &RideRecord) -> bool {
        let (Some(fare), Some(passengers)) = (ride.fare_amount, ride.passenger_count) else {
            return false;
        };
        let (Some(plat), Some(plon), Some(dlat), Some(dlon)) = (
            ride.pickup_latitude,
            ride.pickup_longitude,
            ride.dropoff_latitude,
            ride.dropoff_longitude,
        ) else {
            return false;
        };
        if ride.pickup_datetime.is_empty() {
            return false;
        }

        let fare_ok = fare > self.fare.0 && fare <= self.fare.1;
        let passengers_ok =
            passengers >= self.passenger_count.0 && passengers < self.passenger_count.1;
        let coords_ok = self.pickup_latitude.contains(&plat)
            && self.pickup_longitude.contains(&plon)
            && self.dropoff_latitude.contains(&dlat)
            && self.dropoff_longitude.contains(&dlon);
        if !(fare_ok && passengers_ok && coords_ok) {
            return false;
        }

        !(self.drop_zero_distance && haversine_km(plat, plon, dlat, dlon) == 0.0)
    }

    /// Keep only the rides that pass every bound, preserving order.
    pub fn clean(&self, records: Vec<RideRecord>) -> Vec<RideRecord> {
        let before = records.len();
        let kept: Vec<RideRecord> = records.into_iter().filter(|r| self.accepts(r)).collect();
        info!(
            "cleaning kept {} of {} rides ({} dropped)",
            kept.len(),
            before,
            before - kept.len()
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride() -> RideRecord {
        RideRecord {
            key: Some("k".to_string()),
            fare_amount: Some(12.5),
            pickup_datetime: "2013-07-02 19:54:00 UTC".to_string(),
            pickup_longitude: Some(-73.98),
            pickup_latitude: Some(40.75),
            dropoff_longitude: Some(-73.95),
            dropoff_latitude: Some(40.78),
            passenger_count: Some(1.0),
        }
    }

    #[test]
    fn test_accepts_valid_ride() {
        assert!(CleaningPolicy::default().accepts(&ride()));
    }

    #[test]
    fn test_rejects_missing_values() {
        let policy = CleaningPolicy::default();
        let mut r = ride();
        r.dropoff_latitude = None;
        assert!(!policy.accepts(&r));

        let mut r = ride();
        r.fare_amount = None;
        assert!(!policy.accepts(&r));
    }

    #[test]
    fn test_fare_bounds() {
        let policy = CleaningPolicy::default();
        let mut r = ride();
        r.fare_amount = Some(0.0);
        assert!(!policy.accepts(&r));
        r.fare_amount = Some(4000.0);
        assert!(policy.accepts(&r));
        r.fare_amount = Some(4000.01);
        assert!(!policy.accepts(&r));
    }

    #[test]
    fn test_passenger_bounds() {
        let policy = CleaningPolicy::default();
        let mut r = ride();
        r.passenger_count = Some(0.0);
        assert!(policy.accepts(&r));
        r.passenger_count = Some(8.0);
        assert!(!policy.accepts(&r));
    }

    #[test]
    fn test_coordinate_bounds() {
        let policy = CleaningPolicy::default();
        let mut r = ride();
        r.pickup_latitude = Some(0.0);
        assert!(!policy.accepts(&r));

        // Dropoff longitude has a tighter western bound than pickup.
        let mut r = ride();
        r.pickup_longitude = Some(-74.2);
        assert!(policy.accepts(&r));
        r.dropoff_longitude = Some(-74.2);
        assert!(!policy.accepts(&r));
    }

    #[test]
    fn test_zero_distance() {
        let mut r = ride();
        r.dropoff_latitude = r.pickup_latitude;
        r.dropoff_longitude = r.pickup_longitude;
        assert!(!CleaningPolicy::default().accepts(&r));
        assert!(CleaningPolicy::default()
            .with_drop_zero_distance(false)
            .accepts(&r));
    }

    #[test]
    fn test_clean_preserves_order() {
        let mut bad = ride();
        bad.passenger_count = Some(9.0);
        let mut second = ride();
        second.key = Some("second".to_string());

        let kept = CleaningPolicy::default().clean(vec![ride(), bad, second]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].key.as_deref(), Some("second"));
    }
}
