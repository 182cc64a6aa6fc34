//! Ride records and CSV loading.

use crate::dataset::frame::{Column, Frame};
use crate::error::Result;
use log::info;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

pub const KEY: &str = "key";
pub const FARE_AMOUNT: &str = "fare_amount";
pub const PICKUP_DATETIME: &str = "pickup_datetime";
pub const PICKUP_LONGITUDE: &str = "pickup_longitude";
pub const PICKUP_LATITUDE: &str = "pickup_latitude";
pub const DROPOFF_LONGITUDE: &str = "dropoff_longitude";
pub const DROPOFF_LATITUDE: &str = "dropoff_latitude";
pub const PASSENGER_COUNT: &str = "passenger_count";

/// One ride observation as it appears in the source CSV.
///
/// Numeric fields are optional so that blank cells load successfully and are
/// removed later by [`CleaningPolicy`](crate::dataset::CleaningPolicy).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RideRecord {
    #[serde(default)]
    pub key: Option<String>,
    /// Label; absent in inference-only data.
    #[serde(default)]
    pub fare_amount: Option<f64>,
    pub pickup_datetime: String,
    pub pickup_longitude: Option<f64>,
    pub pickup_latitude: Option<f64>,
    pub dropoff_longitude: Option<f64>,
    pub dropoff_latitude: Option<f64>,
    #[serde(default)]
    pub passenger_count: Option<f64>,
}

/// Load up to `nrows` records from a headed CSV file.
pub fn load_rides<P: AsRef<Path>>(path: P, nrows: Option<usize>) -> Result<Vec<RideRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let records = read_rides(std::io::BufReader::new(file), nrows)?;
    info!("loaded {} rides from {}", records.len(), path.display());
    Ok(records)
}

/// Read up to `nrows` records from any CSV source.
pub fn read_rides<R: Read>(reader: R, nrows: Option<usize>) -> Result<Vec<RideRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let limit = nrows.unwrap_or(usize::MAX);
    let mut records = Vec::new();
    for result in rdr.deserialize::<RideRecord>().take(limit) {
        records.push(result?);
    }
    Ok(records)
}

/// Convert records into a [`Frame`].
///
/// Missing numeric values become `NaN`; clean the records first when that
/// matters. The `fare_amount` column is included only if every record has a
/// fare.
pub fn rides_to_frame(records: &[RideRecord]) -> Result<Frame> {
    let numeric = |f: fn(&RideRecord) -> Option<f64>| {
        Column::Numeric(records.iter().map(|r| f(r).unwrap_or(f64::NAN)).collect())
    };

    let mut frame = Frame::new().with_column(
        KEY,
        Column::Text(
            records
                .iter()
                .enumerate()
                .map(|(i, r)| r.key.clone().unwrap_or_else(|| i.to_string()))
                .collect(),
        ),
    )?;

    if records.iter().all(|r| r.fare_amount.is_some()) {
        frame = frame.with_column(FARE_AMOUNT, numeric(|r| r.fare_amount))?;
    }

    frame
        .with_column(
            PICKUP_DATETIME,
            Column::Text(records.iter().map(|r| r.pickup_datetime.clone()).collect()),
        )?
        .with_column(PICKUP_LONGITUDE, numeric(|r| r.pickup_longitude))?
        .with_column(PICKUP_LATITUDE, numeric(|r| r.pickup_latitude))?
        .with_column(DROPOFF_LONGITUDE, numeric(|r| r.dropoff_longitude))?
        .with_column(DROPOFF_LATITUDE, numeric(|r| r.dropoff_latitude))?
        .with_column(PASSENGER_COUNT, numeric(|r| r.passenger_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FareError;

    const CSV: &str = "\
key,fare_amount,pickup_datetime,pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,passenger_count
2009-06-15 17:26:21.0000001,4.5,2009-06-15 17:26:21 UTC,-73.844311,40.721319,-73.84161,40.712278,1
2010-01-05 16:52:16.0000002,16.9,2010-01-05 16:52:16 UTC,-74.016048,40.711303,-73.979268,40.782004,1
2011-08-18 00:35:00.00000049,5.7,2011-08-18 00:35:00 UTC,,40.76127,-73.991242,40.750562,2
";

    #[test]
    fn test_read_rides_all() {
        let records = read_rides(CSV.as_bytes(), None).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].fare_amount, Some(4.5));
        assert_eq!(records[0].pickup_datetime, "2009-06-15 17:26:21 UTC");
        assert_eq!(records[2].pickup_longitude, None);
    }

    #[test]
    fn test_read_rides_nrows() {
        let records = read_rides(CSV.as_bytes(), Some(2)).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_read_rides_malformed() {
        let bad = "key,fare_amount,pickup_datetime,pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,passenger_count\nk,abc,t,1,2,3,4,1\n";
        let result = read_rides(bad.as_bytes(), None);
        assert!(matches!(result, Err(FareError::Csv(_))));
    }

    #[test]
    fn test_rides_to_frame_columns() {
        let records = read_rides(CSV.as_bytes(), None).unwrap();
        let frame = rides_to_frame(&records).unwrap();
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.n_cols(), 8);
        assert!(frame.numeric(PICKUP_LONGITUDE).unwrap()[2].is_nan());
        assert_eq!(frame.numeric(FARE_AMOUNT).unwrap()[1], 16.9);
    }

    #[test]
    fn test_rides_to_frame_without_labels() {
        let records = vec![RideRecord {
            pickup_datetime: "2012-04-21 04:30:42 UTC".to_string(),
            pickup_longitude: Some(-73.98),
            pickup_latitude: Some(40.76),
            dropoff_longitude: Some(-73.99),
            dropoff_latitude: Some(40.75),
            ..Default::default()
        }];
        let frame = rides_to_frame(&records).unwrap();
        assert!(frame.column(FARE_AMOUNT).is_none());
        assert_eq!(frame.text(KEY).unwrap()[0], "0");
    }
}
