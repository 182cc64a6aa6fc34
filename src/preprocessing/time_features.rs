//! Calendar features extracted from a pickup timestamp.

use crate::dataset::record::PICKUP_DATETIME;
use crate::dataset::Frame;
use crate::error::{FareError, Result};
use crate::preprocessing::traits::{FittedTransformer, StatelessTransformer, Transformer};
use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Time zone the pickup instant is converted into before fields are read.
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// A single categorical field derived from a timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarField {
    /// Day of week, Monday = 0 through Sunday = 6.
    Weekday,
    /// Hour of day, 0 through 23.
    Hour,
    /// Month, 1 through 12.
    Month,
    /// Calendar year.
    Year,
}

impl CalendarField {
    /// Every field, in default output order.
    pub const ALL: [CalendarField; 4] = [
        CalendarField::Weekday,
        CalendarField::Hour,
        CalendarField::Month,
        CalendarField::Year,
    ];

    /// Output column name.
    pub fn name(&self) -> &'static str {
        match self {
            CalendarField::Weekday => "weekday",
            CalendarField::Hour => "hour",
            CalendarField::Month => "month",
            CalendarField::Year => "year",
        }
    }

    fn extract(&self, local: &DateTime<Tz>) -> f64 {
        match self {
            CalendarField::Weekday => local.weekday().num_days_from_monday() as f64,
            CalendarField::Hour => local.hour() as f64,
            CalendarField::Month => local.month() as f64,
            CalendarField::Year => local.year() as f64,
        }
    }
}

/// Parse a pickup timestamp into a UTC instant.
///
/// Accepts `YYYY-MM-DD HH:MM:SS UTC`, the same without the suffix (read as
/// UTC), and RFC 3339. Seconds may carry a fraction.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let naive = value
        .strip_suffix(" UTC")
        .unwrap_or(value)
        .trim_end();
    if let Ok(dt) = NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decomposes a timestamp column into calendar features.
///
/// The output holds one column per configured [`CalendarField`], values
/// stored as `f64` so they can feed a [`OneHotEncoder`](super::OneHotEncoder)
/// directly.
///
/// # Example
/// ```
/// use taxifare::dataset::{Column, Frame};
/// use taxifare::preprocessing::{StatelessTransformer, TimeFeaturesEncoder};
///
/// let frame = Frame::new()
///     .with_column(
///         "pickup_datetime",
///         Column::Text(vec!["2013-07-02 19:54:00 UTC".to_string()]),
///     )
///     .unwrap();
///
/// let features = TimeFeaturesEncoder::new().transform_direct(&frame).unwrap();
/// // Tuesday 15:54 in New York.
/// assert_eq!(features.row(0).to_vec(), vec![1.0, 15.0, 7.0, 2013.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TimeFeaturesEncoder {
    column: String,
    time_zone: Tz,
    fields: Vec<CalendarField>,
}

impl Default for TimeFeaturesEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeFeaturesEncoder {
    /// Read `pickup_datetime`, convert to New York time, emit all fields.
    pub fn new() -> Self {
        Self {
            column: PICKUP_DATETIME.to_string(),
            time_zone: chrono_tz::America::New_York,
            fields: CalendarField::ALL.to_vec(),
        }
    }

    /// Read timestamps from another column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Convert instants into the named IANA zone before extracting fields.
    ///
    /// # Errors
    /// [`FareError::InvalidParameter`] if the zone name is unknown.
    pub fn with_time_zone(mut self, name: &str) -> Result<Self> {
        self.time_zone = name
            .parse::<Tz>()
            .map_err(|_| FareError::InvalidParameter(format!("Unknown time zone `{}`", name)))?;
        Ok(self)
    }

    /// Choose which fields to emit, in order.
    pub fn with_fields(mut self, fields: Vec<CalendarField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn fields(&self) -> &[CalendarField] {
        &self.fields
    }

    fn encode(&self, data: &Frame) -> Result<Array2<f64>> {
        if self.fields.is_empty() {
            return Err(FareError::InvalidParameter(
                "TimeFeaturesEncoder needs at least one calendar field".to_string(),
            ));
        }

        let values = data.text(&self.column)?;
        let n_fields = self.fields.len();
        let mut out = Array2::<f64>::zeros((values.len(), n_fields));

        for (row, raw) in values.iter().enumerate() {
            let instant = parse_timestamp(raw).ok_or_else(|| {
                FareError::data_format(
                    &self.column,
                    row,
                    format!("cannot parse timestamp `{}`", raw),
                )
            })?;
            let local = instant.with_timezone(&self.time_zone);
            for (j, field) in self.fields.iter().enumerate() {
                out[[row, j]] = field.extract(&local);
            }
        }

        Ok(out)
    }
}

impl Transformer for TimeFeaturesEncoder {
    type Input = Frame;
    type Output = Array2<f64>;
    type Fitted = TimeFeaturesEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        data.text(&self.column)?;
        Ok(self.clone())
    }
}

impl FittedTransformer for TimeFeaturesEncoder {
    type Input = Frame;
    type Output = Array2<f64>;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        self.encode(data)
    }

    fn n_features_in(&self) -> usize {
        1
    }

    fn n_features_out(&self) -> usize {
        self.fields.len()
    }

    fn feature_names_out(&self, _input_names: &[String]) -> Vec<String> {
        self.fields.iter().map(|f| f.name().to_string()).collect()
    }
}

impl StatelessTransformer for TimeFeaturesEncoder {
    fn transform_direct(&self, data: &Self::Input) -> Result<Self::Output> {
        self.encode(data)
    }
}
