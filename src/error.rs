//! Error types for loading, preprocessing, fitting and evaluation.

use thiserror::Error;

/// Error type shared by every stage of the fare model.
///
/// Nothing in the crate catches or retries these: a failure inside a
/// transformer, the solver or the metric surfaces unchanged to whoever
/// called [`Trainer::run`](crate::trainer::Trainer::run) or
/// [`Trainer::evaluate`](crate::trainer::Trainer::evaluate).
#[derive(Debug, Error)]
pub enum FareError {
    /// A value could not be parsed, or a column has the wrong type.
    #[error("Data format error in column `{column}` at row {row}: {message}")]
    DataFormat {
        column: String,
        row: usize,
        message: String,
    },
    /// Prediction or evaluation was requested before the pipeline was fitted.
    #[error("Unfitted state: {0}")]
    UnfittedState(String),
    /// Two sequences or matrices that must line up do not.
    ///
    /// When the input frame lacks a referenced column, `missing` names it and
    /// `expected`/`got` count the referenced and present columns.
    #[error("Dimension mismatch: expected {expected}, got {got}{}", missing_suffix(.missing))]
    DimensionMismatch {
        expected: usize,
        got: usize,
        missing: Option<String>,
    },
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Invalid hyperparameter or pipeline composition.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The least-squares solve produced no usable solution.
    #[error("Numerical error: {0}")]
    Numerical(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FareError {
    pub(crate) fn data_format(column: &str, row: usize, message: impl Into<String>) -> Self {
        FareError::DataFormat {
            column: column.to_string(),
            row,
            message: message.into(),
        }
    }

    pub(crate) fn missing_column(column: &str, expected: usize, got: usize) -> Self {
        FareError::DimensionMismatch {
            expected,
            got,
            missing: Some(column.to_string()),
        }
    }
}

fn missing_suffix(missing: &Option<String>) -> String {
    match missing {
        Some(column) => format!(" (missing column `{column}`)"),
        None => String::new(),
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FareError>;
