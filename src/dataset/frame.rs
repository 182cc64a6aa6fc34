//! Column-oriented table with named, equal-length columns.

use crate::error::{FareError, Result};

/// A single column of a [`Frame`].
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Floating point values (coordinates, fares, counts).
    Numeric(Vec<f64>),
    /// Raw strings (timestamps, keys).
    Text(Vec<String>),
}

impl Column {
    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&r| v[r]).collect()),
            Column::Text(v) => Column::Text(rows.iter().map(|&r| v[r].clone()).collect()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Text(_) => "text",
        }
    }
}

/// Tabular container of ride observations.
///
/// Rows have no identity beyond their position. Column order is preserved
/// and names are unique.
///
/// # Example
/// ```
/// use taxifare::dataset::{Column, Frame};
///
/// let frame = Frame::new()
///     .with_column("fare_amount", Column::Numeric(vec![7.5, 12.0]))
///     .unwrap();
/// assert_eq!(frame.n_rows(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    /// Create an empty frame with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    ///
    /// # Errors
    /// - [`FareError::DimensionMismatch`] if the column length differs from
    ///   the existing row count.
    /// - [`FareError::InvalidParameter`] if a column with that name exists.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(FareError::InvalidParameter(format!(
                "Duplicate column `{}`",
                name
            )));
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(FareError::DimensionMismatch {
                expected: self.n_rows,
                got: column.len(),
                missing: None,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(self)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    /// Borrow a numeric column.
    ///
    /// # Errors
    /// [`FareError::DimensionMismatch`] naming the column when absent,
    /// [`FareError::DataFormat`] when the column holds text.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column::Numeric(v)) => Ok(v),
            Some(other) => Err(FareError::data_format(
                name,
                0,
                format!("expected a numeric column, found {}", other.kind()),
            )),
            None => Err(FareError::missing_column(name, 1, 0)),
        }
    }

    /// Borrow a text column.
    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.column(name) {
            Some(Column::Text(v)) => Ok(v),
            Some(other) => Err(FareError::data_format(
                name,
                0,
                format!("expected a text column, found {}", other.kind()),
            )),
            None => Err(FareError::missing_column(name, 1, 0)),
        }
    }

    /// Build a new frame holding only the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Frame> {
        let mut out = Frame::new();
        if let Some(absent) = names.iter().find(|n| self.column(n.as_ref()).is_none()) {
            let present = names
                .iter()
                .filter(|n| self.column(n.as_ref()).is_some())
                .count();
            return Err(FareError::missing_column(absent.as_ref(), names.len(), present));
        }
        for name in names {
            let name = name.as_ref();
            let column = self
                .column(name)
                .ok_or_else(|| FareError::missing_column(name, 1, 0))?;
            out = out.with_column(name, column.clone())?;
        }
        // A selection of zero columns keeps the row count.
        if names.is_empty() {
            out.n_rows = self.n_rows;
        }
        Ok(out)
    }

    /// Remove a column, returning the remaining frame and the removed column.
    pub fn drop_column(mut self, name: &str) -> Result<(Frame, Column)> {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| FareError::missing_column(name, 1, 0))?;
        self.names.remove(idx);
        let column = self.columns.remove(idx);
        Ok((self, column))
    }

    /// Separate a numeric label column from the features.
    pub fn split_target(self, name: &str) -> Result<(Frame, Vec<f64>)> {
        let (features, column) = self.drop_column(name)?;
        match column {
            Column::Numeric(values) => Ok((features, values)),
            Column::Text(_) => Err(FareError::data_format(
                name,
                0,
                "target column must be numeric",
            )),
        }
    }

    /// Gather the given rows (in the given order) into a new frame.
    pub fn take(&self, rows: &[usize]) -> Frame {
        Frame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            n_rows: rows.len(),
        }
    }
}
