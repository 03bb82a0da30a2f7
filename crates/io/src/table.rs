//! Column-oriented tables for export.

use astra_lightcurve::{FoldedCurve, LightCurve};

use crate::error::IoError;

/// Values of one table column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    /// 64-bit floats.
    Float64(Vec<f64>),
    /// 32-bit signed integers.
    Int32(Vec<i32>),
}

impl ColumnData {
    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Self::Float64(v) => v.len(),
            Self::Int32(v) => v.len(),
        }
    }

    /// Returns `true` if the column has no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named columns of equal length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, ColumnData)>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the name is already used or the
    /// length differs from the existing columns.
    pub fn with_column(mut self, name: &str, data: ColumnData) -> Result<Self, IoError> {
        if self.columns.iter().any(|(n, _)| n == name) {
            return Err(IoError::Validation {
                count: 1,
                details: format!("duplicate column '{name}'"),
            });
        }
        if let Some(rows) = self.num_rows()
            && data.len() != rows
        {
            return Err(IoError::Validation {
                count: 1,
                details: format!(
                    "column '{name}' has {} rows, expected {rows}",
                    data.len()
                ),
            });
        }
        self.columns.push((name.to_string(), data));
        Ok(self)
    }

    /// Appends a Float64 column.
    ///
    /// # Errors
    ///
    /// See [`Table::with_column`].
    pub fn with_f64(self, name: &str, values: Vec<f64>) -> Result<Self, IoError> {
        self.with_column(name, ColumnData::Float64(values))
    }

    /// Appends an Int32 column.
    ///
    /// # Errors
    ///
    /// See [`Table::with_column`].
    pub fn with_i32(self, name: &str, values: Vec<i32>) -> Result<Self, IoError> {
        self.with_column(name, ColumnData::Int32(values))
    }

    /// Number of rows, or `None` for a table without columns.
    pub fn num_rows(&self) -> Option<usize> {
        self.columns.first().map(|(_, c)| c.len())
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> &[(String, ColumnData)] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }
}

impl TryFrom<&LightCurve> for Table {
    type Error = IoError;

    /// Columns `time`, `flux`, `flux_err`.
    fn try_from(lc: &LightCurve) -> Result<Self, IoError> {
        Table::new()
            .with_f64("time", lc.time().to_vec())?
            .with_f64("flux", lc.flux().to_vec())?
            .with_f64("flux_err", lc.flux_err().to_vec())
    }
}

impl TryFrom<&FoldedCurve> for Table {
    type Error = IoError;

    /// Columns `phase`, `phase_norm`, `flux`, `flux_err`.
    fn try_from(folded: &FoldedCurve) -> Result<Self, IoError> {
        Table::new()
            .with_f64("phase", folded.phase().to_vec())?
            .with_f64("phase_norm", folded.normalized_phase())?
            .with_f64("flux", folded.flux().to_vec())?
            .with_f64("flux_err", folded.flux_err().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_columns_in_order() {
        let table = Table::new()
            .with_f64("time", vec![0.0, 1.0])
            .unwrap()
            .with_i32("quality", vec![0, 4])
            .unwrap();
        assert_eq!(table.num_rows(), Some(2));
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.columns()[1].0, "quality");
        assert_eq!(table.column("quality"), Some(&ColumnData::Int32(vec![0, 4])));
        assert!(table.column("flux").is_none());
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = Table::new()
            .with_f64("time", vec![0.0, 1.0])
            .unwrap()
            .with_f64("flux", vec![1.0])
            .unwrap_err();
        assert!(matches!(err, IoError::Validation { .. }));
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn rejects_duplicate_name() {
        let err = Table::new()
            .with_f64("flux", vec![1.0])
            .unwrap()
            .with_f64("flux", vec![2.0])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate column 'flux'"));
    }

    #[test]
    fn from_light_curve() {
        let lc = LightCurve::new(vec![0.0, 1.0], vec![1.0, 0.9], vec![0.1, 0.1]).unwrap();
        let table = Table::try_from(&lc).unwrap();
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.column("flux"), Some(&ColumnData::Float64(vec![1.0, 0.9])));
    }

    #[test]
    fn from_folded_curve() {
        let lc = LightCurve::without_errors(vec![0.0, 0.5, 1.25], vec![1.0, 0.9, 1.0]).unwrap();
        let folded = lc.fold(1.0, 0.0).unwrap();
        let table = Table::try_from(&folded).unwrap();
        assert_eq!(table.num_rows(), Some(3));
        assert_eq!(table.columns()[1].0, "phase_norm");
    }
}
