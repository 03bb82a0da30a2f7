//! Error types for astra-io.

use std::path::PathBuf;

use astra_lightcurve::LightCurveError;

/// Error type for all fallible operations in the astra-io crate.
///
/// Covers archive lookups, Parquet and Arrow failures, schema validation
/// problems and malformed tables.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when the archive holds no light curves for a target.
    #[error("no light curves for target '{target}': {reason}")]
    TargetNotFound {
        /// Target name as requested.
        target: String,
        /// What the lookup found instead.
        reason: String,
    },

    /// Returned when an archive directory cannot be listed.
    #[error("cannot read archive directory {}: {reason}", path.display())]
    Archive {
        /// Directory that was inspected.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required column is not present in a file.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Light-curve construction error while loading.
    #[error(transparent)]
    LightCurve(#[from] LightCurveError),
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.parquet"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.parquet");
    }

    #[test]
    fn display_target_not_found() {
        let err = IoError::TargetNotFound {
            target: "Kepler-17".to_string(),
            reason: "no files match cadence long".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no light curves for target 'Kepler-17': no files match cadence long"
        );
    }

    #[test]
    fn display_archive() {
        let err = IoError::Archive {
            path: PathBuf::from("/data/kepler_17"),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot read archive directory /data/kepler_17: permission denied"
        );
    }

    #[test]
    fn display_parquet() {
        let err = IoError::Parquet {
            reason: "corrupt footer".to_string(),
        };
        assert_eq!(err.to_string(), "parquet error: corrupt footer");
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "column 'time' is Int64; column 'flux' is Utf8".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "2 validation error(s): column 'time' is Int64; column 'flux' is Utf8"
        );
    }

    #[test]
    fn display_missing_column() {
        let err = IoError::MissingColumn {
            name: "flux".to_string(),
            path: PathBuf::from("/data/q01.parquet"),
        };
        assert_eq!(err.to_string(), "column 'flux' not found in /data/q01.parquet");
    }

    #[test]
    fn light_curve_error_is_transparent() {
        let err: IoError = LightCurveError::EmptySet.into();
        assert_eq!(err.to_string(), "light-curve set is empty");
    }

    #[test]
    fn from_parquet_error() {
        let pq_err = parquet::errors::ParquetError::General("test pq error".to_string());
        let err: IoError = pq_err.into();
        assert!(matches!(err, IoError::Parquet { .. }));
        assert!(err.to_string().contains("test pq error"));
    }

    #[test]
    fn from_arrow_error() {
        let arrow_err = arrow::error::ArrowError::SchemaError("bad schema".to_string());
        let err: IoError = arrow_err.into();
        assert!(matches!(err, IoError::Parquet { .. }));
        assert!(err.to_string().contains("bad schema"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
