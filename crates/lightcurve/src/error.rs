//! Error types for the astra-lightcurve crate.

/// Error type for all fallible operations in the astra-lightcurve crate.
///
/// Covers construction mismatches, cleaning failures and invalid folding
/// parameters.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LightCurveError {
    /// Returned when a cleaning stage leaves too few usable samples.
    #[error("insufficient data after {stage}: got {len} samples, need at least {min}")]
    InsufficientData {
        /// Stage that produced the short curve.
        stage: &'static str,
        /// Number of samples left.
        len: usize,
        /// Minimum number of samples required.
        min: usize,
    },

    /// Returned when parallel columns have different lengths.
    #[error("length mismatch for '{field}': expected {expected}, got {got}")]
    LengthMismatch {
        /// Name of the offending column.
        field: String,
        /// Expected length (length of `time`).
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a fold is requested with an unusable period or epoch.
    #[error("cannot fold with period {period} and epoch {epoch}")]
    InvalidFold {
        /// Requested folding period.
        period: f64,
        /// Requested epoch time.
        epoch: f64,
    },

    /// Returned when the normalization divisor is zero or non-finite.
    #[error("cannot normalize: baseline flux is {median}")]
    ZeroBaseline {
        /// Median flux that was rejected.
        median: f64,
    },

    /// Returned when stitching an empty set of light curves.
    #[error("light-curve set is empty")]
    EmptySet,

    /// Returned when a configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_insufficient_data() {
        let err = LightCurveError::InsufficientData {
            stage: "outlier removal",
            len: 4,
            min: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data after outlier removal: got 4 samples, need at least 10"
        );
    }

    #[test]
    fn error_length_mismatch() {
        let err = LightCurveError::LengthMismatch {
            field: "flux".into(),
            expected: 5,
            got: 4,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch for 'flux': expected 5, got 4"
        );
    }

    #[test]
    fn error_invalid_fold() {
        let err = LightCurveError::InvalidFold {
            period: 0.0,
            epoch: 1.5,
        };
        assert_eq!(err.to_string(), "cannot fold with period 0 and epoch 1.5");
    }

    #[test]
    fn error_zero_baseline() {
        let err = LightCurveError::ZeroBaseline { median: 0.0 };
        assert_eq!(err.to_string(), "cannot normalize: baseline flux is 0");
    }

    #[test]
    fn error_empty_set() {
        assert_eq!(LightCurveError::EmptySet.to_string(), "light-curve set is empty");
    }

    #[test]
    fn error_invalid_config() {
        let err = LightCurveError::InvalidConfig {
            reason: "window_length must be odd".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: window_length must be odd"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<LightCurveError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<LightCurveError>();
    }
}
