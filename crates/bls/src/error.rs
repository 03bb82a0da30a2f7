//! Error types for the astra-bls crate.

use std::fmt;

use astra_lightcurve::LightCurveError;

/// Stage of [`crate::search_transit`] that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    /// Building the periodogram.
    Periodogram,
    /// Reading the peak parameters.
    Extraction,
    /// Sampling the transit model.
    Modeling,
    /// Folding data or model.
    Folding,
    /// Measuring the model depth.
    Depth,
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Periodogram => "periodogram",
            Self::Extraction => "parameter extraction",
            Self::Modeling => "transit modeling",
            Self::Folding => "folding",
            Self::Depth => "depth estimation",
        })
    }
}

/// Error type for all fallible operations in the astra-bls crate.
///
/// Covers grid construction, periodogram search, transit modelling and
/// depth estimation. Light-curve errors from folding are passed through
/// unchanged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransitError {
    /// Returned when the periodogram has no usable trial periods.
    #[error("empty periodogram: {reason}")]
    EmptyPeriodogram {
        /// Why no peak could be found.
        reason: String,
    },

    /// Returned when a trial period grid is empty, unsorted or non-positive.
    #[error("invalid period grid: {reason}")]
    InvalidPeriodGrid {
        /// What was wrong.
        reason: String,
    },

    /// Returned when a trial duration grid is empty or non-positive.
    #[error("invalid duration grid: {reason}")]
    InvalidDuration {
        /// What was wrong.
        reason: String,
    },

    /// Returned when the estimated depth is outside `[0, 1)`.
    #[error("implausible transit depth {depth}: {reason}")]
    InvalidDepth {
        /// Depth that was rejected.
        depth: f64,
        /// Why it was rejected.
        reason: String,
    },

    /// Returned when a transit model is requested with too few samples.
    #[error("model resolution {resolution} is too small, need at least {min}")]
    InvalidResolution {
        /// Requested number of samples.
        resolution: usize,
        /// Minimum number of samples.
        min: usize,
    },

    /// Returned when a search parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },

    /// Light-curve error raised while folding or cleaning.
    #[error(transparent)]
    LightCurve(#[from] LightCurveError),

    /// Returned by [`crate::search_transit`]; names the failing stage and
    /// wraps the error it raised.
    #[error("{stage} failed")]
    Stage {
        /// Stage that failed.
        stage: SearchStage,
        /// Error raised by the stage.
        #[source]
        source: Box<TransitError>,
    },
}

impl TransitError {
    /// Wraps `self` as the failure of `stage`.
    pub fn at_stage(self, stage: SearchStage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The failing stage, if this error came from [`crate::search_transit`].
    pub fn stage(&self) -> Option<SearchStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The error underneath any stage wrapper.
    pub fn root(&self) -> &TransitError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}
