//! Trial period and duration grids.

use crate::error::TransitError;

/// Ascending sequence of trial periods (days).
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodGrid {
    periods: Vec<f64>,
}

impl Default for PeriodGrid {
    /// 1000 periods from 0.5 to 2.0 days.
    fn default() -> Self {
        Self {
            periods: linspace(0.5, 2.0, 1000),
        }
    }
}

impl PeriodGrid {
    /// `n` linearly spaced periods from `min` to `max` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`TransitError::InvalidPeriodGrid`] if `n` is zero, `min` is
    /// not positive, `max < min`, or `n > 1` with `min == max`.
    pub fn linspace(min: f64, max: f64, n: usize) -> Result<Self, TransitError> {
        if n == 0 {
            return Err(TransitError::InvalidPeriodGrid {
                reason: "at least one trial period is required".to_string(),
            });
        }
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || max < min {
            return Err(TransitError::InvalidPeriodGrid {
                reason: format!("range [{min}, {max}] must be positive and ascending"),
            });
        }
        Self::from_periods(linspace(min, max, n))
    }

    /// Uses the given periods as-is.
    ///
    /// # Errors
    ///
    /// Returns [`TransitError::InvalidPeriodGrid`] if `periods` is empty,
    /// holds a non-positive or non-finite value, or is not strictly
    /// ascending.
    pub fn from_periods(periods: Vec<f64>) -> Result<Self, TransitError> {
        if periods.is_empty() {
            return Err(TransitError::InvalidPeriodGrid {
                reason: "at least one trial period is required".to_string(),
            });
        }
        if let Some(p) = periods.iter().find(|p| !p.is_finite() || **p <= 0.0) {
            return Err(TransitError::InvalidPeriodGrid {
                reason: format!("periods must be positive and finite, got {p}"),
            });
        }
        if periods.windows(2).any(|w| w[1] <= w[0]) {
            return Err(TransitError::InvalidPeriodGrid {
                reason: "periods must be strictly ascending".to_string(),
            });
        }
        Ok(Self { periods })
    }

    /// The trial periods.
    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    /// Number of trial periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Always `false` for a validated grid.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Trial transit durations (days), sorted ascending.
#[derive(Clone, Debug, PartialEq)]
pub struct DurationGrid {
    durations: Vec<f64>,
}

impl Default for DurationGrid {
    fn default() -> Self {
        Self {
            durations: vec![0.05, 0.10, 0.15, 0.20, 0.25, 0.33],
        }
    }
}

impl DurationGrid {
    /// Creates a grid from the given durations, sorted ascending with
    /// repeats removed.
    ///
    /// # Errors
    ///
    /// Returns [`TransitError::InvalidDuration`] if `durations` is empty or
    /// holds a non-positive or non-finite value.
    pub fn new(mut durations: Vec<f64>) -> Result<Self, TransitError> {
        if durations.is_empty() {
            return Err(TransitError::InvalidDuration {
                reason: "at least one trial duration is required".to_string(),
            });
        }
        if let Some(d) = durations.iter().find(|d| !d.is_finite() || **d <= 0.0) {
            return Err(TransitError::InvalidDuration {
                reason: format!("durations must be positive and finite, got {d}"),
            });
        }
        durations.sort_by(f64::total_cmp);
        durations.dedup();
        Ok(Self { durations })
    }

    /// The trial durations.
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Shortest trial duration.
    pub fn min(&self) -> f64 {
        self.durations.first().copied().unwrap_or(f64::NAN)
    }

    /// Longest trial duration.
    pub fn max(&self) -> f64 {
        self.durations.last().copied().unwrap_or(f64::NAN)
    }
}

fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![min];
    }
    let span = max - min;
    let steps = (n - 1) as f64;
    (0..n).map(|i| min + span * i as f64 / steps).collect()
}
