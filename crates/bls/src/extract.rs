//! Peak parameters of a periodogram.

use tracing::debug;

use crate::error::TransitError;
use crate::periodogram::Periodogram;

/// Box-transit parameters at the periodogram peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitParameters {
    /// Orbital period (days).
    pub period: f64,
    /// Mid-transit time (days).
    pub transit_time: f64,
    /// Transit duration (days).
    pub duration: f64,
    /// Out-of-transit minus in-transit flux.
    pub depth: f64,
    /// Flux inside the transit window.
    pub in_level: f64,
    /// Flux outside the transit window.
    pub out_level: f64,
    /// Periodogram power at the peak.
    pub power: f64,
}

impl TransitParameters {
    /// Parameters for a box of the given shape, with baseline 1.0 and
    /// in-transit level `1 - depth`.
    pub fn new(period: f64, transit_time: f64, duration: f64, depth: f64) -> Self {
        Self {
            period,
            transit_time,
            duration,
            depth,
            in_level: 1.0 - depth,
            out_level: 1.0,
            power: f64::NAN,
        }
    }

    /// Validates the box shape.
    ///
    /// # Errors
    ///
    /// Returns [`TransitError::InvalidConfig`] if the period is not positive,
    /// the duration is outside `(0, period)`, or the transit time or a flux
    /// level is not finite.
    pub fn validate(&self) -> Result<(), TransitError> {
        if !self.period.is_finite() || self.period <= 0.0 {
            return Err(TransitError::InvalidConfig {
                reason: format!("period must be positive, got {}", self.period),
            });
        }
        if !(self.duration > 0.0 && self.duration < self.period) {
            return Err(TransitError::InvalidConfig {
                reason: format!(
                    "duration {} must lie in (0, {})",
                    self.duration, self.period
                ),
            });
        }
        let finite = [self.transit_time, self.in_level, self.out_level];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(TransitError::InvalidConfig {
                reason: "transit time and flux levels must be finite".to_string(),
            });
        }
        Ok(())
    }
}

impl Periodogram {
    /// Period at the maximum power.
    ///
    /// # Errors
    ///
    /// See [`Periodogram::peak_index`].
    pub fn period_at_max_power(&self) -> Result<f64, TransitError> {
        Ok(self.peak()?.period)
    }

    /// Mid-transit time at the maximum power.
    ///
    /// # Errors
    ///
    /// See [`Periodogram::peak_index`].
    pub fn transit_time_at_max_power(&self) -> Result<f64, TransitError> {
        Ok(self.peak()?.transit_time)
    }

    /// Duration at the maximum power.
    ///
    /// # Errors
    ///
    /// See [`Periodogram::peak_index`].
    pub fn duration_at_max_power(&self) -> Result<f64, TransitError> {
        Ok(self.peak()?.duration)
    }
}

/// Reads the best-fit box off the periodogram peak.
///
/// # Errors
///
/// Returns [`TransitError::EmptyPeriodogram`] if the periodogram has no
/// entries or no finite power.
pub fn extract_parameters(periodogram: &Periodogram) -> Result<TransitParameters, TransitError> {
    let peak = periodogram.peak()?;
    let params = TransitParameters {
        period: peak.period,
        transit_time: peak.transit_time,
        duration: peak.duration,
        depth: peak.depth,
        in_level: peak.in_level,
        out_level: peak.out_level,
        power: peak.power,
    };
    debug!(
        period = params.period,
        transit_time = params.transit_time,
        duration = params.duration,
        power = params.power,
        "periodogram peak"
    );
    Ok(params)
}
