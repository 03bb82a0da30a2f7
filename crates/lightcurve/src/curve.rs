//! Time-ordered light-curve container.

use crate::error::LightCurveError;

/// An ordered sequence of `(time, flux, flux_err)` samples.
///
/// Construction sorts the samples by time (stable), so every `LightCurve`
/// is time-ascending. Raw curves may still carry NaN flux or time; the
/// cleaning stages produce new curves where every sample is finite.
/// Missing uncertainties are stored as NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
    flux_err: Vec<f64>,
}

impl LightCurve {
    /// Creates a light curve from parallel columns.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LightCurveError::LengthMismatch`] | `flux` or `flux_err` length differs from `time` |
    pub fn new(time: Vec<f64>, flux: Vec<f64>, flux_err: Vec<f64>) -> Result<Self, LightCurveError> {
        let n = time.len();
        for (len, field) in [(flux.len(), "flux"), (flux_err.len(), "flux_err")] {
            if len != n {
                return Err(LightCurveError::LengthMismatch {
                    field: field.to_string(),
                    expected: n,
                    got: len,
                });
            }
        }

        let sorted = time.windows(2).all(|w| w[0].total_cmp(&w[1]).is_le());
        if sorted {
            return Ok(Self {
                time,
                flux,
                flux_err,
            });
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| time[a].total_cmp(&time[b]));
        Ok(Self {
            time: order.iter().map(|&i| time[i]).collect(),
            flux: order.iter().map(|&i| flux[i]).collect(),
            flux_err: order.iter().map(|&i| flux_err[i]).collect(),
        })
    }

    /// Creates a light curve without uncertainties (`flux_err` is NaN).
    pub fn without_errors(time: Vec<f64>, flux: Vec<f64>) -> Result<Self, LightCurveError> {
        let flux_err = vec![f64::NAN; time.len()];
        Self::new(time, flux, flux_err)
    }

    /// Sample timestamps (days).
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Flux values.
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Flux uncertainties (NaN where unknown).
    pub fn flux_err(&self) -> &[f64] {
        &self.flux_err
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns `true` if the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns `true` if every uncertainty is finite and strictly positive.
    pub fn has_errors(&self) -> bool {
        !self.flux_err.is_empty() && self.flux_err.iter().all(|&e| e.is_finite() && e > 0.0)
    }

    /// First and last timestamp, or `None` for an empty curve.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        Some((*self.time.first()?, *self.time.last()?))
    }

    /// Keeps the samples whose `keep` entry is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`LightCurveError::LengthMismatch`] if `keep` is not as long
    /// as the curve.
    pub fn select(&self, keep: &[bool]) -> Result<Self, LightCurveError> {
        if keep.len() != self.len() {
            return Err(LightCurveError::LengthMismatch {
                field: "mask".to_string(),
                expected: self.len(),
                got: keep.len(),
            });
        }
        Ok(self.select_unchecked(keep))
    }

    pub(crate) fn select_unchecked(&self, keep: &[bool]) -> Self {
        let pick = |col: &[f64]| -> Vec<f64> {
            col.iter()
                .zip(keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| *v)
                .collect()
        };
        Self {
            time: pick(&self.time),
            flux: pick(&self.flux),
            flux_err: pick(&self.flux_err),
        }
    }

    /// Returns a copy with the flux columns replaced, keeping the timestamps.
    pub(crate) fn with_flux(&self, flux: Vec<f64>, flux_err: Vec<f64>) -> Self {
        debug_assert_eq!(flux.len(), self.len());
        debug_assert_eq!(flux_err.len(), self.len());
        Self {
            time: self.time.clone(),
            flux,
            flux_err,
        }
    }

    /// Concatenates curves and re-sorts by time.
    pub(crate) fn concat(parts: &[LightCurve]) -> Self {
        let total = parts.iter().map(LightCurve::len).sum();
        let mut time = Vec::with_capacity(total);
        let mut flux = Vec::with_capacity(total);
        let mut flux_err = Vec::with_capacity(total);
        for p in parts {
            time.extend_from_slice(&p.time);
            flux.extend_from_slice(&p.flux);
            flux_err.extend_from_slice(&p.flux_err);
        }
        // Lengths match by construction.
        let mut order: Vec<usize> = (0..total).collect();
        order.sort_by(|&a, &b| time[a].total_cmp(&time[b]));
        Self {
            time: order.iter().map(|&i| time[i]).collect(),
            flux: order.iter().map(|&i| flux[i]).collect(),
            flux_err: order.iter().map(|&i| flux_err[i]).collect(),
        }
    }
}
