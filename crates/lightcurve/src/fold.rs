//! Phase folding.

use crate::curve::LightCurve;
use crate::error::LightCurveError;

/// A light curve re-indexed by orbital phase.
///
/// Phases are in time units (days) within `[-period / 2, period / 2)`,
/// with the epoch at phase 0, and the samples are sorted by phase.
#[derive(Clone, Debug, PartialEq)]
pub struct FoldedCurve {
    phase: Vec<f64>,
    flux: Vec<f64>,
    flux_err: Vec<f64>,
    period: f64,
    epoch: f64,
}

/// Phase of `time` for the given `period` and `epoch`, in `[-period / 2, period / 2)`.
pub fn phase_of(time: f64, period: f64, epoch: f64) -> f64 {
    let half = 0.5 * period;
    let mut phase = (time - epoch + half).rem_euclid(period) - half;
    // rem_euclid can round up to exactly `period` for tiny negative inputs.
    if phase >= half {
        phase -= period;
    }
    phase
}

impl LightCurve {
    /// Folds the curve at `period`, placing `epoch_time` at phase 0.
    ///
    /// # Errors
    ///
    /// Returns [`LightCurveError::InvalidFold`] if `period` is not positive
    /// and finite or `epoch_time` is not finite.
    pub fn fold(&self, period: f64, epoch_time: f64) -> Result<FoldedCurve, LightCurveError> {
        if !period.is_finite() || period <= 0.0 || !epoch_time.is_finite() {
            return Err(LightCurveError::InvalidFold {
                period,
                epoch: epoch_time,
            });
        }

        let raw: Vec<f64> = self
            .time()
            .iter()
            .map(|&t| phase_of(t, period, epoch_time))
            .collect();
        let mut order: Vec<usize> = (0..raw.len()).collect();
        order.sort_by(|&a, &b| raw[a].total_cmp(&raw[b]));

        Ok(FoldedCurve {
            phase: order.iter().map(|&i| raw[i]).collect(),
            flux: order.iter().map(|&i| self.flux()[i]).collect(),
            flux_err: order.iter().map(|&i| self.flux_err()[i]).collect(),
            period,
            epoch: epoch_time,
        })
    }
}

impl FoldedCurve {
    /// Phase of each sample in time units.
    pub fn phase(&self) -> &[f64] {
        &self.phase
    }

    /// Flux values in phase order.
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Flux uncertainties in phase order.
    pub fn flux_err(&self) -> &[f64] {
        &self.flux_err
    }

    /// Folding period.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Epoch placed at phase 0.
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.phase.len()
    }

    /// Returns `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.phase.is_empty()
    }

    /// Phase as a fraction of the period, in `[-0.5, 0.5)`.
    pub fn normalized_phase(&self) -> Vec<f64> {
        self.phase
            .iter()
            .map(|p| (p / self.period).clamp(-0.5, 0.5 - f64::EPSILON))
            .collect()
    }

    /// Averages the flux in `n_bins` equal-width phase bins.
    ///
    /// Bin phases are the bin centres; uncertainties are the standard error
    /// of the mean (NaN for single-sample bins). Empty bins are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LightCurveError::InvalidConfig`] if `n_bins` is zero.
    pub fn bin(&self, n_bins: usize) -> Result<FoldedCurve, LightCurveError> {
        if n_bins == 0 {
            return Err(LightCurveError::InvalidConfig {
                reason: "n_bins must be at least 1".to_string(),
            });
        }

        let width = self.period / n_bins as f64;
        let half = 0.5 * self.period;
        let mut sum = vec![0.0; n_bins];
        let mut sum_sq = vec![0.0; n_bins];
        let mut count = vec![0usize; n_bins];
        for (&p, &f) in self.phase.iter().zip(&self.flux) {
            if !f.is_finite() {
                continue;
            }
            let b = (((p + half) / width).floor() as usize).min(n_bins - 1);
            sum[b] += f;
            sum_sq[b] += f * f;
            count[b] += 1;
        }

        let mut phase = Vec::new();
        let mut flux = Vec::new();
        let mut flux_err = Vec::new();
        for b in 0..n_bins {
            if count[b] == 0 {
                continue;
            }
            let n = count[b] as f64;
            let m = sum[b] / n;
            let err = if count[b] > 1 {
                let var = ((sum_sq[b] - n * m * m) / (n - 1.0)).max(0.0);
                (var / n).sqrt()
            } else {
                f64::NAN
            };
            phase.push(-half + (b as f64 + 0.5) * width);
            flux.push(m);
            flux_err.push(err);
        }

        Ok(FoldedCurve {
            phase,
            flux,
            flux_err,
            period: self.period,
            epoch: self.epoch,
        })
    }
}
