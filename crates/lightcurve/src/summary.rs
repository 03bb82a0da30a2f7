//! Flux statistics and CDPP noise estimate.

use astra_stats::{mean, nan_median, pop_sd};
use tracing::debug;

use crate::clean::{CleanConfig, flatten, normalize, remove_nans, remove_outliers};
use crate::curve::LightCurve;
use crate::error::LightCurveError;

/// Configuration for [`estimate_cdpp`].
///
/// Defaults: 13-cadence running mean (about 6.5 hours at Kepler long
/// cadence), Savitzky–Golay window 101 with polyorder 2, 5σ clipping.
#[derive(Clone, Debug, PartialEq)]
pub struct CdppConfig {
    transit_duration: usize,
    savgol_window: usize,
    savgol_polyorder: usize,
    sigma: f64,
}

impl Default for CdppConfig {
    fn default() -> Self {
        Self {
            transit_duration: 13,
            savgol_window: 101,
            savgol_polyorder: 2,
            sigma: 5.0,
        }
    }
}

impl CdppConfig {
    /// Sets the running-mean length in cadences.
    pub fn with_transit_duration(mut self, cadences: usize) -> Self {
        self.transit_duration = cadences;
        self
    }

    /// Sets the flattening window length (odd).
    pub fn with_savgol_window(mut self, window: usize) -> Self {
        self.savgol_window = window;
        self
    }

    /// Sets the flattening polynomial order.
    pub fn with_savgol_polyorder(mut self, polyorder: usize) -> Self {
        self.savgol_polyorder = polyorder;
        self
    }

    /// Sets the outlier clipping threshold.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Running-mean length in cadences.
    pub fn transit_duration(&self) -> usize {
        self.transit_duration
    }

    /// Flattening window length.
    pub fn savgol_window(&self) -> usize {
        self.savgol_window
    }

    /// Flattening polynomial order.
    pub fn savgol_polyorder(&self) -> usize {
        self.savgol_polyorder
    }

    /// Outlier clipping threshold.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LightCurveError::InvalidConfig`] if `transit_duration` is
    /// zero or the flattening parameters are rejected by
    /// [`CleanConfig::validate`].
    pub fn validate(&self) -> Result<(), LightCurveError> {
        if self.transit_duration == 0 {
            return Err(LightCurveError::InvalidConfig {
                reason: "transit_duration must be at least 1 cadence".to_string(),
            });
        }
        self.flatten_config().validate()
    }

    fn flatten_config(&self) -> CleanConfig {
        CleanConfig::default()
            .with_window_length(self.savgol_window)
            .with_polyorder(self.savgol_polyorder)
            .with_sigma(self.sigma)
    }
}

/// Scalar statistics of a light curve's flux.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluxSummary {
    /// Number of samples with finite flux.
    pub n_samples: usize,
    /// Mean flux.
    pub mean: f64,
    /// Population standard deviation of the flux.
    pub std: f64,
    /// Median flux.
    pub median: f64,
    /// Combined differential photometric precision in ppm.
    pub cdpp_ppm: f64,
}

impl LightCurve {
    /// Computes mean, standard deviation, median and CDPP of the flux.
    ///
    /// Non-finite flux values are ignored.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`estimate_cdpp`].
    pub fn summary(&self, config: &CdppConfig) -> Result<FluxSummary, LightCurveError> {
        let finite: Vec<f64> = self.flux().iter().copied().filter(|f| f.is_finite()).collect();
        let cdpp_ppm = estimate_cdpp(self, config)?;
        Ok(FluxSummary {
            n_samples: finite.len(),
            mean: mean(&finite),
            std: pop_sd(&finite),
            median: nan_median(&finite).unwrap_or(f64::NAN),
            cdpp_ppm,
        })
    }
}

/// Estimates the CDPP of `lc` in parts per million.
///
/// The curve is normalized, flattened and sigma-clipped; the result is the
/// standard deviation of a running mean over `transit_duration` cadences.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LightCurveError::InvalidConfig`] | `config` fails validation |
/// | [`LightCurveError::ZeroBaseline`] | the median flux is zero |
/// | [`LightCurveError::InsufficientData`] | fewer samples than `transit_duration` remain |
#[tracing::instrument(skip_all, fields(n = lc.len(), transit_duration = config.transit_duration))]
pub fn estimate_cdpp(lc: &LightCurve, config: &CdppConfig) -> Result<f64, LightCurveError> {
    config.validate()?;
    let flatten_config = config.flatten_config();

    let lc = normalize(&remove_nans(lc))?;
    let lc = flatten(&lc, &flatten_config)?;
    let lc = remove_outliers(&lc, config.sigma, config.sigma, flatten_config.max_iters());
    if lc.len() < config.transit_duration {
        return Err(LightCurveError::InsufficientData {
            stage: "CDPP estimation",
            len: lc.len(),
            min: config.transit_duration,
        });
    }

    let means = running_mean(lc.flux(), config.transit_duration);
    let cdpp = pop_sd(&means) * 1e6;
    debug!(cdpp_ppm = cdpp, "estimated CDPP");
    Ok(cdpp)
}

/// Mean over each full window of `window` consecutive values.
fn running_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    let w = window as f64;
    let mut sum: f64 = values[..window].iter().sum();
    let mut out = Vec::with_capacity(values.len() - window + 1);
    out.push(sum / w);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out.push(sum / w);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::SyntheticTransit;
    use approx::assert_relative_eq;

    #[test]
    fn running_mean_valid_mode() {
        let out = running_mean(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(out, vec![1.5, 2.5, 3.5]);
        assert!(running_mean(&[1.0], 2).is_empty());
    }

    #[test]
    fn cdpp_of_white_noise() {
        let noise = 1e-3;
        let lc = SyntheticTransit::new(5000, 0.02)
            .with_noise(noise)
            .with_seed(7)
            .generate()
            .unwrap();
        let cdpp = estimate_cdpp(&lc, &CdppConfig::default()).unwrap();
        let expected = noise / 13f64.sqrt() * 1e6;
        assert_relative_eq!(cdpp, expected, max_relative = 0.15);
    }

    #[test]
    fn cdpp_needs_enough_samples() {
        let lc = LightCurve::without_errors(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 1.0]).unwrap();
        assert!(matches!(
            estimate_cdpp(&lc, &CdppConfig::default()),
            Err(LightCurveError::InsufficientData { min: 13, .. })
        ));
    }

    #[test]
    fn cdpp_config_validation() {
        assert!(CdppConfig::default().validate().is_ok());
        assert!(CdppConfig::default().with_transit_duration(0).validate().is_err());
        assert!(CdppConfig::default().with_savgol_window(100).validate().is_err());
    }

    #[test]
    fn summary_ignores_nan_flux() {
        let base = SyntheticTransit::new(2000, 0.02)
            .with_baseline(2.0)
            .with_noise(1e-3)
            .with_seed(11)
            .generate()
            .unwrap();
        let mut flux = base.flux().to_vec();
        flux[5] = f64::NAN;
        let lc = LightCurve::new(base.time().to_vec(), flux, base.flux_err().to_vec()).unwrap();
        let s = lc.summary(&CdppConfig::default()).unwrap();
        assert_eq!(s.n_samples, 1999);
        assert_relative_eq!(s.mean, 2.0, epsilon = 1e-3);
        assert_relative_eq!(s.median, 2.0, epsilon = 1e-3);
        assert_relative_eq!(s.std, 1e-3, max_relative = 0.1);
        assert!(s.cdpp_ppm > 0.0);
    }
}
