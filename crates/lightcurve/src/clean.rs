//! Cleaning stages: NaN removal, outlier clipping, flattening and
//! normalization.
//!
//! Each stage takes a [`LightCurve`] by reference and returns a new one.
//! [`clean`] chains them in the order that keeps deep transits from
//! skewing the trend estimate: outliers first, then detrending, then
//! normalization against the detrended baseline.

use astra_stats::{mad, nan_median, pop_sd};
use tracing::debug;

use crate::curve::LightCurve;
use crate::error::LightCurveError;
use crate::savgol::{effective_window, savgol_filter};

/// Scale factor turning a MAD into a Gaussian-equivalent standard deviation.
const MAD_TO_SIGMA: f64 = 1.4826;

/// Configuration for the cleaning pipeline.
///
/// # Example
///
/// ```
/// use astra_lightcurve::CleanConfig;
///
/// let config = CleanConfig::default()
///     .with_sigma(4.0)
///     .with_window_length(201);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CleanConfig {
    min_samples: usize,
    sigma: f64,
    sigma_lower: Option<f64>,
    sigma_upper: Option<f64>,
    max_iters: usize,
    window_length: usize,
    polyorder: usize,
    niters: usize,
    flatten_sigma: f64,
    break_tolerance: f64,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            sigma: 5.0,
            sigma_lower: None,
            sigma_upper: None,
            max_iters: 5,
            window_length: 101,
            polyorder: 2,
            niters: 3,
            flatten_sigma: 3.0,
            break_tolerance: 5.0,
        }
    }
}

impl CleanConfig {
    /// Sets the minimum number of samples that must survive each stage.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Sets the symmetric outlier threshold in standard deviations.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Overrides the lower outlier threshold.
    pub fn with_sigma_lower(mut self, sigma: f64) -> Self {
        self.sigma_lower = Some(sigma);
        self
    }

    /// Overrides the upper outlier threshold.
    pub fn with_sigma_upper(mut self, sigma: f64) -> Self {
        self.sigma_upper = Some(sigma);
        self
    }

    /// Sets the maximum number of outlier clipping passes.
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Sets the Savitzky–Golay window length in samples (must be odd).
    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    /// Sets the Savitzky–Golay polynomial order.
    pub fn with_polyorder(mut self, polyorder: usize) -> Self {
        self.polyorder = polyorder;
        self
    }

    /// Sets the number of trend re-fitting passes.
    pub fn with_niters(mut self, niters: usize) -> Self {
        self.niters = niters;
        self
    }

    /// Sets the residual clipping threshold used while flattening.
    pub fn with_flatten_sigma(mut self, sigma: f64) -> Self {
        self.flatten_sigma = sigma;
        self
    }

    /// Sets the gap size, in median cadences, that splits the series.
    pub fn with_break_tolerance(mut self, break_tolerance: f64) -> Self {
        self.break_tolerance = break_tolerance;
        self
    }

    /// Minimum samples per stage.
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Lower outlier threshold.
    pub fn sigma_lower(&self) -> f64 {
        self.sigma_lower.unwrap_or(self.sigma)
    }

    /// Upper outlier threshold.
    pub fn sigma_upper(&self) -> f64 {
        self.sigma_upper.unwrap_or(self.sigma)
    }

    /// Maximum clipping passes.
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Savitzky–Golay window length.
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Savitzky–Golay polynomial order.
    pub fn polyorder(&self) -> usize {
        self.polyorder
    }

    /// Trend re-fitting passes.
    pub fn niters(&self) -> usize {
        self.niters
    }

    /// Residual clipping threshold while flattening.
    pub fn flatten_sigma(&self) -> f64 {
        self.flatten_sigma
    }

    /// Gap size (in median cadences) that splits segments.
    pub fn break_tolerance(&self) -> f64 {
        self.break_tolerance
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LightCurveError::InvalidConfig`] when a threshold is not
    /// positive and finite, the window is even or not longer than the
    /// polynomial order, or `niters` is zero.
    pub fn validate(&self) -> Result<(), LightCurveError> {
        let positive = [
            ("sigma_lower", self.sigma_lower()),
            ("sigma_upper", self.sigma_upper()),
            ("flatten_sigma", self.flatten_sigma),
            ("break_tolerance", self.break_tolerance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LightCurveError::InvalidConfig {
                    reason: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }
        if self.window_length % 2 == 0 {
            return Err(LightCurveError::InvalidConfig {
                reason: format!("window_length must be odd, got {}", self.window_length),
            });
        }
        if self.window_length <= self.polyorder {
            return Err(LightCurveError::InvalidConfig {
                reason: format!(
                    "window_length ({}) must exceed polyorder ({})",
                    self.window_length, self.polyorder
                ),
            });
        }
        if self.niters == 0 {
            return Err(LightCurveError::InvalidConfig {
                reason: "niters must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Runs the full cleaning pipeline on a raw light curve.
///
/// NaN removal, outlier removal, flattening and normalization, in that
/// order. The sample count is checked against
/// [`CleanConfig::min_samples`] after every stage that can drop samples.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`LightCurveError::InvalidConfig`] | `config` fails validation |
/// | [`LightCurveError::InsufficientData`] | too few samples survive a stage |
/// | [`LightCurveError::ZeroBaseline`] | the flattened median flux is zero |
#[tracing::instrument(skip_all, fields(n_raw = raw.len()))]
pub fn clean(raw: &LightCurve, config: &CleanConfig) -> Result<LightCurve, LightCurveError> {
    config.validate()?;

    let lc = remove_nans(raw);
    ensure_len(&lc, "NaN removal", config.min_samples)?;

    let lc = remove_outliers(&lc, config.sigma_lower(), config.sigma_upper(), config.max_iters);
    ensure_len(&lc, "outlier removal", config.min_samples)?;

    let lc = flatten(&lc, config)?;
    let lc = normalize(&lc)?;
    debug!(n_clean = lc.len(), "cleaning complete");
    Ok(lc)
}

fn ensure_len(lc: &LightCurve, stage: &'static str, min: usize) -> Result<(), LightCurveError> {
    if lc.len() < min {
        return Err(LightCurveError::InsufficientData {
            stage,
            len: lc.len(),
            min,
        });
    }
    Ok(())
}

/// Drops samples whose time or flux is not finite, and samples that repeat
/// the previous timestamp.
pub fn remove_nans(lc: &LightCurve) -> LightCurve {
    let time = lc.time();
    let flux = lc.flux();
    let mut keep = vec![false; lc.len()];
    let mut last_kept: Option<f64> = None;
    for i in 0..lc.len() {
        if !time[i].is_finite() || !flux[i].is_finite() {
            continue;
        }
        if last_kept == Some(time[i]) {
            continue;
        }
        keep[i] = true;
        last_kept = Some(time[i]);
    }
    let out = lc.select_unchecked(&keep);
    debug!(removed = lc.len() - out.len(), "removed invalid samples");
    out
}

/// Iterative sigma clipping about the median.
///
/// Returns a keep-mask. Each pass recomputes the median and population
/// standard deviation of the kept values and rejects values outside
/// `[median - lower * std, median + upper * std]`. Stops when a pass
/// rejects nothing or after `max_iters` passes. Non-finite values are
/// always rejected.
pub fn sigma_clip_mask(values: &[f64], lower: f64, upper: f64, max_iters: usize) -> Vec<bool> {
    let mut keep: Vec<bool> = values.iter().map(|v| v.is_finite()).collect();
    for _ in 0..max_iters {
        let kept: Vec<f64> = values
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(v, _)| *v)
            .collect();
        let Some(centre) = nan_median(&kept) else {
            break;
        };
        let std = pop_sd(&kept);
        let lo = centre - lower * std;
        let hi = centre + upper * std;

        let mut changed = false;
        for (k, &v) in keep.iter_mut().zip(values) {
            if *k && (v < lo || v > hi) {
                *k = false;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    keep
}

/// Removes flux outliers by iterative sigma clipping.
pub fn remove_outliers(lc: &LightCurve, sigma_lower: f64, sigma_upper: f64, max_iters: usize) -> LightCurve {
    let keep = sigma_clip_mask(lc.flux(), sigma_lower, sigma_upper, max_iters);
    let out = lc.select_unchecked(&keep);
    debug!(removed = lc.len() - out.len(), "removed outliers");
    out
}

/// Splits a time-ascending series into `[start, end)` segments at gaps
/// longer than `break_tolerance` times the median cadence.
pub(crate) fn split_on_gaps(time: &[f64], break_tolerance: f64) -> Vec<(usize, usize)> {
    if time.is_empty() {
        return Vec::new();
    }
    let dts: Vec<f64> = time
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|dt| dt.is_finite() && *dt > 0.0)
        .collect();
    let Some(cadence) = nan_median(&dts) else {
        return vec![(0, time.len())];
    };
    let threshold = cadence * break_tolerance;

    let mut bounds = Vec::new();
    let mut start = 0;
    for i in 1..time.len() {
        if time[i] - time[i - 1] > threshold {
            bounds.push((start, i));
            start = i;
        }
    }
    bounds.push((start, time.len()));
    bounds
}

/// Removes long-term trends by dividing by a Savitzky–Golay trend.
///
/// The trend is fitted per gap-separated segment over the samples that
/// are still unmasked, then re-fitted `niters` times; after each pass,
/// samples whose residual exceeds `flatten_sigma` robust standard
/// deviations are masked and receive a linearly interpolated trend.
///
/// # Errors
///
/// Returns [`LightCurveError::InvalidConfig`] if `config` fails validation.
#[tracing::instrument(skip_all, fields(n = lc.len(), window = config.window_length))]
pub fn flatten(lc: &LightCurve, config: &CleanConfig) -> Result<LightCurve, LightCurveError> {
    config.validate()?;
    let time = lc.time();
    let flux = lc.flux();
    let n = lc.len();

    let segments = split_on_gaps(time, config.break_tolerance);
    let mut mask = vec![true; n];
    let mut trend = vec![1.0; n];

    for pass in 0..config.niters {
        for &(s, e) in &segments {
            fit_segment_trend(
                &time[s..e],
                &flux[s..e],
                &mask[s..e],
                config,
                &mut trend[s..e],
            );
        }

        let residual: Vec<f64> = flux.iter().zip(&trend).map(|(f, t)| f - t).collect();
        let Some(spread) = mad(&residual).map(|m| m * MAD_TO_SIGMA) else {
            break;
        };
        if spread <= 0.0 {
            break;
        }
        let limit = config.flatten_sigma * spread;
        let mut masked = 0usize;
        for (m, r) in mask.iter_mut().zip(&residual) {
            if *m && r.abs() > limit {
                *m = false;
                masked += 1;
            }
        }
        debug!(pass, masked, "flatten pass");
    }

    let flat: Vec<f64> = flux.iter().zip(&trend).map(|(f, t)| f / t).collect();
    let flat_err: Vec<f64> = lc
        .flux_err()
        .iter()
        .zip(&trend)
        .map(|(e, t)| e / t)
        .collect();
    Ok(lc.with_flux(flat, flat_err))
}

/// Fits one segment's trend into `out`.
fn fit_segment_trend(
    time: &[f64],
    flux: &[f64],
    mask: &[bool],
    config: &CleanConfig,
    out: &mut [f64],
) {
    let mut idx: Vec<usize> = (0..time.len()).filter(|&i| mask[i]).collect();
    if idx.len() <= config.polyorder {
        idx = (0..time.len()).collect();
    }

    let window = effective_window(config.window_length, idx.len());
    if window < config.window_length {
        debug!(
            segment_len = idx.len(),
            window, "flatten window clamped to segment length"
        );
    }

    let ts: Vec<f64> = idx.iter().map(|&i| time[i]).collect();
    let ys: Vec<f64> = idx.iter().map(|&i| flux[i]).collect();
    let fitted = savgol_filter(&ts, &ys, config.window_length, config.polyorder);

    // Interpolate the fitted trend onto every sample of the segment.
    let mut cursor = 0usize;
    for (k, slot) in out.iter_mut().enumerate() {
        let t = time[k];
        while cursor + 1 < idx.len() && time[idx[cursor + 1]] <= t {
            cursor += 1;
        }
        let (i0, v0) = (idx[cursor], fitted[cursor]);
        *slot = if cursor + 1 < idx.len() && time[i0] < t {
            let (i1, v1) = (idx[cursor + 1], fitted[cursor + 1]);
            let frac = (t - time[i0]) / (time[i1] - time[i0]);
            v0 + frac * (v1 - v0)
        } else {
            v0
        };
    }
}

/// Divides flux and uncertainties by the median flux so the baseline is 1.0.
///
/// # Errors
///
/// Returns [`LightCurveError::ZeroBaseline`] if the median of the finite
/// flux values is zero, non-finite, or absent.
pub fn normalize(lc: &LightCurve) -> Result<LightCurve, LightCurveError> {
    let median = nan_median(lc.flux()).unwrap_or(f64::NAN);
    if !median.is_finite() || median == 0.0 {
        return Err(LightCurveError::ZeroBaseline { median });
    }
    let flux = lc.flux().iter().map(|f| f / median).collect();
    let flux_err = lc.flux_err().iter().map(|e| e / median).collect();
    Ok(lc.with_flux(flux, flux_err))
}
