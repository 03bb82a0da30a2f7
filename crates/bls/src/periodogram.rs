//! Box Least Squares periodogram.
//!
//! For every trial period the light curve is folded onto a grid of phase
//! bins, and a two-level box (in-transit and out-of-transit flux) is
//! fitted at every bin offset and trial duration using cumulative sums.
//! The best box per period is kept.

use astra_lightcurve::{LightCurve, LightCurveError};
use astra_stats::argmax;
use tracing::{debug, warn};

use crate::error::TransitError;
use crate::grid::{DurationGrid, PeriodGrid};

/// Quantity maximized over durations and phases at each trial period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Objective {
    /// Log-likelihood improvement of the box over a constant.
    #[default]
    Likelihood,
    /// Depth divided by its uncertainty.
    Snr,
}

/// Configuration for [`build_periodogram`].
///
/// # Example
///
/// ```
/// use astra_bls::{BlsConfig, DurationGrid, Objective};
///
/// let config = BlsConfig::default()
///     .with_durations(DurationGrid::new(vec![0.08, 0.12]).unwrap())
///     .with_oversample(5)
///     .with_objective(Objective::Snr);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BlsConfig {
    durations: DurationGrid,
    oversample: usize,
    objective: Objective,
}

impl Default for BlsConfig {
    fn default() -> Self {
        Self {
            durations: DurationGrid::default(),
            oversample: 10,
            objective: Objective::Likelihood,
        }
    }
}

impl BlsConfig {
    /// Sets the trial durations.
    pub fn with_durations(mut self, durations: DurationGrid) -> Self {
        self.durations = durations;
        self
    }

    /// Sets the number of phase bins per shortest duration.
    pub fn with_oversample(mut self, oversample: usize) -> Self {
        self.oversample = oversample;
        self
    }

    /// Sets the objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Trial durations.
    pub fn durations(&self) -> &DurationGrid {
        &self.durations
    }

    /// Phase bins per shortest duration.
    pub fn oversample(&self) -> usize {
        self.oversample
    }

    /// Objective.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Largest phase bin width in days. Each trial period is tiled by equal
    /// bins no wider than this.
    pub fn bin_width(&self) -> f64 {
        self.durations.min() / self.oversample as f64
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransitError::InvalidConfig`] if `oversample` is zero.
    pub fn validate(&self) -> Result<(), TransitError> {
        if self.oversample == 0 {
            return Err(TransitError::InvalidConfig {
                reason: "oversample must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Best box fit at one trial period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodogramEntry {
    /// Trial period.
    pub period: f64,
    /// Objective value of the best box (0 when no dip was found).
    pub power: f64,
    /// Duration of the best box.
    pub duration: f64,
    /// Mid-transit time of the best box, within one period of the first sample.
    pub transit_time: f64,
    /// Out-of-transit minus in-transit flux.
    pub depth: f64,
    /// Uncertainty of `depth` (NaN when no dip was found).
    pub depth_err: f64,
    /// Weighted mean flux inside the box.
    pub in_level: f64,
    /// Weighted mean flux outside the box.
    pub out_level: f64,
}

/// Power as a function of trial period.
#[derive(Clone, Debug, PartialEq)]
pub struct Periodogram {
    entries: Vec<PeriodogramEntry>,
    objective: Objective,
}

impl Periodogram {
    /// Creates a periodogram from precomputed entries.
    pub fn from_entries(entries: Vec<PeriodogramEntry>, objective: Objective) -> Self {
        Self { entries, objective }
    }

    /// One entry per trial period, in grid order.
    pub fn entries(&self) -> &[PeriodogramEntry] {
        &self.entries
    }

    /// Trial periods.
    pub fn periods(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.period).collect()
    }

    /// Power per trial period.
    pub fn powers(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.power).collect()
    }

    /// Objective the powers were computed with.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Number of trial periods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no trial periods.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the maximum finite power; ties go to the earliest entry.
    ///
    /// # Errors
    ///
    /// Returns [`TransitError::EmptyPeriodogram`] if there are no entries or
    /// no power is finite.
    pub fn peak_index(&self) -> Result<usize, TransitError> {
        if self.entries.is_empty() {
            return Err(TransitError::EmptyPeriodogram {
                reason: "no trial periods".to_string(),
            });
        }
        argmax(&self.powers()).ok_or_else(|| TransitError::EmptyPeriodogram {
            reason: "no finite power".to_string(),
        })
    }

    /// Entry at the maximum power.
    ///
    /// # Errors
    ///
    /// See [`Periodogram::peak_index`].
    pub fn peak(&self) -> Result<&PeriodogramEntry, TransitError> {
        let idx = self.peak_index()?;
        Ok(&self.entries[idx])
    }
}

/// Computes the BLS periodogram of `lc` over `periods`.
///
/// Flux is weighted by `1 / flux_err²` when every uncertainty is positive
/// and finite, and uniformly otherwise. Durations not shorter than a trial
/// period are skipped at that period. Transit times are reported relative
/// to the first sample, in `[t0, t0 + period)`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`TransitError::InvalidConfig`] | `config` fails validation |
/// | [`TransitError::LightCurve`] | fewer than two finite samples |
#[tracing::instrument(skip_all, fields(n = lc.len(), n_periods = periods.len()))]
pub fn build_periodogram(
    lc: &LightCurve,
    periods: &PeriodGrid,
    config: &BlsConfig,
) -> Result<Periodogram, TransitError> {
    config.validate()?;
    let data = WeightedSeries::from_curve(lc)?;
    let bin_width = config.bin_width();
    debug!(bin_width, t_ref = data.t_ref, "binned search setup");

    let mut scratch = BinScratch::default();
    let entries: Vec<PeriodogramEntry> = periods
        .periods()
        .iter()
        .map(|&period| best_box(&data, period, bin_width, config, &mut scratch))
        .collect();

    let n_flat = entries.iter().filter(|e| e.power == 0.0).count();
    if n_flat == entries.len() {
        warn!("no trial period produced a flux dip");
    }
    Ok(Periodogram::from_entries(entries, config.objective))
}

/// Mean-subtracted flux with inverse-variance weights.
struct WeightedSeries {
    /// Time relative to `t_ref`.
    t: Vec<f64>,
    /// Flux minus the weighted mean.
    y: Vec<f64>,
    w: Vec<f64>,
    total_weight: f64,
    t_ref: f64,
    y_ref: f64,
}

impl WeightedSeries {
    fn from_curve(lc: &LightCurve) -> Result<Self, TransitError> {
        let use_errors = lc.has_errors();
        let mut t = Vec::with_capacity(lc.len());
        let mut y = Vec::with_capacity(lc.len());
        let mut w = Vec::with_capacity(lc.len());
        for ((&ti, &fi), &ei) in lc.time().iter().zip(lc.flux()).zip(lc.flux_err()) {
            if !ti.is_finite() || !fi.is_finite() {
                continue;
            }
            t.push(ti);
            y.push(fi);
            w.push(if use_errors { 1.0 / (ei * ei) } else { 1.0 });
        }
        if t.len() < 2 {
            return Err(LightCurveError::InsufficientData {
                stage: "periodogram input",
                len: t.len(),
                min: 2,
            }
            .into());
        }

        let total_weight: f64 = w.iter().sum();
        let y_ref = y.iter().zip(&w).map(|(yi, wi)| yi * wi).sum::<f64>() / total_weight;
        let t_ref = t[0];
        for ti in &mut t {
            *ti -= t_ref;
        }
        for yi in &mut y {
            *yi -= y_ref;
        }
        Ok(Self {
            t,
            y,
            w,
            total_weight,
            t_ref,
            y_ref,
        })
    }
}

/// Reused per-period bin buffers.
#[derive(Default)]
struct BinScratch {
    cum_w: Vec<f64>,
    cum_wy: Vec<f64>,
}

impl BinScratch {
    /// Bins the series at `period` and fills doubled cumulative sums so
    /// windows can wrap past the last bin.
    ///
    /// The period is tiled by equal bins no wider than `max_width`; returns
    /// the bin count and the actual bin width.
    fn fill(&mut self, data: &WeightedSeries, period: f64, max_width: f64) -> (usize, f64) {
        let n_bins = ((period / max_width).ceil() as usize).max(1);
        let bin_width = period / n_bins as f64;
        let mut w_bins = vec![0.0; n_bins];
        let mut wy_bins = vec![0.0; n_bins];
        for ((&t, &y), &w) in data.t.iter().zip(&data.y).zip(&data.w) {
            let phase = t.rem_euclid(period);
            let b = ((phase / bin_width) as usize).min(n_bins - 1);
            w_bins[b] += w;
            wy_bins[b] += w * y;
        }

        self.cum_w.clear();
        self.cum_wy.clear();
        self.cum_w.push(0.0);
        self.cum_wy.push(0.0);
        for k in 0..2 * n_bins {
            let b = k % n_bins;
            let (last_w, last_wy) = (self.cum_w[k], self.cum_wy[k]);
            self.cum_w.push(last_w + w_bins[b]);
            self.cum_wy.push(last_wy + wy_bins[b]);
        }
        (n_bins, bin_width)
    }
}

fn best_box(
    data: &WeightedSeries,
    period: f64,
    max_bin_width: f64,
    config: &BlsConfig,
    scratch: &mut BinScratch,
) -> PeriodogramEntry {
    let (n_bins, bin_width) = scratch.fill(data, period, max_bin_width);
    let mut best = PeriodogramEntry {
        period,
        power: 0.0,
        duration: config.durations.min(),
        transit_time: data.t_ref,
        depth: 0.0,
        depth_err: f64::NAN,
        in_level: data.y_ref,
        out_level: data.y_ref,
    };

    for &duration in config.durations.durations() {
        if duration >= period {
            continue;
        }
        let width = ((duration / bin_width).round() as usize).clamp(1, n_bins);
        if width >= n_bins {
            continue;
        }
        for start in 0..n_bins {
            let w_in = scratch.cum_w[start + width] - scratch.cum_w[start];
            let w_out = data.total_weight - w_in;
            if w_in <= 0.0 || w_out <= 0.0 {
                continue;
            }
            let wy_in = scratch.cum_wy[start + width] - scratch.cum_wy[start];
            // The weighted flux sums to zero, so the outside sum is -wy_in.
            let y_in = wy_in / w_in;
            let y_out = -wy_in / w_out;
            if y_out <= y_in {
                continue;
            }
            let depth = y_out - y_in;
            let depth_err = (1.0 / w_in + 1.0 / w_out).sqrt();
            let power = match config.objective {
                Objective::Likelihood => 0.5 * depth * depth * w_in * w_out / (w_in + w_out),
                Objective::Snr => depth / depth_err,
            };
            if power > best.power {
                let centre = (start as f64 + 0.5 * width as f64) * bin_width;
                best = PeriodogramEntry {
                    period,
                    power,
                    duration,
                    transit_time: data.t_ref + centre.rem_euclid(period),
                    depth,
                    depth_err,
                    in_level: y_in + data.y_ref,
                    out_level: y_out + data.y_ref,
                };
            }
        }
    }
    best
}
