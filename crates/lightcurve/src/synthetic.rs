//! Synthetic light curves with injected box transits.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::curve::LightCurve;
use crate::error::LightCurveError;
use crate::fold::phase_of;

/// A box-shaped transit to inject.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Injection {
    period: f64,
    epoch: f64,
    duration: f64,
    depth: f64,
}

/// Builder for an evenly sampled synthetic light curve.
///
/// The flux at time `t` is
/// `baseline * (1 + a·dt + b·dt²) * (1 - depth·in_transit(t)) + noise`,
/// where `dt = t - start_time`, `in_transit` is 1 within half a duration
/// of a transit centre, and the noise is Gaussian with standard deviation
/// `noise` (absolute flux units). Uncertainties are set to `noise`.
///
/// # Example
///
/// ```
/// use astra_lightcurve::SyntheticTransit;
///
/// let lc = SyntheticTransit::new(3000, 0.01)
///     .with_transit(1.0, 0.25, 0.1, 0.01)
///     .with_noise(2e-4)
///     .with_seed(42)
///     .generate()
///     .unwrap();
///
/// assert_eq!(lc.len(), 3000);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticTransit {
    n_samples: usize,
    cadence: f64,
    start_time: f64,
    baseline: f64,
    noise: f64,
    trend: (f64, f64),
    transit: Option<Injection>,
    seed: u64,
}

impl SyntheticTransit {
    /// Creates a noiseless flat curve of `n_samples` at `cadence` days.
    pub fn new(n_samples: usize, cadence: f64) -> Self {
        Self {
            n_samples,
            cadence,
            start_time: 0.0,
            baseline: 1.0,
            noise: 0.0,
            trend: (0.0, 0.0),
            transit: None,
            seed: 42,
        }
    }

    /// Sets the first timestamp.
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sets the out-of-transit flux level.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the Gaussian noise standard deviation.
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Multiplies the baseline by `1 + linear·dt + quadratic·dt²`.
    pub fn with_trend(mut self, linear: f64, quadratic: f64) -> Self {
        self.trend = (linear, quadratic);
        self
    }

    /// Injects a box transit.
    pub fn with_transit(mut self, period: f64, epoch: f64, duration: f64, depth: f64) -> Self {
        self.transit = Some(Injection {
            period,
            epoch,
            duration,
            depth,
        });
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LightCurveError::InvalidConfig`] if the cadence is not
    /// positive, the noise is negative or non-finite, or the transit has a
    /// non-positive period, a duration outside `(0, period)` or a depth
    /// outside `[0, 1)`.
    pub fn validate(&self) -> Result<(), LightCurveError> {
        let invalid = |reason: String| Err(LightCurveError::InvalidConfig { reason });
        if !self.cadence.is_finite() || self.cadence <= 0.0 {
            return invalid(format!("cadence must be positive, got {}", self.cadence));
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return invalid(format!("noise must be non-negative, got {}", self.noise));
        }
        if !self.baseline.is_finite() || !self.start_time.is_finite() {
            return invalid("baseline and start_time must be finite".to_string());
        }
        if let Some(t) = self.transit {
            if !t.period.is_finite() || t.period <= 0.0 || !t.epoch.is_finite() {
                return invalid(format!("invalid transit period {} or epoch {}", t.period, t.epoch));
            }
            if !(t.duration > 0.0 && t.duration < t.period) {
                return invalid(format!(
                    "transit duration {} must lie in (0, {})",
                    t.duration, t.period
                ));
            }
            if !(0.0..1.0).contains(&t.depth) {
                return invalid(format!("transit depth {} must lie in [0, 1)", t.depth));
            }
        }
        Ok(())
    }

    /// Generates the light curve.
    ///
    /// # Errors
    ///
    /// Returns [`LightCurveError::InvalidConfig`] if validation fails.
    pub fn generate(&self) -> Result<LightCurve, LightCurveError> {
        self.validate()?;
        let normal = Normal::new(0.0, self.noise).map_err(|e| LightCurveError::InvalidConfig {
            reason: format!("noise distribution: {e}"),
        })?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let (a, b) = self.trend;

        let mut time = Vec::with_capacity(self.n_samples);
        let mut flux = Vec::with_capacity(self.n_samples);
        let mut in_transit = 0usize;
        for i in 0..self.n_samples {
            let dt = i as f64 * self.cadence;
            let t = self.start_time + dt;
            let mut level = self.baseline * (1.0 + a * dt + b * dt * dt);
            if let Some(inj) = self.transit
                && phase_of(t, inj.period, inj.epoch).abs() < 0.5 * inj.duration
            {
                level *= 1.0 - inj.depth;
                in_transit += 1;
            }
            time.push(t);
            flux.push(level + normal.sample(&mut rng));
        }
        debug!(n = self.n_samples, in_transit, "generated synthetic light curve");
        LightCurve::new(time, flux, vec![self.noise; self.n_samples])
    }
}
