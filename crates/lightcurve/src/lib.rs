//! Light-curve handling for the Astra transit search.
//!
//! This crate owns the time-series side of the pipeline: the
//! [`LightCurve`] container, stitching of per-quarter curves, the cleaning
//! stages, phase folding and a few derived statistics.
//!
//! # Pipeline
//!
//! ```text
//!  ┌────────────┐   ┌─────────────┐   ┌──────────┐   ┌───────────┐
//!  │ remove_nans │──▶│ remove_     │──▶│ flatten  │──▶│ normalize │
//!  │             │   │ outliers    │   │ (SavGol) │   │ (median)  │
//!  └────────────┘   └─────────────┘   └──────────┘   └───────────┘
//! ```
//!
//! # Quick start
//!
//! ```
//! use astra_lightcurve::{CleanConfig, SyntheticTransit, clean};
//!
//! let raw = SyntheticTransit::new(2000, 0.02)
//!     .with_baseline(5000.0)
//!     .with_trend(1e-3, -1e-5)
//!     .with_noise(0.5)
//!     .generate()?;
//! let cleaned = clean(&raw, &CleanConfig::default())?;
//! let folded = cleaned.fold(1.0, 0.0)?;
//! assert_eq!(folded.len(), cleaned.len());
//! # Ok::<(), astra_lightcurve::LightCurveError>(())
//! ```

mod clean;
mod curve;
mod error;
mod fold;
mod savgol;
mod set;
mod summary;
mod synthetic;

pub use clean::{CleanConfig, clean, flatten, normalize, remove_nans, remove_outliers, sigma_clip_mask};
pub use curve::LightCurve;
pub use error::LightCurveError;
pub use fold::{FoldedCurve, phase_of};
pub use set::LightCurveSet;
pub use summary::{CdppConfig, FluxSummary, estimate_cdpp};
pub use synthetic::SyntheticTransit;
