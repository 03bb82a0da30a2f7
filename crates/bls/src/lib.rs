//! Box Least Squares transit search for the Astra pipeline.
//!
//! Takes a cleaned [`astra_lightcurve::LightCurve`] through the search
//! stages: periodogram, peak extraction, box model, folding and depth.
//!
//! # Pipeline
//!
//! ```text
//!  ┌─────────────────┐   ┌────────────────────┐   ┌──────────────┐   ┌────────────────┐
//!  │ build_periodogram│──▶│ extract_parameters │──▶│ TransitModel │──▶│ estimate_depth │
//!  │ (period × phase) │   │ (peak of power)    │   │ (fold)       │   │ (argmin scan)  │
//!  └─────────────────┘   └────────────────────┘   └──────────────┘   └────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```
//! use astra_bls::{SearchConfig, search_transit};
//! use astra_lightcurve::SyntheticTransit;
//!
//! let lc = SyntheticTransit::new(2000, 0.01)
//!     .with_start_time(0.005)
//!     .with_transit(1.0, 0.25, 0.1, 0.01)
//!     .with_noise(1e-4)
//!     .generate()?;
//! let report = search_transit(&lc, &SearchConfig::default())?;
//! assert!((report.params.period - 1.0).abs() < 0.01);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod depth;
mod error;
mod extract;
mod grid;
mod model;
mod periodogram;
mod search;

pub use depth::estimate_depth;
pub use error::{SearchStage, TransitError};
pub use extract::{TransitParameters, extract_parameters};
pub use grid::{DurationGrid, PeriodGrid};
pub use model::TransitModel;
pub use periodogram::{BlsConfig, Objective, Periodogram, PeriodogramEntry, build_periodogram};
pub use search::{SearchConfig, TransitReport, search_transit};
