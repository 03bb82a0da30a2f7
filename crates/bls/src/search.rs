//! End-to-end transit search on a cleaned light curve.

use astra_lightcurve::{FoldedCurve, LightCurve};
use tracing::debug;

use crate::depth::estimate_depth;
use crate::error::{SearchStage, TransitError};
use crate::extract::{TransitParameters, extract_parameters};
use crate::grid::PeriodGrid;
use crate::model::TransitModel;
use crate::periodogram::{BlsConfig, Periodogram, build_periodogram};

/// Configuration for [`search_transit`].
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    periods: PeriodGrid,
    bls: BlsConfig,
    model_resolution: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            periods: PeriodGrid::default(),
            bls: BlsConfig::default(),
            model_resolution: 5000,
        }
    }
}

impl SearchConfig {
    /// Sets the trial periods.
    pub fn with_periods(mut self, periods: PeriodGrid) -> Self {
        self.periods = periods;
        self
    }

    /// Sets the periodogram configuration.
    pub fn with_bls(mut self, bls: BlsConfig) -> Self {
        self.bls = bls;
        self
    }

    /// Sets the number of samples in the transit model.
    pub fn with_model_resolution(mut self, resolution: usize) -> Self {
        self.model_resolution = resolution;
        self
    }

    /// Trial periods.
    pub fn periods(&self) -> &PeriodGrid {
        &self.periods
    }

    /// Periodogram configuration.
    pub fn bls(&self) -> &BlsConfig {
        &self.bls
    }

    /// Number of samples in the transit model.
    pub fn model_resolution(&self) -> usize {
        self.model_resolution
    }
}

/// Everything produced by one transit search.
#[derive(Clone, Debug)]
pub struct TransitReport {
    /// Power per trial period.
    pub periodogram: Periodogram,
    /// Best-fit box at the periodogram peak.
    pub params: TransitParameters,
    /// Model sampled over one period.
    pub model: TransitModel,
    /// Data folded at the best period and transit time.
    pub folded_data: FoldedCurve,
    /// Model folded the same way.
    pub folded_model: FoldedCurve,
    /// Relative depth from the folded model.
    pub depth: f64,
}

/// Builds the periodogram, extracts the peak, models and folds the transit
/// and measures its depth.
///
/// Every stage fails fast; the first error is returned.
///
/// # Errors
///
/// Returns [`TransitError::Stage`] naming the failing stage and wrapping
/// the error of [`build_periodogram`], [`extract_parameters`],
/// [`TransitModel::on_grid`], the fold, or [`estimate_depth`].
#[tracing::instrument(skip_all, fields(n = lc.len()))]
pub fn search_transit(lc: &LightCurve, config: &SearchConfig) -> Result<TransitReport, TransitError> {
    let periodogram = build_periodogram(lc, &config.periods, &config.bls)
        .map_err(|e| e.at_stage(SearchStage::Periodogram))?;
    let params =
        extract_parameters(&periodogram).map_err(|e| e.at_stage(SearchStage::Extraction))?;
    let model = TransitModel::on_grid(&params, config.model_resolution)
        .map_err(|e| e.at_stage(SearchStage::Modeling))?;
    let folded_model = model.fold().map_err(|e| e.at_stage(SearchStage::Folding))?;
    let folded_data = lc
        .fold(params.period, params.transit_time)
        .map_err(|e| TransitError::from(e).at_stage(SearchStage::Folding))?;
    let depth = estimate_depth(&folded_model).map_err(|e| e.at_stage(SearchStage::Depth))?;

    debug!(
        period = params.period,
        transit_time = params.transit_time,
        duration = params.duration,
        depth,
        "transit search complete"
    );
    Ok(TransitReport {
        periodogram,
        params,
        model,
        folded_data,
        folded_model,
        depth,
    })
}
