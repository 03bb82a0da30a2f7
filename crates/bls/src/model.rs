//! Synthetic box-transit model.

use astra_lightcurve::{FoldedCurve, LightCurve, phase_of};

use crate::error::TransitError;
use crate::extract::TransitParameters;

/// Smallest grid accepted by [`TransitModel::on_grid`].
const MIN_RESOLUTION: usize = 3;

/// A box-shaped model flux curve.
///
/// The flux is `out_level` outside the window of half-width
/// `duration / 2` around each transit centre and `in_level` inside it.
/// The model is an ordinary [`LightCurve`], so it folds exactly like data.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitModel {
    params: TransitParameters,
    curve: LightCurve,
}

impl TransitModel {
    /// Samples the model at `resolution` evenly spaced times spanning one
    /// period centred on the transit time.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`TransitError::InvalidResolution`] | `resolution` below 3 |
    /// | [`TransitError::InvalidConfig`] | `params` fail validation |
    pub fn on_grid(params: &TransitParameters, resolution: usize) -> Result<Self, TransitError> {
        if resolution < MIN_RESOLUTION {
            return Err(TransitError::InvalidResolution {
                resolution,
                min: MIN_RESOLUTION,
            });
        }
        params.validate()?;
        let start = params.transit_time - 0.5 * params.period;
        let step = params.period / resolution as f64;
        let times: Vec<f64> = (0..resolution).map(|i| start + i as f64 * step).collect();
        Self::build(params, times)
    }

    /// Samples the model at the given times (for example the data's own
    /// timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`TransitError::InvalidConfig`] if `params` fail validation.
    pub fn at_times(params: &TransitParameters, times: &[f64]) -> Result<Self, TransitError> {
        params.validate()?;
        Self::build(params, times.to_vec())
    }

    fn build(params: &TransitParameters, times: Vec<f64>) -> Result<Self, TransitError> {
        let flux = times.iter().map(|&t| box_flux(params, t)).collect();
        let curve = LightCurve::without_errors(times, flux)?;
        Ok(Self {
            params: *params,
            curve,
        })
    }

    /// Parameters the model was built from.
    pub fn params(&self) -> &TransitParameters {
        &self.params
    }

    /// The model flux as a light curve.
    pub fn curve(&self) -> &LightCurve {
        &self.curve
    }

    /// Folds the model at its own period and transit time.
    ///
    /// # Errors
    ///
    /// Returns [`TransitError::LightCurve`] if the fold parameters are
    /// rejected.
    pub fn fold(&self) -> Result<FoldedCurve, TransitError> {
        Ok(self.curve.fold(self.params.period, self.params.transit_time)?)
    }
}

fn box_flux(params: &TransitParameters, t: f64) -> f64 {
    let phase = phase_of(t, params.period, params.transit_time);
    if phase.abs() < 0.5 * params.duration {
        params.in_level
    } else {
        params.out_level
    }
}
