//! JSON reports written by the CLI.

use serde::Serialize;

use astra_bls::{Objective, TransitParameters};
use astra_lightcurve::FluxSummary;

/// Flux statistics of one light curve.
#[derive(Debug, Serialize)]
pub struct FluxReport {
    pub n_samples: usize,
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub cdpp_ppm: f64,
}

impl From<&FluxSummary> for FluxReport {
    fn from(s: &FluxSummary) -> Self {
        Self {
            n_samples: s.n_samples,
            mean: s.mean,
            std: s.std,
            median: s.median,
            cdpp_ppm: s.cdpp_ppm,
        }
    }
}

/// Best-fit box at the periodogram peak.
#[derive(Debug, Serialize)]
pub struct TransitJson {
    pub period: f64,
    pub transit_time: f64,
    pub duration: f64,
    pub box_depth: f64,
    pub in_level: f64,
    pub out_level: f64,
    pub power: f64,
    pub objective: &'static str,
}

impl TransitJson {
    pub fn new(params: &TransitParameters, objective: Objective) -> Self {
        Self {
            period: params.period,
            transit_time: params.transit_time,
            duration: params.duration,
            box_depth: params.depth,
            in_level: params.in_level,
            out_level: params.out_level,
            power: params.power,
            objective: match objective {
                Objective::Likelihood => "likelihood",
                Objective::Snr => "snr",
            },
        }
    }
}

/// Output of `astra summary`.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub target: String,
    pub filters: String,
    /// One entry per loaded quarter, in load order.
    pub quarters: Vec<FluxReport>,
    /// The stitched, median-normalized curve.
    pub stitched: FluxReport,
}

/// Output of `astra analyze`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub target: String,
    pub filters: String,
    pub n_quarters: usize,
    pub n_raw: usize,
    pub n_cleaned: usize,
    pub summary: FluxReport,
    pub transit: TransitJson,
    /// Relative depth of the folded model.
    pub depth: f64,
    /// Parquet tables written next to this report.
    pub tables: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transit_json_names_objective() {
        let params = TransitParameters::new(1.0, 0.3, 0.1, 0.01);
        let json = serde_json::to_value(TransitJson::new(&params, Objective::Snr)).unwrap();
        assert_eq!(json["objective"], "snr");
        assert_eq!(json["period"], 1.0);
        assert_eq!(json["out_level"], 1.0);
        // NaN power serializes as null.
        assert!(json["power"].is_null());
    }
}
