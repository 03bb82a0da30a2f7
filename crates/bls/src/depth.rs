//! Relative transit depth of a folded model.

use astra_lightcurve::FoldedCurve;
use astra_stats::{argmax, argmin};
use tracing::{debug, warn};

use crate::error::TransitError;

/// Depths below zero by less than this are treated as zero.
const NEGATIVE_TOLERANCE: f64 = 1e-9;

/// Computes the relative depth `(F - f) / F` of a folded model.
///
/// `F` is the flux of the sample farthest from phase 0 (the out-of-transit
/// baseline) and `f` the minimum flux, located by scanning the folded flux
/// so the result does not depend on the model resolution. Ties go to the
/// earliest sample in phase order. Negative depths within numerical noise
/// are reported as 0.
///
/// # Errors
///
/// Returns [`TransitError::InvalidDepth`] if the curve is empty, the
/// baseline is not positive, or the depth is non-finite, negative or at
/// least 1.
pub fn estimate_depth(folded: &FoldedCurve) -> Result<f64, TransitError> {
    let invalid = |depth: f64, reason: &str| TransitError::InvalidDepth {
        depth,
        reason: reason.to_string(),
    };

    let distance: Vec<f64> = folded.phase().iter().map(|p| p.abs()).collect();
    let baseline_idx =
        argmax(&distance).ok_or_else(|| invalid(f64::NAN, "folded model has no samples"))?;
    let min_idx =
        argmin(folded.flux()).ok_or_else(|| invalid(f64::NAN, "folded model has no finite flux"))?;

    let baseline = folded.flux()[baseline_idx];
    let minimum = folded.flux()[min_idx];
    if !baseline.is_finite() || baseline <= 0.0 {
        return Err(invalid(f64::NAN, &format!("baseline flux {baseline} is not positive")));
    }

    let depth = (baseline - minimum) / baseline;
    debug!(
        baseline,
        minimum,
        min_phase = folded.phase()[min_idx],
        depth,
        "estimated depth"
    );
    if !depth.is_finite() {
        return Err(invalid(depth, "depth is not finite"));
    }
    if depth < -NEGATIVE_TOLERANCE {
        return Err(invalid(depth, "model minimum lies above the baseline"));
    }
    if depth >= 1.0 {
        warn!(depth, "transit depth reaches zero flux");
        return Err(invalid(depth, "depth must be below 1"));
    }
    Ok(depth.max(0.0))
}
