//! Collections of light curves and stitching.

use tracing::debug;

use crate::clean::normalize;
use crate::curve::LightCurve;
use crate::error::LightCurveError;

/// An ordered collection of light curves for one target, typically one
/// per observing quarter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightCurveSet {
    curves: Vec<LightCurve>,
}

impl LightCurveSet {
    /// Creates a set from curves in the given order.
    pub fn new(curves: Vec<LightCurve>) -> Self {
        Self { curves }
    }

    /// Appends a curve.
    pub fn push(&mut self, curve: LightCurve) {
        self.curves.push(curve);
    }

    /// Number of curves in the set.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns `true` if the set holds no curves.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// The member curves.
    pub fn curves(&self) -> &[LightCurve] {
        &self.curves
    }

    /// Iterates over the member curves.
    pub fn iter(&self) -> std::slice::Iter<'_, LightCurve> {
        self.curves.iter()
    }

    /// Joins the members into one time-ascending curve.
    ///
    /// Each member is normalized by its own median first so that quarters
    /// with different absolute flux levels line up. Overlapping timestamps
    /// keep the first sample in time order.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`LightCurveError::EmptySet`] | the set has no curves |
    /// | [`LightCurveError::ZeroBaseline`] | a member has no usable median flux |
    pub fn stitch(&self) -> Result<LightCurve, LightCurveError> {
        if self.curves.is_empty() {
            return Err(LightCurveError::EmptySet);
        }
        let normalized: Vec<LightCurve> = self
            .curves
            .iter()
            .map(normalize)
            .collect::<Result<_, _>>()?;
        let joined = LightCurve::concat(&normalized);
        let stitched = drop_duplicate_times(&joined);
        debug!(
            n_members = self.curves.len(),
            n_samples = stitched.len(),
            "stitched light curves"
        );
        Ok(stitched)
    }
}

impl<'a> IntoIterator for &'a LightCurveSet {
    type Item = &'a LightCurve;
    type IntoIter = std::slice::Iter<'a, LightCurve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

/// Drops repeated timestamps, keeping the first.
///
/// NaN-flux samples are kept; the cleaning stages remove them later.
fn drop_duplicate_times(lc: &LightCurve) -> LightCurve {
    let time = lc.time();
    let keep: Vec<bool> = (0..lc.len())
        .map(|i| i == 0 || time[i] != time[i - 1])
        .collect();
    if keep.iter().all(|k| *k) {
        return lc.clone();
    }
    lc.select_unchecked(&keep)
}
