//! Savitzky–Golay smoothing used by the flattening stage.
//!
//! The filter is evaluated as a moving least-squares polynomial in time
//! rather than as a fixed convolution. On evenly spaced samples this is the
//! classic filter; when the flattening stage masks samples out, the fit
//! still sees their true spacing.

use astra_stats::{polyfit, polyval};

/// Largest odd window that fits in `n` samples, capped at `window`.
pub(crate) fn effective_window(window: usize, n: usize) -> usize {
    let w = window.min(n);
    if w % 2 == 0 { w.saturating_sub(1) } else { w }
}

/// Smooths `y` (sampled at ascending `t`) with a Savitzky–Golay filter.
///
/// The window is shrunk to the largest odd length that fits, and the
/// polynomial order is lowered to stay below the window length. Samples in
/// the first and last half-window are evaluated on the polynomial fitted to
/// the first and last full window respectively.
pub(crate) fn savgol_filter(t: &[f64], y: &[f64], window: usize, polyorder: usize) -> Vec<f64> {
    let n = y.len();
    let w = effective_window(window, n);
    if w <= 1 {
        return y.to_vec();
    }
    let order = polyorder.min(w - 1);
    let half = w / 2;

    let mut out = Vec::with_capacity(n);
    let mut x = vec![0.0; w];
    for k in 0..n {
        let start = k.saturating_sub(half).min(n - w);
        let tc = t[k];
        let scale = t[start..start + w]
            .iter()
            .map(|ti| (ti - tc).abs())
            .fold(0.0_f64, f64::max);
        let scale = if scale > 0.0 { scale } else { 1.0 };
        for (xi, ti) in x.iter_mut().zip(&t[start..start + w]) {
            *xi = (ti - tc) / scale;
        }
        let value = match polyfit(&x, &y[start..start + w], order) {
            Some(coeffs) => polyval(&coeffs, 0.0),
            None => y[k],
        };
        out.push(value);
    }
    out
}
