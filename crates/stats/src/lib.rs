//! Statistical helper functions for the Astra transit search.
//!
//! Everything here works on plain `&[f64]` slices so the higher-level crates
//! can share one implementation of medians, spreads and scans.

use std::cmp::Ordering;

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Population standard deviation (N denominator, numpy's default `ddof=0`).
/// Returns 0.0 if empty.
pub fn pop_sd(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    (data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / data.len() as f64).sqrt()
}

/// Median of pre-sorted data. For even length, averages the middle two values.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn median(sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "median: input must not be empty");
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Median of unsorted data, ignoring non-finite values.
///
/// Returns `None` when no finite value is present.
pub fn nan_median(data: &[f64]) -> Option<f64> {
    let mut finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    Some(median(&finite))
}

/// Median absolute deviation about the median (constant = 1), ignoring
/// non-finite values.
pub fn mad(data: &[f64]) -> Option<f64> {
    let med = nan_median(data)?;
    let devs: Vec<f64> = data
        .iter()
        .filter(|x| x.is_finite())
        .map(|&x| (x - med).abs())
        .collect();
    nan_median(&devs)
}

/// Index of the smallest finite value. Ties resolve to the first occurrence.
pub fn argmin(data: &[f64]) -> Option<usize> {
    scan_extreme(data, Ordering::Less)
}

/// Index of the largest finite value. Ties resolve to the first occurrence.
pub fn argmax(data: &[f64]) -> Option<usize> {
    scan_extreme(data, Ordering::Greater)
}

fn scan_extreme(data: &[f64], want: Ordering) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in data.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            None => best = Some(i),
            Some(b) => {
                if v.partial_cmp(&data[b]) == Some(want) {
                    best = Some(i);
                }
            }
        }
    }
    best
}

/// Least-squares polynomial fit of degree `order`.
///
/// Returns coefficients lowest power first, or `None` if there are fewer
/// points than coefficients or the normal equations are singular.
pub fn polyfit(x: &[f64], y: &[f64], order: usize) -> Option<Vec<f64>> {
    let m = order + 1;
    if x.len() != y.len() || x.len() < m {
        return None;
    }

    // Normal equations: (V^T V) c = V^T y
    let mut a = vec![vec![0.0; m]; m];
    let mut b = vec![0.0; m];
    for (&xi, &yi) in x.iter().zip(y) {
        let mut powers = vec![1.0; 2 * m - 1];
        for k in 1..powers.len() {
            powers[k] = powers[k - 1] * xi;
        }
        for r in 0..m {
            b[r] += powers[r] * yi;
            for c in 0..m {
                a[r][c] += powers[r + c];
            }
        }
    }

    solve_linear(a, b)
}

/// Evaluates a polynomial (coefficients lowest power first) at `x`.
pub fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Gaussian elimination with partial pivoting for a small dense system.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-300 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut out = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * out[k]).sum();
        out[row] = (b[row] - tail) / a[row][row];
    }
    if out.iter().all(|c| c.is_finite()) {
        Some(out)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_pop_sd() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(pop_sd(&data), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_median_odd_even() {
        assert_relative_eq!(median(&[1.0, 2.0, 3.0]), 2.0, epsilon = 1e-6);
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-6);
    }

    #[test]
    #[should_panic(expected = "median: input must not be empty")]
    fn test_median_empty_panics() {
        median(&[]);
    }

    #[test]
    fn test_nan_median_skips_nan() {
        let m = nan_median(&[3.0, f64::NAN, 1.0, 2.0, f64::INFINITY]);
        assert_relative_eq!(m.unwrap(), 2.0);
    }

    #[test]
    fn test_nan_median_all_nan() {
        assert!(nan_median(&[f64::NAN, f64::NAN]).is_none());
        assert!(nan_median(&[]).is_none());
    }

    #[test]
    fn test_mad() {
        // median = 2, |dev| = [1, 1, 0, 0, 2, 4, 7] -> median 1
        let data = [1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];
        assert_relative_eq!(mad(&data).unwrap(), 1.0);
    }

    #[test]
    fn test_argmin_first_occurrence() {
        assert_eq!(argmin(&[3.0, 1.0, 2.0, 1.0]), Some(1));
    }

    #[test]
    fn test_argmax_first_occurrence_skips_nan() {
        assert_eq!(argmax(&[f64::NAN, 5.0, 2.0, 5.0]), Some(1));
    }

    #[test]
    fn test_arg_scans_empty_or_nan() {
        assert_eq!(argmin(&[]), None);
        assert_eq!(argmax(&[f64::NAN]), None);
    }

    #[test]
    fn test_polyfit_exact_quadratic() {
        let x: Vec<f64> = (0..7).map(|i| i as f64 - 3.0).collect();
        let y: Vec<f64> = x.iter().map(|&v| 2.0 - 0.5 * v + 0.25 * v * v).collect();
        let c = polyfit(&x, &y, 2).unwrap();
        assert_relative_eq!(c[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(c[1], -0.5, epsilon = 1e-10);
        assert_relative_eq!(c[2], 0.25, epsilon = 1e-10);
        assert_relative_eq!(polyval(&c, 10.0), 2.0 - 5.0 + 25.0, epsilon = 1e-8);
    }

    #[test]
    fn test_polyfit_underdetermined() {
        assert!(polyfit(&[1.0, 2.0], &[1.0, 2.0], 2).is_none());
    }

    #[test]
    fn test_polyfit_singular() {
        // All x identical: Vandermonde columns are collinear.
        assert!(polyfit(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 1).is_none());
    }
}
