use approx::assert_abs_diff_eq;
use astra_lightcurve::{
    CleanConfig, LightCurve, LightCurveError, LightCurveSet, SyntheticTransit, clean,
};

fn trended_curve(seed: u64) -> LightCurve {
    SyntheticTransit::new(3000, 0.02)
        .with_baseline(1000.0)
        .with_trend(1e-3, -2e-5)
        .with_noise(0.1)
        .with_seed(seed)
        .generate()
        .unwrap()
}

#[test]
fn clean_removes_trend_and_normalizes() {
    let raw = SyntheticTransit::new(400, 0.02)
        .with_baseline(1000.0)
        .with_trend(0.01, -0.002)
        .generate()
        .unwrap();
    let cleaned = clean(&raw, &CleanConfig::default()).unwrap();
    assert_eq!(cleaned.len(), raw.len());
    for f in cleaned.flux() {
        assert_abs_diff_eq!(*f, 1.0, epsilon = 1e-8);
    }
}

#[test]
fn clean_is_idempotent() {
    let config = CleanConfig::default();
    let once = clean(&trended_curve(1), &config).unwrap();
    let twice = clean(&once, &config).unwrap();

    assert_eq!(once.len(), twice.len());
    assert_eq!(once.time(), twice.time());
    // Re-flattening white noise moves samples by well under the noise
    // level (1e-4).
    for (a, b) in once.flux().iter().zip(twice.flux()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-4);
    }
}

#[test]
fn cleaned_curve_has_unique_finite_samples() {
    let raw = trended_curve(2);
    let mut time = raw.time().to_vec();
    let mut flux = raw.flux().to_vec();
    flux[100] = f64::NAN;
    flux[200] = f64::INFINITY;
    time[301] = time[300];
    flux[500] = 2000.0;
    let raw = LightCurve::without_errors(time, flux).unwrap();

    let cleaned = clean(&raw, &CleanConfig::default()).unwrap();
    assert!(cleaned.flux().iter().all(|f| f.is_finite()));
    assert!(cleaned.time().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(cleaned.len(), raw.len() - 4);
}

#[test]
fn clean_preserves_transit_dip() {
    let raw = SyntheticTransit::new(3000, 0.01)
        .with_start_time(0.005)
        .with_baseline(500.0)
        .with_trend(2e-3, 0.0)
        .with_transit(1.0, 0.25, 0.1, 0.01)
        .with_noise(0.05)
        .generate()
        .unwrap();
    let cleaned = clean(&raw, &CleanConfig::default()).unwrap();
    let folded = cleaned.fold(1.0, 0.25).unwrap();

    let (mut inside, mut n_in) = (0.0, 0);
    for (p, f) in folded.phase().iter().zip(folded.flux()) {
        if p.abs() < 0.04 {
            inside += f;
            n_in += 1;
        }
    }
    assert!(n_in > 0);
    assert_abs_diff_eq!(inside / n_in as f64, 0.99, epsilon = 1e-3);
}

#[test]
fn stitched_quarters_clean_together() {
    let q1 = SyntheticTransit::new(1500, 0.02)
        .with_baseline(800.0)
        .with_noise(0.08)
        .with_seed(5)
        .generate()
        .unwrap();
    let q2 = SyntheticTransit::new(1500, 0.02)
        .with_start_time(35.0)
        .with_baseline(1200.0)
        .with_noise(0.12)
        .with_seed(6)
        .generate()
        .unwrap();
    let stitched = LightCurveSet::new(vec![q2, q1]).stitch().unwrap();
    assert_eq!(stitched.len(), 3000);
    assert_abs_diff_eq!(stitched.time()[0], 0.0);

    let cleaned = clean(&stitched, &CleanConfig::default()).unwrap();
    let median = astra_stats::nan_median(cleaned.flux()).unwrap();
    assert_abs_diff_eq!(median, 1.0, epsilon = 1e-12);
}

#[test]
fn clean_reports_stage_on_failure() {
    let raw = LightCurve::without_errors(vec![0.0, 1.0, 2.0], vec![1.0, f64::NAN, 1.0]).unwrap();
    let err = clean(&raw, &CleanConfig::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "insufficient data after NaN removal: got 2 samples, need at least 10"
    );
    assert!(matches!(err, LightCurveError::InsufficientData { .. }));
}
