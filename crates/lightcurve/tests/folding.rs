use approx::assert_abs_diff_eq;
use astra_lightcurve::{LightCurve, SyntheticTransit, phase_of};

fn irregular_times(n: usize) -> Vec<f64> {
    // Deterministic, unevenly spaced timestamps over about 40 days.
    (0..n)
        .map(|i| {
            let x = i as f64;
            x * 0.0417 + 0.013 * (x * 1.7).sin()
        })
        .collect()
}

#[test]
fn folding_is_periodic() {
    for &period in &[0.5, 1.0, 1.337, 2.0] {
        for &t in &irregular_times(200) {
            let a = phase_of(t, period, 0.3);
            let b = phase_of(t + period, period, 0.3);
            let wrapped = (a - b).abs();
            // Equal, or on opposite edges of the half-open interval.
            assert!(
                wrapped < 1e-9 || (wrapped - period).abs() < 1e-9,
                "period {period}, t {t}: {a} vs {b}"
            );
        }
    }
}

#[test]
fn folded_phases_sorted_and_bounded() {
    let time = irregular_times(1000);
    let flux: Vec<f64> = time.iter().map(|t| 1.0 + 0.01 * t.sin()).collect();
    let lc = LightCurve::without_errors(time, flux).unwrap();

    for &(period, epoch) in &[(0.73, 0.0), (1.0, 12.4), (2.0, -3.1)] {
        let folded = lc.fold(period, epoch).unwrap();
        assert_eq!(folded.len(), lc.len());
        assert!(folded.phase().windows(2).all(|w| w[0] <= w[1]));
        for &p in folded.phase() {
            assert!(p >= -period / 2.0 && p < period / 2.0, "phase {p} outside period {period}");
        }
        for p in folded.normalized_phase() {
            assert!((-0.5..0.5).contains(&p));
        }
    }
}

#[test]
fn fold_stacks_transits_at_phase_zero() {
    let lc = SyntheticTransit::new(2000, 0.01)
        .with_start_time(0.005)
        .with_transit(1.0, 0.25, 0.1, 0.02)
        .generate()
        .unwrap();
    let folded = lc.fold(1.0, 0.25).unwrap();
    for (p, f) in folded.phase().iter().zip(folded.flux()) {
        if p.abs() < 0.05 {
            assert_abs_diff_eq!(*f, 0.98, epsilon = 1e-12);
        } else {
            assert_abs_diff_eq!(*f, 1.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn binned_fold_keeps_dip() {
    let lc = SyntheticTransit::new(5000, 0.01)
        .with_transit(1.0, 0.5, 0.2, 0.01)
        .with_noise(1e-3)
        .with_seed(9)
        .generate()
        .unwrap();
    let binned = lc.fold(1.0, 0.5).unwrap().bin(20).unwrap();
    assert_eq!(binned.len(), 20);
    let centre = binned
        .phase()
        .iter()
        .position(|p| (p - 0.025).abs() < 1e-12)
        .unwrap();
    assert_abs_diff_eq!(binned.flux()[centre], 0.99, epsilon = 1e-3);
    assert_abs_diff_eq!(binned.flux()[0], 1.0, epsilon = 1e-3);
}
