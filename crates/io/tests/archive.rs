//! Integration tests: fetching light curves from an on-disk archive.

use std::fs;
use std::path::Path;

use astra_io::{
    CachedSource, Cadence, IoError, LightCurveSource, LocalArchive, SearchFilters, WriterConfig,
    product_file_name, target_slug, write_light_curve,
};
use astra_lightcurve::LightCurve;

const TARGET: &str = "Kepler-10";

/// Writes one constant-flux quarter whose flux equals the quarter number.
fn write_quarter(root: &Path, author: &str, cadence: Cadence, quarter: u32) {
    let dir = root.join(target_slug(TARGET));
    fs::create_dir_all(&dir).unwrap();
    let start = quarter as f64 * 100.0;
    let time: Vec<f64> = (0..50).map(|i| start + i as f64 * 0.02).collect();
    let lc = LightCurve::without_errors(time, vec![quarter as f64; 50]).unwrap();
    let path = dir.join(product_file_name(author, cadence, quarter));
    write_light_curve(&path, &lc, &WriterConfig::default()).unwrap();
}

fn archive() -> (tempfile::TempDir, LocalArchive) {
    let dir = tempfile::tempdir().unwrap();
    write_quarter(dir.path(), "Kepler", Cadence::Long, 3);
    write_quarter(dir.path(), "Kepler", Cadence::Long, 1);
    write_quarter(dir.path(), "Kepler", Cadence::Short, 2);
    write_quarter(dir.path(), "K2", Cadence::Long, 4);
    fs::write(dir.path().join(target_slug(TARGET)).join("notes.txt"), "ignored").unwrap();
    let archive = LocalArchive::new(dir.path());
    (dir, archive)
}

fn quarters_of(set: &astra_lightcurve::LightCurveSet) -> Vec<f64> {
    set.iter().map(|lc| lc.flux()[0]).collect()
}

#[test]
fn unfiltered_fetch_returns_every_product_in_quarter_order() {
    let (_dir, archive) = archive();
    let set = archive.fetch(TARGET, &SearchFilters::new()).unwrap();
    assert_eq!(quarters_of(&set), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn filters_narrow_the_products() {
    let (_dir, archive) = archive();
    let long = archive
        .fetch(TARGET, &SearchFilters::new().with_cadence(Cadence::Long))
        .unwrap();
    assert_eq!(quarters_of(&long), vec![1.0, 3.0, 4.0]);

    let kepler_long = archive
        .fetch(
            TARGET,
            &SearchFilters::new()
                .with_cadence(Cadence::Long)
                .with_author("kepler"),
        )
        .unwrap();
    assert_eq!(quarters_of(&kepler_long), vec![1.0, 3.0]);

    let q3 = archive
        .fetch(TARGET, &SearchFilters::new().with_quarters(vec![3]))
        .unwrap();
    assert_eq!(quarters_of(&q3), vec![3.0]);
}

#[test]
fn target_lookup_ignores_case_and_punctuation() {
    let (_dir, archive) = archive();
    let set = archive.fetch("kepler 10", &SearchFilters::new()).unwrap();
    assert_eq!(set.len(), 4);
}

#[test]
fn unknown_target_is_not_found() {
    let (_dir, archive) = archive();
    let err = archive.fetch("Kepler-999", &SearchFilters::new()).unwrap_err();
    assert!(matches!(err, IoError::TargetNotFound { ref target, .. } if target == "Kepler-999"));
}

#[test]
fn no_matching_product_is_not_found() {
    let (_dir, archive) = archive();
    let err = archive
        .fetch(TARGET, &SearchFilters::new().with_quarters(vec![17]))
        .unwrap_err();
    let IoError::TargetNotFound { reason, .. } = err else {
        panic!("expected TargetNotFound, got {err:?}");
    };
    assert!(reason.contains("4 product(s)"), "{reason}");
}

#[test]
fn cached_archive_reads_disk_once() {
    let (dir, archive) = archive();
    let cached = CachedSource::new(archive);
    let filters = SearchFilters::new().with_cadence(Cadence::Long);
    let first = cached.fetch(TARGET, &filters).unwrap();

    // Served from memory even after the files are gone.
    fs::remove_dir_all(dir.path().join(target_slug(TARGET))).unwrap();
    let second = cached.fetch(TARGET, &filters).unwrap();
    assert_eq!(first, second);
    assert!(cached.fetch(TARGET, &SearchFilters::new()).is_err());
}
