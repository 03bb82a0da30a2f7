//! Integration tests: light curves and tables through Parquet and back.

use approx::assert_relative_eq;
use astra_io::{
    Compression, IoError, Table, WriterConfig, read_light_curve, write_light_curve, write_table,
};
use astra_lightcurve::{LightCurve, SyntheticTransit};

fn curve() -> LightCurve {
    SyntheticTransit::new(500, 0.02)
        .with_transit(1.5, 0.4, 0.12, 0.01)
        .with_noise(1e-4)
        .generate()
        .expect("fixture is valid")
}

#[test]
fn light_curve_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lc.parquet");
    let lc = curve();
    write_light_curve(&path, &lc, &WriterConfig::default()).unwrap();

    let back = read_light_curve(&path).unwrap();
    assert_eq!(back.len(), lc.len());
    assert_eq!(back.time(), lc.time());
    for (a, b) in back.flux().iter().zip(lc.flux()) {
        assert_relative_eq!(*a, *b);
    }
    assert_eq!(back.flux_err(), lc.flux_err());
}

#[test]
fn every_compression_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let lc = curve();
    for (i, comp) in [Compression::None, Compression::Snappy, Compression::Zstd]
        .into_iter()
        .enumerate()
    {
        let path = dir.path().join(format!("lc_{i}.parquet"));
        let config = WriterConfig::default()
            .with_compression(comp)
            .with_row_group_size(128);
        write_light_curve(&path, &lc, &config).unwrap();
        assert_eq!(read_light_curve(&path).unwrap(), lc);
    }
}

#[test]
fn flagged_samples_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flagged.parquet");
    let table = Table::new()
        .with_f64("time", vec![0.0, 0.1, 0.2, 0.3, 0.4])
        .unwrap()
        .with_f64("flux", vec![1.0, 0.5, 1.0, 1.0, 2.0])
        .unwrap()
        .with_f64("flux_err", vec![0.01; 5])
        .unwrap()
        .with_i32("quality", vec![0, 16, 0, 0, 1024])
        .unwrap();
    write_table(&path, &table, &WriterConfig::default()).unwrap();

    let lc = read_light_curve(&path).unwrap();
    assert_eq!(lc.time(), &[0.0, 0.2, 0.3]);
    assert_eq!(lc.flux(), &[1.0, 1.0, 1.0]);
}

#[test]
fn unsorted_rows_come_back_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unsorted.parquet");
    let table = Table::new()
        .with_f64("time", vec![0.3, 0.1, 0.2])
        .unwrap()
        .with_f64("flux", vec![3.0, 1.0, 2.0])
        .unwrap();
    write_table(&path, &table, &WriterConfig::default()).unwrap();

    let lc = read_light_curve(&path).unwrap();
    assert_eq!(lc.time(), &[0.1, 0.2, 0.3]);
    assert_eq!(lc.flux(), &[1.0, 2.0, 3.0]);
    assert!(!lc.has_errors());
}

#[test]
fn empty_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_table(
        &dir.path().join("empty.parquet"),
        &Table::new(),
        &WriterConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IoError::Validation { .. }));
}
