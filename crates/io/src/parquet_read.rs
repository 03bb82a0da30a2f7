//! Low-level Parquet reading and column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::{DataType, Float64Type, Int32Type};
use astra_lightcurve::LightCurve;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::debug;

use crate::error::IoError;

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: format!("{}: {e}", path.display()),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}

/// Checks the light-curve columns: `time` and `flux` are required Float64,
/// `flux_err` is optional Float64, `quality` is optional Int32.
///
/// Returns `(has_flux_err, has_quality)`.
fn validate_schema(batch: &RecordBatch, path: &Path) -> Result<(bool, bool), IoError> {
    let schema = batch.schema();
    let mut mismatches = Vec::new();
    let mut present = |name: &str, expected: &DataType, required: bool| -> Result<bool, IoError> {
        match schema.field_with_name(name) {
            Ok(field) => {
                if field.data_type() != expected {
                    mismatches.push(format!(
                        "column '{name}': expected {expected}, got {}",
                        field.data_type()
                    ));
                }
                Ok(true)
            }
            Err(_) if required => Err(IoError::MissingColumn {
                name: name.to_string(),
                path: path.to_path_buf(),
            }),
            Err(_) => Ok(false),
        }
    };

    present("time", &DataType::Float64, true)?;
    present("flux", &DataType::Float64, true)?;
    let has_flux_err = present("flux_err", &DataType::Float64, false)?;
    let has_quality = present("quality", &DataType::Int32, false)?;

    if !mismatches.is_empty() {
        return Err(IoError::Validation {
            count: mismatches.len(),
            details: mismatches.join("; "),
        });
    }
    Ok((has_flux_err, has_quality))
}

/// Appends a Float64 column to `out`, mapping nulls to NaN.
fn extend_f64(batch: &RecordBatch, name: &str, out: &mut Vec<f64>) {
    if let Some(col) = batch
        .column_by_name(name)
        .and_then(|c| c.as_primitive_opt::<Float64Type>())
    {
        out.extend(col.iter().map(|v| v.unwrap_or(f64::NAN)));
    }
}

/// Reads one light-curve file.
///
/// Samples with a non-zero `quality` flag are dropped. Null values in the
/// float columns become NaN; a missing `flux_err` column yields NaN
/// uncertainties.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | `path` does not exist |
/// | [`IoError::Parquet`] | the file cannot be decoded |
/// | [`IoError::MissingColumn`] | `time` or `flux` is absent |
/// | [`IoError::Validation`] | a column has the wrong type |
pub fn read_light_curve(path: &Path) -> Result<LightCurve, IoError> {
    let batches = read_batches(path)?;

    let mut time = Vec::new();
    let mut flux = Vec::new();
    let mut flux_err = Vec::new();
    let mut keep = Vec::new();
    for batch in &batches {
        let (has_flux_err, has_quality) = validate_schema(batch, path)?;
        extend_f64(batch, "time", &mut time);
        extend_f64(batch, "flux", &mut flux);
        if has_flux_err {
            extend_f64(batch, "flux_err", &mut flux_err);
        } else {
            flux_err.extend(std::iter::repeat_n(f64::NAN, batch.num_rows()));
        }
        match batch
            .column_by_name("quality")
            .and_then(|c| c.as_primitive_opt::<Int32Type>())
        {
            Some(q) if has_quality => keep.extend(q.iter().map(|v| v.unwrap_or(0) == 0)),
            _ => keep.extend(std::iter::repeat_n(true, batch.num_rows())),
        }
    }

    let flagged = keep.iter().filter(|k| !**k).count();
    if flagged > 0 {
        let pick = |col: Vec<f64>| -> Vec<f64> {
            col.into_iter()
                .zip(&keep)
                .filter(|(_, k)| **k)
                .map(|(v, _)| v)
                .collect()
        };
        time = pick(time);
        flux = pick(flux);
        flux_err = pick(flux_err);
    }

    let lc = LightCurve::new(time, flux, flux_err)?;
    debug!(path = %path.display(), n = lc.len(), flagged, "read light curve");
    Ok(lc)
}
