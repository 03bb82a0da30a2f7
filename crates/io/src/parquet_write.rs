//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;
use crate::table::{ColumnData, Table};

/// Builds the Arrow schema for a table. Float columns are nullable so NaN
/// and missing values survive; integer columns are not.
pub(crate) fn build_schema(table: &Table) -> Schema {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|(name, data)| match data {
            ColumnData::Float64(_) => Field::new(name, DataType::Float64, true),
            ColumnData::Int32(_) => Field::new(name, DataType::Int32, false),
        })
        .collect();
    Schema::new(fields)
}

/// Converts a [`Table`] into an Arrow [`RecordBatch`] with `schema`.
pub(crate) fn table_to_record_batch(table: &Table, schema: &Schema) -> Result<RecordBatch, IoError> {
    let columns: Vec<ArrayRef> = table
        .columns()
        .iter()
        .map(|(_, data)| -> ArrayRef {
            match data {
                ColumnData::Float64(v) => Arc::new(Float64Array::from(v.clone())),
                ColumnData::Int32(v) => Arc::new(Int32Array::from(v.clone())),
            }
        })
        .collect();

    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: format!("{}: {e}", path.display()),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
