//! High-level Parquet writer configuration and orchestration.

use std::path::Path;

use astra_lightcurve::LightCurve;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::IoError;
use crate::parquet_write;
use crate::table::Table;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level = parquet::basic::ZstdLevel::try_new(3)?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing tables to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Maximum rows per row group.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Writes a table to a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid or the
/// table has no columns, or [`IoError::Parquet`] if batch conversion or
/// file I/O fails.
pub fn write_table(path: &Path, table: &Table, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;
    if table.num_columns() == 0 {
        return Err(IoError::Validation {
            count: 1,
            details: "table has no columns".to_string(),
        });
    }

    let schema = parquet_write::build_schema(table);
    let props = WriterProperties::builder()
        .set_compression(config.compression.to_parquet()?)
        .set_max_row_group_size(config.row_group_size)
        .build();
    let batch = parquet_write::table_to_record_batch(table, &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, props)?;

    debug!(
        path = %path.display(),
        rows = table.num_rows().unwrap_or(0),
        columns = table.num_columns(),
        "wrote parquet table"
    );
    Ok(())
}

/// Writes a light curve as a `time`, `flux`, `flux_err` table.
///
/// # Errors
///
/// See [`write_table`].
pub fn write_light_curve(path: &Path, lc: &LightCurve, config: &WriterConfig) -> Result<(), IoError> {
    write_table(path, &Table::try_from(lc)?, config)
}
