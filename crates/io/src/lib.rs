//! # astra-io
//!
//! Loads light curves from a local Parquet archive and writes plot-ready
//! tables back to Parquet. Bridges files on disk into
//! [`astra_lightcurve::LightCurve`] values.

mod archive;
mod cache;
mod error;
mod parquet_read;
mod parquet_write;
mod source;
mod table;
mod writer;

pub use archive::{LocalArchive, product_file_name, target_slug};
pub use cache::CachedSource;
pub use error::IoError;
pub use parquet_read::read_light_curve;
pub use source::{Cadence, LightCurveSource, SearchFilters};
pub use table::{ColumnData, Table};
pub use writer::{Compression, WriterConfig, write_light_curve, write_table};
