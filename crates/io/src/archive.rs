//! Directory-backed light-curve archive.
//!
//! Layout: `<root>/<target-slug>/<author>_<cadence>_q<NN>.parquet`, one file
//! per product. The slug is the lower-cased target name with every
//! non-alphanumeric character replaced by `_`.

use std::path::{Path, PathBuf};

use astra_lightcurve::LightCurveSet;
use tracing::{debug, info};

use crate::error::IoError;
use crate::parquet_read::read_light_curve;
use crate::source::{Cadence, LightCurveSource, SearchFilters};

/// Directory name for a target.
pub fn target_slug(target: &str) -> String {
    target
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// File name of one product.
pub fn product_file_name(author: &str, cadence: Cadence, quarter: u32) -> String {
    format!("{}_{cadence}_q{quarter:02}.parquet", author.to_ascii_lowercase())
}

/// A product file found in a target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Product {
    author: String,
    cadence: Cadence,
    quarter: u32,
    path: PathBuf,
}

/// Parses `<author>_<cadence>_q<NN>.parquet`; the author may contain `_`.
fn parse_product(path: &Path) -> Option<Product> {
    let stem = path.file_name()?.to_str()?.strip_suffix(".parquet")?;
    let mut parts = stem.rsplitn(3, '_');
    let quarter = parts.next()?.strip_prefix('q')?.parse().ok()?;
    let cadence = parts.next()?.parse().ok()?;
    let author = parts.next().filter(|a| !a.is_empty())?;
    Some(Product {
        author: author.to_string(),
        cadence,
        quarter,
        path: path.to_path_buf(),
    })
}

/// Light curves stored as Parquet files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalArchive {
    root: PathBuf,
}

impl LocalArchive {
    /// Opens an archive rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Archive root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a target's products.
    pub fn target_dir(&self, target: &str) -> PathBuf {
        self.root.join(target_slug(target))
    }

    fn list_products(&self, dir: &Path) -> Result<Vec<Product>, IoError> {
        let archive_err = |e: std::io::Error| IoError::Archive {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        };
        let mut products = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(archive_err)? {
            let path = entry.map_err(archive_err)?.path();
            match parse_product(&path) {
                Some(p) => products.push(p),
                None => debug!(path = %path.display(), "skipping unrecognised file"),
            }
        }
        products.sort_by(|a, b| {
            (a.quarter, a.cadence, &a.author).cmp(&(b.quarter, b.cadence, &b.author))
        });
        Ok(products)
    }
}

impl LightCurveSource for LocalArchive {
    fn fetch(&self, target: &str, filters: &SearchFilters) -> Result<LightCurveSet, IoError> {
        let dir = self.target_dir(target);
        if !dir.is_dir() {
            return Err(IoError::TargetNotFound {
                target: target.to_string(),
                reason: format!("no directory {}", dir.display()),
            });
        }

        let products = self.list_products(&dir)?;
        let n_found = products.len();
        let mut set = LightCurveSet::default();
        for p in products
            .into_iter()
            .filter(|p| filters.matches(&p.author, p.cadence, p.quarter))
        {
            debug!(quarter = p.quarter, cadence = %p.cadence, author = %p.author, "loading product");
            set.push(read_light_curve(&p.path)?);
        }

        if set.is_empty() {
            return Err(IoError::TargetNotFound {
                target: target.to_string(),
                reason: format!("{n_found} product(s) on disk, none match {filters}"),
            });
        }
        info!(target_name = target, n_products = set.len(), "fetched light curves");
        Ok(set)
    }
}
