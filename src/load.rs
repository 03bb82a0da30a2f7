//! Target resolution shared by `analyze` and `summary`.

use anyhow::{Context, Result};
use tracing::info;

use astra_io::{LightCurveSource, LocalArchive, SearchFilters};
use astra_lightcurve::LightCurveSet;

use crate::cli::TargetArgs;
use crate::config::AstraConfig;
use crate::convert;

/// Loads the config and applies the CLI overrides to it.
pub fn resolve_config(args: &TargetArgs) -> Result<AstraConfig> {
    let mut config = AstraConfig::load_or_default(args.config.as_deref())?;
    if let Some(ref target) = args.target {
        config.target.name = Some(target.clone());
    }
    if let Some(ref archive) = args.archive {
        config.io.archive = archive.clone();
    }
    if let Some(ref cadence) = args.cadence {
        config.target.cadence = Some(cadence.clone());
    }
    if !args.quarters.is_empty() {
        config.target.quarters = Some(args.quarters.clone());
    }
    Ok(config)
}

/// The archive named by `[io].archive`.
///
/// Each command issues a single query, so the archive is read directly;
/// wrap it in [`astra_io::CachedSource`] when repeating queries.
pub fn open_archive(config: &AstraConfig) -> LocalArchive {
    LocalArchive::new(&config.io.archive)
}

/// Fetches every product of the configured target that passes the filters.
pub fn fetch_target(
    source: &impl LightCurveSource,
    config: &AstraConfig,
) -> Result<(String, SearchFilters, LightCurveSet)> {
    let target = config
        .target
        .name
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no target: set [target].name in config or use --target"))?;
    let filters = convert::build_search_filters(&config.target)?;

    info!(target_name = %target, %filters, "loading light curves");
    let set = source
        .fetch(&target, &filters)
        .with_context(|| format!("loading light curves for {target} failed"))?;
    info!(n_quarters = set.len(), "light curves loaded");
    Ok((target, filters, set))
}
