//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use astra_bls::{BlsConfig, DurationGrid, Objective, PeriodGrid, SearchConfig};
use astra_io::{Cadence, Compression, SearchFilters, WriterConfig};
use astra_lightcurve::{CdppConfig, CleanConfig};

use crate::config::*;

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses a periodogram objective name string into the corresponding enum variant.
pub fn parse_objective(s: &str) -> Result<Objective> {
    match s.to_lowercase().as_str() {
        "likelihood" => Ok(Objective::Likelihood),
        "snr" => Ok(Objective::Snr),
        other => bail!("unknown periodogram objective: {other:?}"),
    }
}

/// Builds [`SearchFilters`] from the TOML target section.
pub fn build_search_filters(target: &TargetToml) -> Result<SearchFilters> {
    let mut filters = SearchFilters::new();
    if let Some(ref cadence) = target.cadence {
        filters = filters.with_cadence(cadence.parse::<Cadence>()?);
    }
    if let Some(ref author) = target.author {
        filters = filters.with_author(author.as_str());
    }
    if let Some(ref quarters) = target.quarters {
        filters = filters.with_quarters(quarters.clone());
    }
    Ok(filters)
}

/// Builds a [`CleanConfig`] from the TOML clean configuration.
pub fn build_clean_config(clean: &CleanToml) -> Result<CleanConfig> {
    let mut cfg = CleanConfig::default()
        .with_min_samples(clean.min_samples)
        .with_sigma(clean.sigma)
        .with_max_iters(clean.max_iters)
        .with_window_length(clean.window_length)
        .with_polyorder(clean.polyorder)
        .with_niters(clean.niters)
        .with_flatten_sigma(clean.flatten_sigma)
        .with_break_tolerance(clean.break_tolerance);
    if let Some(lower) = clean.sigma_lower {
        cfg = cfg.with_sigma_lower(lower);
    }
    if let Some(upper) = clean.sigma_upper {
        cfg = cfg.with_sigma_upper(upper);
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`SearchConfig`] from the TOML search configuration.
///
/// An explicit `periods` list takes precedence over the linear grid.
pub fn build_search_config(search: &SearchToml) -> Result<SearchConfig> {
    let periods = match search.periods {
        Some(ref periods) => PeriodGrid::from_periods(periods.clone())?,
        None => PeriodGrid::linspace(search.min_period, search.max_period, search.n_periods)?,
    };
    let bls = BlsConfig::default()
        .with_durations(DurationGrid::new(search.durations.clone())?)
        .with_oversample(search.oversample)
        .with_objective(parse_objective(&search.objective)?);
    bls.validate()?;
    Ok(SearchConfig::default()
        .with_periods(periods)
        .with_bls(bls)
        .with_model_resolution(search.model_resolution))
}

/// Builds a [`CdppConfig`] from the TOML summary configuration.
pub fn build_cdpp_config(summary: &SummaryToml) -> Result<CdppConfig> {
    let cfg = CdppConfig::default()
        .with_transit_duration(summary.transit_duration)
        .with_savgol_window(summary.savgol_window)
        .with_savgol_polyorder(summary.savgol_polyorder)
        .with_sigma(summary.sigma);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(io.row_group_size))
}
