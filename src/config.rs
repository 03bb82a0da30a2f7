use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Astra configuration (`astra.toml`).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AstraConfig {
    /// Archive and output settings.
    #[serde(default)]
    pub io: IoToml,

    /// Star to analyse and which products to load.
    #[serde(default)]
    pub target: TargetToml,

    /// Cleaner settings.
    #[serde(default)]
    pub clean: CleanToml,

    /// Periodogram and model settings.
    #[serde(default)]
    pub search: SearchToml,

    /// CDPP settings for the flux summary.
    #[serde(default)]
    pub summary: SummaryToml,
}

impl AstraConfig {
    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_archive")]
    pub archive: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            archive: default_archive(),
            output_dir: default_output_dir(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_archive() -> PathBuf {
    PathBuf::from("archive")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("astra-out")
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetToml {
    pub name: Option<String>,
    pub cadence: Option<String>,
    pub author: Option<String>,
    pub quarters: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanToml {
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    #[serde(default)]
    pub sigma_lower: Option<f64>,
    #[serde(default)]
    pub sigma_upper: Option<f64>,
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    #[serde(default = "default_window_length")]
    pub window_length: usize,
    #[serde(default = "default_polyorder")]
    pub polyorder: usize,
    #[serde(default = "default_niters")]
    pub niters: usize,
    #[serde(default = "default_flatten_sigma")]
    pub flatten_sigma: f64,
    #[serde(default = "default_break_tolerance")]
    pub break_tolerance: f64,
}

impl Default for CleanToml {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
            sigma: default_sigma(),
            sigma_lower: None,
            sigma_upper: None,
            max_iters: default_max_iters(),
            window_length: default_window_length(),
            polyorder: default_polyorder(),
            niters: default_niters(),
            flatten_sigma: default_flatten_sigma(),
            break_tolerance: default_break_tolerance(),
        }
    }
}

fn default_min_samples() -> usize {
    10
}
fn default_sigma() -> f64 {
    5.0
}
fn default_max_iters() -> usize {
    5
}
fn default_window_length() -> usize {
    101
}
fn default_polyorder() -> usize {
    2
}
fn default_niters() -> usize {
    3
}
fn default_flatten_sigma() -> f64 {
    3.0
}
fn default_break_tolerance() -> f64 {
    5.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchToml {
    #[serde(default = "default_min_period")]
    pub min_period: f64,
    #[serde(default = "default_max_period")]
    pub max_period: f64,
    #[serde(default = "default_n_periods")]
    pub n_periods: usize,
    /// Explicit trial periods; replaces the linear grid when set.
    #[serde(default)]
    pub periods: Option<Vec<f64>>,
    #[serde(default = "default_durations")]
    pub durations: Vec<f64>,
    #[serde(default = "default_oversample")]
    pub oversample: usize,
    #[serde(default = "default_objective")]
    pub objective: String,
    #[serde(default = "default_model_resolution")]
    pub model_resolution: usize,
}

impl Default for SearchToml {
    fn default() -> Self {
        Self {
            min_period: default_min_period(),
            max_period: default_max_period(),
            n_periods: default_n_periods(),
            periods: None,
            durations: default_durations(),
            oversample: default_oversample(),
            objective: default_objective(),
            model_resolution: default_model_resolution(),
        }
    }
}

fn default_min_period() -> f64 {
    0.5
}
fn default_max_period() -> f64 {
    2.0
}
fn default_n_periods() -> usize {
    1000
}
fn default_durations() -> Vec<f64> {
    vec![0.05, 0.10, 0.15, 0.20, 0.25, 0.33]
}
fn default_oversample() -> usize {
    10
}
fn default_objective() -> String {
    "likelihood".to_string()
}
fn default_model_resolution() -> usize {
    5000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryToml {
    #[serde(default = "default_transit_duration")]
    pub transit_duration: usize,
    #[serde(default = "default_window_length")]
    pub savgol_window: usize,
    #[serde(default = "default_polyorder")]
    pub savgol_polyorder: usize,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
}

impl Default for SummaryToml {
    fn default() -> Self {
        Self {
            transit_duration: default_transit_duration(),
            savgol_window: default_window_length(),
            savgol_polyorder: default_polyorder(),
            sigma: default_sigma(),
        }
    }
}

fn default_transit_duration() -> usize {
    13
}
