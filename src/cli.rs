use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Astra transit search over stellar light curves.
#[derive(Parser)]
#[command(
    name = "astra",
    version,
    about = "Transit search over stellar light curves"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Load, clean and search a target for transits.
    Analyze(AnalyzeArgs),
    /// Print flux statistics and CDPP for a target.
    Summary(SummaryArgs),
    /// Write a synthetic transiting target into an archive.
    Simulate(SimulateArgs),
}

/// Target selection shared by `analyze` and `summary`.
#[derive(clap::Args)]
pub struct TargetArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override target name from config.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Override archive root from config.
    #[arg(short, long)]
    pub archive: Option<PathBuf>,

    /// Override cadence filter from config (long or short).
    #[arg(long)]
    pub cadence: Option<String>,

    /// Override quarter filter from config (repeatable).
    #[arg(short, long = "quarter")]
    pub quarters: Vec<u32>,
}

/// Arguments for the `analyze` subcommand.
#[derive(clap::Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Override output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `summary` subcommand.
#[derive(clap::Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Write the summary JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Archive root to write into.
    #[arg(short, long)]
    pub archive: PathBuf,

    /// Target name.
    #[arg(short, long, default_value = "SIM-1")]
    pub target: String,

    /// Pipeline author recorded in the product file names.
    #[arg(long, default_value = "astra")]
    pub author: String,

    /// Product cadence (long or short).
    #[arg(long, default_value = "long")]
    pub cadence: String,

    /// Number of quarters to write.
    #[arg(long, default_value_t = 4)]
    pub quarters: u32,

    /// Samples per quarter.
    #[arg(long, default_value_t = 2000)]
    pub samples: usize,

    /// Orbital period (days).
    #[arg(long, default_value_t = 1.2)]
    pub period: f64,

    /// Mid-transit time of the first transit (days).
    #[arg(long, default_value_t = 0.4)]
    pub epoch: f64,

    /// Transit duration (days).
    #[arg(long, default_value_t = 0.1)]
    pub duration: f64,

    /// Relative transit depth.
    #[arg(long, default_value_t = 0.01)]
    pub depth: f64,

    /// Gaussian noise as a fraction of the baseline flux.
    #[arg(long, default_value_t = 5e-4)]
    pub noise: f64,

    /// Baseline flux of the first quarter.
    #[arg(long, default_value_t = 1.0e4)]
    pub baseline: f64,

    /// RNG seed.
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,
}
