//! Simulate command: write a synthetic transiting target into an archive.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use astra_io::{Cadence, WriterConfig, product_file_name, target_slug, write_light_curve};
use astra_lightcurve::SyntheticTransit;

use crate::cli::SimulateArgs;

/// Baseline drift between consecutive quarters.
const QUARTER_BASELINE_STEP: f64 = 0.02;

/// Run the simulation.
///
/// Quarters are contiguous in time and each gets its own baseline and
/// seed, so stitching has real work to do.
pub fn run(args: SimulateArgs) -> Result<()> {
    let _cmd = info_span!("simulate").entered();
    let cadence: Cadence = args.cadence.parse()?;
    let step = cadence.sampling_days();
    let dir = args.archive.join(target_slug(&args.target));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create target directory: {}", dir.display()))?;

    for quarter in 1..=args.quarters {
        let index = f64::from(quarter - 1);
        let baseline = args.baseline * (1.0 + QUARTER_BASELINE_STEP * index);
        let lc = SyntheticTransit::new(args.samples, step)
            .with_start_time(index * args.samples as f64 * step)
            .with_baseline(baseline)
            .with_noise(args.noise * baseline)
            .with_transit(args.period, args.epoch, args.duration, args.depth)
            .with_seed(args.seed.wrapping_add(u64::from(quarter)))
            .generate()
            .with_context(|| format!("simulating quarter {quarter} failed"))?;

        let path = dir.join(product_file_name(&args.author, cadence, quarter));
        write_light_curve(&path, &lc, &WriterConfig::default())
            .with_context(|| format!("failed to write Parquet: {}", path.display()))?;
        info!(quarter, n_samples = lc.len(), path = %path.display(), "quarter written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze_cmd;
    use crate::cli::{AnalyzeArgs, TargetArgs};

    fn simulate_args(archive: &std::path::Path) -> SimulateArgs {
        SimulateArgs {
            archive: archive.to_path_buf(),
            target: "SIM-1".to_string(),
            author: "astra".to_string(),
            cadence: "long".to_string(),
            quarters: 2,
            samples: 1500,
            period: 1.2,
            epoch: 0.4,
            duration: 0.1,
            depth: 0.01,
            noise: 5e-4,
            baseline: 1.0e4,
            seed: 7,
        }
    }

    #[test]
    fn writes_one_file_per_quarter() {
        let dir = tempfile::tempdir().unwrap();
        run(simulate_args(dir.path())).unwrap();
        let target_dir = dir.path().join("sim_1");
        assert!(target_dir.join("astra_long_q01.parquet").is_file());
        assert!(target_dir.join("astra_long_q02.parquet").is_file());
    }

    #[test]
    fn rejects_unknown_cadence() {
        let dir = tempfile::tempdir().unwrap();
        let args = SimulateArgs {
            cadence: "hourly".to_string(),
            ..simulate_args(dir.path())
        };
        assert!(run(args).is_err());
    }

    #[test]
    fn analyze_recovers_simulated_transit() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("archive");
        let out = dir.path().join("out");
        run(simulate_args(&archive)).unwrap();

        let config = dir.path().join("astra.toml");
        std::fs::write(
            &config,
            "[search]\nmin_period = 1.0\nmax_period = 1.4\nn_periods = 401\n",
        )
        .unwrap();
        analyze_cmd::run(AnalyzeArgs {
            target: TargetArgs {
                config: Some(config),
                target: Some("SIM-1".to_string()),
                archive: Some(archive),
                cadence: Some("long".to_string()),
                quarters: vec![],
            },
            output: Some(out.clone()),
        })
        .unwrap();

        for name in [
            "cleaned.parquet",
            "periodogram.parquet",
            "folded_data.parquet",
            "folded_model.parquet",
        ] {
            assert!(out.join(name).is_file(), "{name} missing");
        }
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("report.json")).unwrap())
                .unwrap();
        assert_eq!(report["n_quarters"], 2);
        let period = report["transit"]["period"].as_f64().unwrap();
        let depth = report["depth"].as_f64().unwrap();
        assert!((period - 1.2).abs() < 0.012, "period {period}");
        assert!((depth - 0.01).abs() < 0.0015, "depth {depth}");
    }

    #[test]
    fn analyze_error_names_failing_stage() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("archive");
        run(simulate_args(&archive)).unwrap();

        let config = dir.path().join("astra.toml");
        std::fs::write(
            &config,
            "[search]\nmin_period = 1.0\nmax_period = 1.4\nn_periods = 41\nmodel_resolution = 1\n",
        )
        .unwrap();
        let err = analyze_cmd::run(AnalyzeArgs {
            target: TargetArgs {
                config: Some(config),
                target: Some("SIM-1".to_string()),
                archive: Some(archive),
                cadence: None,
                quarters: vec![1],
            },
            output: Some(dir.path().join("out")),
        })
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.starts_with("transit modeling failed"), "{msg}");
        assert!(msg.contains("model resolution 1 is too small"), "{msg}");
        assert!(!dir.path().join("out").join("report.json").exists());
    }
}
