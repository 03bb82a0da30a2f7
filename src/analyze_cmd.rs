//! Analyze command: load, clean, search, model and export one target.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use astra_bls::{Periodogram, TransitReport, search_transit};
use astra_io::{IoError, Table, WriterConfig, write_table};
use astra_lightcurve::clean;

use crate::cli::AnalyzeArgs;
use crate::convert;
use crate::load;
use crate::report::{AnalysisReport, FluxReport, TransitJson};

/// Run the transit analysis pipeline.
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let _cmd = info_span!("analyze").entered();
    // 1. Resolve config and build library configs
    let mut config = load::resolve_config(&args.target)?;
    if let Some(output) = args.output {
        config.io.output_dir = output;
    }
    let clean_cfg = convert::build_clean_config(&config.clean)?;
    let search_cfg = convert::build_search_config(&config.search)?;
    let cdpp_cfg = convert::build_cdpp_config(&config.summary)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;

    // 2. Load and stitch quarters
    let archive = load::open_archive(&config);
    info!(archive = %archive.root().display(), "opened archive");
    let (target, filters, set) = load::fetch_target(&archive, &config)?;
    let raw = set.stitch().context("stitching quarters failed")?;
    let summary = raw.summary(&cdpp_cfg).context("flux summary failed")?;
    info!(
        n_samples = summary.n_samples,
        cdpp_ppm = summary.cdpp_ppm,
        "stitched light curve"
    );

    // 3. Clean
    let cleaned = clean(&raw, &clean_cfg).context("cleaning failed")?;
    info!(n_raw = raw.len(), n_cleaned = cleaned.len(), "cleaned light curve");

    // 4. Periodogram, peak, model, fold and depth; errors name the stage
    let TransitReport {
        periodogram,
        params,
        folded_data,
        folded_model,
        depth,
        ..
    } = search_transit(&cleaned, &search_cfg)?;
    info!(
        period = params.period,
        transit_time = params.transit_time,
        duration = params.duration,
        depth,
        "transit found"
    );

    // 5. Export tables and report
    let out_dir = &config.io.output_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;
    let tables = [
        ("cleaned.parquet", Table::try_from(&cleaned)?),
        ("periodogram.parquet", periodogram_table(&periodogram)?),
        ("folded_data.parquet", Table::try_from(&folded_data)?),
        ("folded_model.parquet", Table::try_from(&folded_model)?),
    ];
    let mut written = Vec::with_capacity(tables.len());
    for (name, table) in &tables {
        export(&out_dir.join(name), table, &writer_cfg)?;
        written.push((*name).to_string());
    }

    let report = AnalysisReport {
        target,
        filters: filters.to_string(),
        n_quarters: set.len(),
        n_raw: raw.len(),
        n_cleaned: cleaned.len(),
        summary: FluxReport::from(&summary),
        transit: TransitJson::new(&params, periodogram.objective()),
        depth,
        tables: written,
    };
    let report_path = out_dir.join("report.json");
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    std::fs::write(&report_path, json)
        .with_context(|| format!("failed to write report: {}", report_path.display()))?;
    info!(path = %report_path.display(), "report written");

    Ok(())
}

/// One row per trial period.
fn periodogram_table(periodogram: &Periodogram) -> Result<Table, IoError> {
    let column = |f: fn(&astra_bls::PeriodogramEntry) -> f64| -> Vec<f64> {
        periodogram.entries().iter().map(f).collect()
    };
    Table::new()
        .with_f64("period", column(|e| e.period))?
        .with_f64("power", column(|e| e.power))?
        .with_f64("duration", column(|e| e.duration))?
        .with_f64("transit_time", column(|e| e.transit_time))?
        .with_f64("depth", column(|e| e.depth))?
        .with_f64("depth_err", column(|e| e.depth_err))?
        .with_f64("in_level", column(|e| e.in_level))?
        .with_f64("out_level", column(|e| e.out_level))
}

fn export(path: &Path, table: &Table, config: &WriterConfig) -> Result<()> {
    write_table(path, table, config)
        .with_context(|| format!("failed to write Parquet: {}", path.display()))?;
    info!(path = %path.display(), n_rows = table.num_rows().unwrap_or(0), "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_bls::{Objective, PeriodogramEntry};

    #[test]
    fn periodogram_table_has_one_row_per_period() {
        let entry = |period: f64| PeriodogramEntry {
            period,
            power: 2.0 * period,
            duration: 0.1,
            transit_time: 0.3,
            depth: 0.0,
            depth_err: f64::NAN,
            in_level: 0.0,
            out_level: 0.0,
        };
        let pg = Periodogram::from_entries(vec![entry(1.0), entry(1.5)], Objective::Likelihood);
        let table = periodogram_table(&pg).unwrap();
        assert_eq!(table.num_rows(), Some(2));
        assert_eq!(table.num_columns(), 8);
        assert!(matches!(
            table.column("power"),
            Some(astra_io::ColumnData::Float64(v)) if v == &[2.0, 3.0]
        ));
    }
}
