//! Summary command: flux statistics and CDPP per quarter and stitched.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use crate::cli::SummaryArgs;
use crate::convert;
use crate::load;
use crate::report::{FluxReport, SummaryReport};

/// Run the flux summary.
pub fn run(args: SummaryArgs) -> Result<()> {
    let _cmd = info_span!("summary").entered();
    let config = load::resolve_config(&args.target)?;
    let cdpp_cfg = convert::build_cdpp_config(&config.summary)?;

    let archive = load::open_archive(&config);
    info!(archive = %archive.root().display(), "opened archive");
    let (target, filters, set) = load::fetch_target(&archive, &config)?;
    let quarters = set
        .iter()
        .enumerate()
        .map(|(i, lc)| {
            lc.summary(&cdpp_cfg)
                .map(|s| FluxReport::from(&s))
                .with_context(|| format!("flux summary failed for product {i}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let stitched = set.stitch().context("stitching quarters failed")?;
    let stitched = stitched
        .summary(&cdpp_cfg)
        .context("flux summary failed for stitched curve")?;

    let report = SummaryReport {
        target,
        filters: filters.to_string(),
        quarters,
        stitched: FluxReport::from(&stitched),
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize summary")?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write summary: {}", path.display()))?;
            info!(path = %path.display(), "summary written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
