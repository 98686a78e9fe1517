//! Inspect command implementation

use anyhow::{Context, Result};
use serde::Serialize;

use metroshare_core::formats::read_boundaries;

use crate::cli::InspectArgs;
use crate::output::OutputWriter;

#[derive(Serialize)]
struct InspectReport {
    name: String,
    crs: Option<String>,
    region_count: usize,
    regions: Vec<String>,
}

pub fn execute(args: InspectArgs, output: &OutputWriter) -> Result<()> {
    let boundaries = read_boundaries(&args.path, Some(&args.name_field))
        .with_context(|| format!("failed to read boundaries from {}", args.path.display()))?;

    let report = InspectReport {
        name: boundaries.name.clone(),
        crs: boundaries.crs.as_ref().map(|c| c.to_string()),
        region_count: boundaries.len(),
        regions: boundaries.names().iter().map(|n| n.to_string()).collect(),
    };

    if output.is_json() {
        output.result(&report)?;
        return Ok(());
    }

    output.section("Boundary Dataset");
    output.kv("Dataset", &report.name);
    output.kv(
        "CRS",
        report.crs.as_deref().unwrap_or("(undeclared)"),
    );
    output.kv("Regions", report.region_count);
    for region in &report.regions {
        println!("  - {}", region);
    }
    if report.region_count == 0 {
        output.warning("dataset contains no polygon regions");
    }

    Ok(())
}
