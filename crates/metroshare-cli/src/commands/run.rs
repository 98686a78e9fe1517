//! Run command implementation

use std::fs;

use anyhow::{Context, Result};
use tabled::Tabled;

use metroshare_core::config::PipelineConfig;
use metroshare_core::models::point::CategoryField;
use metroshare_core::models::share::ShareTable;
use metroshare_core::pipeline;

use crate::cli::RunArgs;
use crate::output::OutputWriter;

pub fn execute(args: RunArgs, output: &OutputWriter) -> Result<()> {
    let config = build_config(&args)?;
    let mode = args.mode.into();
    let category: CategoryField = args.category.into();

    let run = pipeline::run(&config, mode)
        .with_context(|| format!("pipeline run failed ({:?} mode)", mode))?;

    let table = match &args.exclude_category {
        Some(label) => run.market_share_excluding(category, label),
        None => run.market_share(category),
    };

    if let Some(path) = &args.boundaries_out {
        fs::write(path, run.boundary_geojson())
            .with_context(|| format!("failed to write boundaries to {}", path.display()))?;
        if !output.is_json() {
            output.success(format!("wrote boundary GeoJSON to {}", path.display()));
        }
    }

    if output.is_json() {
        output.result(&table)?;
        return Ok(());
    }

    let outside = run
        .points
        .iter()
        .filter(|p| p.metro_area == metroshare_core::OUTSIDE_METRO)
        .count();
    output.kv("Points", run.points.len());
    output.kv("Regions", run.boundaries.len());
    output.kv("Outside metro", outside);
    if let Some(label) = &args.exclude_category {
        output.kv("Excluded category", label);
    }

    output.section(format!("Market share by {}", category));
    print_share_table(output, &table);

    Ok(())
}

/// Start from the TOML config (or defaults) and let CLI paths override it
fn build_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(points) = &args.points {
        config.points_path = points.clone();
    }
    if let Some(coarse) = &args.coarse {
        config.coarse_path = coarse.clone();
    }
    if let Some(fine) = &args.fine {
        config.fine_path = Some(fine.clone());
    }

    Ok(config)
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Metro Area")]
    region: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Share %")]
    share: f64,
}

fn print_share_table(output: &OutputWriter, table: &ShareTable) {
    let rows: Vec<ShareRow> = table
        .iter_rows()
        .map(|(region, category, share)| ShareRow {
            region: region.to_string(),
            category: category.to_string(),
            share,
        })
        .collect();
    output.table(rows);
}
