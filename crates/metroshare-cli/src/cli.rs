use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use metroshare_core::models::point::CategoryField;
use metroshare_core::pipeline::BoundaryMode;

/// Metroshare - metro-area market share pipeline
#[derive(Parser, Debug)]
#[command(name = "metroshare")]
#[command(about = "Assign retail points to metro regions and compute market shares", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline and print the market-share table
    Run(RunArgs),

    /// Summarize a boundary dataset (format, CRS, region names)
    Inspect(InspectArgs),
}

/// Boundary definition selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Administrative regions filtered to the metro allow-list
    CoarseOnly,
    /// Functional urban cores intersected with the filtered
    /// administrative regions
    FineIntersectCoarse,
}

impl From<ModeArg> for BoundaryMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::CoarseOnly => BoundaryMode::CoarseOnly,
            ModeArg::FineIntersectCoarse => BoundaryMode::FineIntersectCoarse,
        }
    }
}

/// Classification column selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    /// Pre-merger ownership ("Corporate")
    Corporate,
    /// Post-merger ownership ("Corporate 2")
    Corporate2,
}

impl From<CategoryArg> for CategoryField {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Corporate => CategoryField::Corporate,
            CategoryArg::Corporate2 => CategoryField::CorporateTwo,
        }
    }
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Points CSV file
    #[arg(long)]
    pub points: Option<PathBuf>,

    /// Coarse (administrative) boundary file (.shp or .geojson)
    #[arg(long)]
    pub coarse: Option<PathBuf>,

    /// Fine (functional) boundary file (.shp or .geojson)
    #[arg(long)]
    pub fine: Option<PathBuf>,

    /// Boundary definition to use
    #[arg(long, value_enum, default_value_t = ModeArg::CoarseOnly)]
    pub mode: ModeArg,

    /// Classification column to group by
    #[arg(long, value_enum, default_value_t = CategoryArg::Corporate)]
    pub category: CategoryArg,

    /// Drop points with this category value before aggregating
    /// (e.g. "Independents & Minors" for the majors-only view)
    #[arg(long, value_name = "LABEL")]
    pub exclude_category: Option<String>,

    /// Write the filtered boundary GeoJSON to this path
    #[arg(long, value_name = "PATH")]
    pub boundaries_out: Option<PathBuf>,

    /// TOML configuration file (CLI paths override it)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Boundary file to inspect (.shp or .geojson)
    pub path: PathBuf,

    /// Attribute field carrying region names
    #[arg(long, default_value = "SUA_NAME21")]
    pub name_field: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_shape() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mode_arg_maps() {
        assert_eq!(BoundaryMode::from(ModeArg::CoarseOnly), BoundaryMode::CoarseOnly);
        assert_eq!(
            BoundaryMode::from(ModeArg::FineIntersectCoarse),
            BoundaryMode::FineIntersectCoarse
        );
    }
}
