//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MetroshareError, Result};
use crate::models::geometry::Crs;

/// The capital-city metro regions kept by the coarse allow-list filter
pub const CAPITAL_CITIES: [&str; 8] = [
    "Sydney",
    "Melbourne",
    "Brisbane",
    "Perth",
    "Adelaide",
    "Hobart",
    "Canberra",
    "Darwin",
];

/// Configuration for one pipeline run.
///
/// Defaults target the Australian pharmacy dataset: ASGS Significant Urban
/// Areas as the coarse administrative set (named by `SUA_NAME21`) and the
/// OECD functional urban-area cores as the fine set, which ships without
/// projection metadata and is assumed to be GDA2020 (EPSG:7844).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tabular points file
    pub points_path: PathBuf,

    /// Coarse (administrative) boundary set
    pub coarse_path: PathBuf,

    /// Fine (functional) boundary set; only needed in fine-intersect-coarse
    /// mode
    pub fine_path: Option<PathBuf>,

    /// Attribute field carrying coarse region names
    pub coarse_name_field: String,

    /// Region-name allow-list applied to the coarse set
    pub metro_names: Vec<String>,

    /// Assumed EPSG code for a coarse set that declares no CRS
    pub coarse_fallback_epsg: Option<u32>,

    /// Assumed EPSG code for a fine set that declares no CRS
    pub fine_fallback_epsg: Option<u32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            points_path: PathBuf::from("data/pharmacies.csv"),
            coarse_path: PathBuf::from("data/SUA_2021_AUST_GDA2020.shp"),
            fine_path: Some(PathBuf::from("data/AUS_core_commuting.shp")),
            coarse_name_field: "SUA_NAME21".to_string(),
            metro_names: CAPITAL_CITIES.iter().map(|s| s.to_string()).collect(),
            coarse_fallback_epsg: None,
            fine_fallback_epsg: Some(7844),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file, filling omitted keys with
    /// defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MetroshareError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| MetroshareError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("failed to parse TOML: {}", e),
        })
    }

    pub fn coarse_fallback(&self) -> Option<Crs> {
        self.coarse_fallback_epsg.map(Crs::from_epsg)
    }

    pub fn fine_fallback(&self) -> Option<Crs> {
        self.fine_fallback_epsg.map(Crs::from_epsg)
    }
}
