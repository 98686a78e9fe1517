//! The single-pass pipeline: load, normalize, filter/join, resolve.
//!
//! Each run is independent and synchronous: it loads its own data, produces
//! its own outputs, and shares nothing with other runs. A superseded run is
//! simply discarded by the caller, never interrupted.

use serde::{Deserialize, Serialize};

use crate::aggregate::market_share;
use crate::config::PipelineConfig;
use crate::error::{MetroshareError, Result};
use crate::formats::{points_csv, read_boundaries};
use crate::geo::join::{filter_by_names, intersect_join};
use crate::geo::resolve::assign_regions;
use crate::geo::transform::normalize_collection;
use crate::models::boundary::BoundaryCollection;
use crate::models::geometry::Crs;
use crate::models::point::{CategoryField, TaggedPoint};
use crate::models::share::ShareTable;

/// Which boundary definition a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoundaryMode {
    /// Administrative regions filtered to the metro allow-list
    #[default]
    CoarseOnly,
    /// Functional urban-area cores restricted to allow-listed
    /// administrative regions by spatial intersection
    FineIntersectCoarse,
}

/// The outputs of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Points with their assigned region labels
    pub points: Vec<TaggedPoint>,

    /// The filtered boundary set the labels refer to, normalized to WGS 84
    pub boundaries: BoundaryCollection,
}

impl PipelineRun {
    /// Market shares over all tagged points
    pub fn market_share(&self, field: CategoryField) -> ShareTable {
        market_share(&self.points, field)
    }

    /// Market shares with one category label excluded up front.
    ///
    /// This is the "majors only" view: dropping the independents changes
    /// the denominator, so it is a different table than filtering the full
    /// one.
    pub fn market_share_excluding(&self, field: CategoryField, label: &str) -> ShareTable {
        let kept: Vec<TaggedPoint> = self
            .points
            .iter()
            .filter(|p| p.record.category_value(field) != label)
            .cloned()
            .collect();
        market_share(&kept, field)
    }

    /// GeoJSON rendition of the filtered boundaries for overlay rendering
    pub fn boundary_geojson(&self) -> String {
        self.boundaries.to_geojson_string()
    }
}

/// Execute one full pipeline run
pub fn run(config: &PipelineConfig, mode: BoundaryMode) -> Result<PipelineRun> {
    let target = Crs::wgs84();

    let points = points_csv::read_points(&config.points_path)?;
    tracing::info!(points = points.len(), ?mode, "pipeline run started");

    let mut coarse = read_boundaries(&config.coarse_path, Some(&config.coarse_name_field))?;
    normalize_collection(&mut coarse, config.coarse_fallback().as_ref(), &target)?;
    let coarse = filter_by_names(&coarse, &config.metro_names);

    let boundaries = match mode {
        BoundaryMode::CoarseOnly => coarse,
        BoundaryMode::FineIntersectCoarse => {
            let fine_path = config.fine_path.as_ref().ok_or_else(|| {
                MetroshareError::ConfigMissing { key: "fine_path".to_string() }
            })?;
            let mut fine = read_boundaries(fine_path, None)?;
            normalize_collection(&mut fine, config.fine_fallback().as_ref(), &target)?;
            intersect_join(&fine, &coarse)?
        }
    };

    let points = assign_regions(points, &boundaries);
    tracing::info!(regions = boundaries.len(), tagged = points.len(), "pipeline run complete");

    Ok(PipelineRun { points, boundaries })
}
