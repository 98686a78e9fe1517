//! Input format readers.
//!
//! Boundary polygon sets arrive as Shapefiles or GeoJSON; each format
//! implements the [`BoundaryReader`] trait and [`read_boundaries`] picks a
//! reader from the file extension. Point records come from a CSV file read
//! by [`points_csv`]. All reads are synchronous and happen once at the
//! start of a pipeline run.

use std::path::Path;

use crate::error::{MetroshareError, Result};
use crate::models::boundary::BoundaryCollection;

pub mod geojson;
pub mod points_csv;
pub mod shapefile;

use geojson::GeoJsonBoundaryReader;
use shapefile::ShapefileBoundaryReader;

/// A boundary polygon set reader for one file format
pub trait BoundaryReader {
    /// Read a boundary collection from the given path.
    ///
    /// `name_field` selects the attribute carrying region names; when
    /// `None` or absent on a feature, the feature ordinal is used instead
    /// (fine-grained sets have no name of their own, they inherit names in
    /// the intersect join).
    fn read(&self, path: &Path, name_field: Option<&str>) -> Result<BoundaryCollection>;

    /// Supported file extensions (e.g. ["shp"])
    fn supported_extensions(&self) -> &[&str];

    /// Human-readable format name
    fn format_name(&self) -> &str;
}

/// Read a boundary collection, detecting the format from the extension
pub fn read_boundaries(path: &Path, name_field: Option<&str>) -> Result<BoundaryCollection> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let readers: [&dyn BoundaryReader; 2] = [&ShapefileBoundaryReader, &GeoJsonBoundaryReader];

    readers
        .iter()
        .find(|r| r.supported_extensions().contains(&extension.as_str()))
        .ok_or_else(|| MetroshareError::UnsupportedFormat {
            extension: extension.clone(),
            supported: readers
                .iter()
                .flat_map(|r| r.supported_extensions())
                .map(|s| s.to_string())
                .collect(),
        })?
        .read(path, name_field)
}
