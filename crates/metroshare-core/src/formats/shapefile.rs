//! Shapefile boundary reader.
//!
//! Shapefiles consist of multiple component files (.shp, .shx, .dbf, .prj).
//! Region names come from a dBase attribute field, the CRS from the .prj
//! sidecar. A missing .shx index is normally fatal, but setting the
//! `METROSHARE_RESTORE_SHX` environment variable lets the reader proceed
//! sequentially without it (the batch pipeline never seeks).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use geo::MultiPolygon;
use shapefile::dbase::FieldValue;
use shapefile::{Reader, Shape};

use crate::error::{MetroshareError, Result};
use crate::formats::BoundaryReader;
use crate::models::boundary::{BoundaryCollection, BoundaryRegion};
use crate::models::geometry::{from_geo_geometry, Crs};

/// Environment toggle for reading shapefiles with a missing .shx index
pub const RESTORE_SHX_ENV: &str = "METROSHARE_RESTORE_SHX";

pub struct ShapefileBoundaryReader;

impl BoundaryReader for ShapefileBoundaryReader {
    fn read(&self, path: &Path, name_field: Option<&str>) -> Result<BoundaryCollection> {
        let base = shapefile_base(path)?;
        let restore_shx = restore_requested(env::var(RESTORE_SHX_ENV).ok().as_deref());
        verify_components(&base, restore_shx)?;

        let mut reader =
            Reader::from_path(path).map_err(|e| MetroshareError::DataUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let crs = read_prj_epsg(&base)?.map(Crs::from_epsg);
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed").to_string();
        let mut collection = BoundaryCollection::new(name, crs);

        for (ordinal, result) in reader.iter_shapes_and_records().enumerate() {
            let (shape, record) = result.map_err(|e| MetroshareError::Format {
                format: "Shapefile".to_string(),
                message: format!("failed to read feature {}: {}", ordinal, e),
            })?;

            let multi_polygon: MultiPolygon<f64> = match shape {
                Shape::Polygon(p) => convert_polygon(p, ordinal)?,
                Shape::PolygonM(p) => convert_polygon(p, ordinal)?,
                Shape::PolygonZ(p) => convert_polygon(p, ordinal)?,
                // Boundary sets are polygonal; anything else is skipped
                _ => continue,
            };

            let region_name = name_field
                .and_then(|field| match record.get(field) {
                    Some(FieldValue::Character(Some(s))) => Some(s.trim().to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| ordinal.to_string());

            if let Some(geometry) =
                from_geo_geometry(&geo::Geometry::MultiPolygon(multi_polygon))
            {
                collection.regions.push(BoundaryRegion { name: region_name, geometry });
            }
        }

        Ok(collection)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["shp"]
    }

    fn format_name(&self) -> &str {
        "Shapefile"
    }
}

fn convert_polygon<T>(polygon: T, ordinal: usize) -> Result<MultiPolygon<f64>>
where
    T: TryInto<MultiPolygon<f64>>,
    T::Error: std::fmt::Debug,
{
    polygon.try_into().map_err(|e| MetroshareError::Format {
        format: "Shapefile".to_string(),
        message: format!("failed to convert polygon {}: {:?}", ordinal, e),
    })
}

fn shapefile_base(path: &Path) -> Result<PathBuf> {
    let is_shp = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("shp"))
        .unwrap_or(false);
    if !is_shp {
        return Err(MetroshareError::Format {
            format: "Shapefile".to_string(),
            message: format!("not a Shapefile (.shp): {}", path.display()),
        });
    }
    Ok(path.with_extension(""))
}

/// Verify the required component files exist.
///
/// .shp and .dbf are always required. A missing .shx is tolerated only when
/// the repair toggle is set, in which case shapes are read sequentially.
fn verify_components(base: &Path, restore_shx: bool) -> Result<()> {
    for ext in ["shp", "dbf"] {
        let component = base.with_extension(ext);
        if !component.exists() {
            return Err(MetroshareError::DataUnavailable {
                path: component,
                reason: format!("missing required .{} component", ext),
            });
        }
    }

    let shx = base.with_extension("shx");
    if !shx.exists() {
        if restore_shx {
            tracing::warn!(
                path = %shx.display(),
                "missing .shx index, reading shapes sequentially ({} is set)",
                RESTORE_SHX_ENV
            );
        } else {
            return Err(MetroshareError::Format {
                format: "Shapefile".to_string(),
                message: format!(
                    "missing .shx index at {}; set {}=1 to read without it",
                    shx.display(),
                    RESTORE_SHX_ENV
                ),
            });
        }
    }

    Ok(())
}

fn restore_requested(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

/// Extract the EPSG code from the .prj sidecar, if any.
///
/// `None` means the file is absent or carries no recognizable EPSG
/// authority; the caller decides whether a fallback CRS applies.
fn read_prj_epsg(base: &Path) -> Result<Option<u32>> {
    let prj_path = base.with_extension("prj");
    if !prj_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&prj_path).map_err(|e| MetroshareError::Format {
        format: "Shapefile".to_string(),
        message: format!("failed to read .prj file: {}", e),
    })?;

    let epsg = parse_epsg_from_wkt(&content);
    if epsg.is_none() {
        tracing::warn!(
            path = %prj_path.display(),
            "projection definition carries no EPSG authority code"
        );
    }
    Ok(epsg)
}

/// Parse an EPSG code out of a projection WKT string
fn parse_epsg_from_wkt(wkt: &str) -> Option<u32> {
    // AUTHORITY["EPSG","4326"] (WKT1) or ID["EPSG",4326] (WKT2)
    for marker in ["AUTHORITY[\"EPSG\",\"", "ID[\"EPSG\","] {
        if let Some(start) = wkt.rfind(marker) {
            let digits: String = wkt[start + marker.len()..]
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(code) = digits.parse::<u32>() {
                return Some(code);
            }
        }
    }

    // Bare EPSG:NNNN prefix
    if let Some(start) = wkt.find("EPSG:") {
        let digits: String =
            wkt[start + 5..].chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(code) = digits.parse::<u32>() {
            return Some(code);
        }
    }

    None
}
