//! GeoJSON boundary reader.

use std::fs;
use std::path::Path;

use crate::error::{MetroshareError, Result};
use crate::formats::BoundaryReader;
use crate::models::boundary::{BoundaryCollection, BoundaryRegion};
use crate::models::geometry::{from_geo_geometry, Crs};

pub struct GeoJsonBoundaryReader;

impl BoundaryReader for GeoJsonBoundaryReader {
    fn read(&self, path: &Path, name_field: Option<&str>) -> Result<BoundaryCollection> {
        let content = fs::read_to_string(path).map_err(|e| MetroshareError::DataUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let geojson: geojson::GeoJson =
            content.parse().map_err(|e| MetroshareError::Format {
                format: "GeoJSON".to_string(),
                message: format!("failed to parse GeoJSON: {}", e),
            })?;

        let fc = match geojson {
            geojson::GeoJson::FeatureCollection(fc) => fc,
            _ => {
                return Err(MetroshareError::Format {
                    format: "GeoJSON".to_string(),
                    message: "boundary file must be a FeatureCollection".to_string(),
                })
            }
        };

        // RFC 7946 fixes GeoJSON to WGS 84; a legacy `crs` member overrides
        let crs = fc
            .foreign_members
            .as_ref()
            .and_then(|fm| fm.get("crs"))
            .and_then(extract_epsg_from_crs)
            .map(Crs::from_epsg)
            .or_else(|| Some(Crs::wgs84()));

        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed").to_string();
        let mut collection = BoundaryCollection::new(name, crs);

        for (ordinal, feature) in fc.features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry else { continue };
            let geo_geom: geo::Geometry<f64> =
                match geometry.value.try_into() {
                    Ok(g) => g,
                    Err(e) => {
                        return Err(MetroshareError::Format {
                            format: "GeoJSON".to_string(),
                            message: format!("invalid geometry at feature {}: {:?}", ordinal, e),
                        })
                    }
                };

            // Keep polygonal features only
            let canonical = match &geo_geom {
                geo::Geometry::Polygon(_) | geo::Geometry::MultiPolygon(_) => {
                    match from_geo_geometry(&geo_geom) {
                        Some(g) => g,
                        None => continue,
                    }
                }
                _ => continue,
            };

            let region_name = name_field
                .and_then(|field| feature.properties.as_ref().and_then(|p| p.get(field)))
                .and_then(|value| match value {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| ordinal.to_string());

            collection.regions.push(BoundaryRegion { name: region_name, geometry: canonical });
        }

        Ok(collection)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "geojson"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

/// Pull an EPSG code out of a legacy GeoJSON `crs` member
fn extract_epsg_from_crs(crs: &serde_json::Value) -> Option<u32> {
    let name = crs.get("properties")?.get("name")?.as_str()?;

    // "EPSG:4326"
    if let Some(code) = name.strip_prefix("EPSG:") {
        return code.parse().ok();
    }
    // "urn:ogc:def:crs:EPSG::4326"
    if let Some(rest) = name.strip_prefix("urn:ogc:def:crs:EPSG:") {
        return rest.trim_start_matches(':').parse().ok();
    }
    // "urn:ogc:def:crs:OGC:1.3:CRS84" is WGS 84 in lon/lat order
    if name.ends_with("CRS84") {
        return Some(4326);
    }

    None
}
