//! CRS transformation and normalization

use proj::Proj;

use crate::error::{MetroshareError, Result};
use crate::models::boundary::BoundaryCollection;
use crate::models::geometry::{Crs, Geometry};

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.epsg == crs2.epsg
}

/// Reproject a geometry from one CRS to another.
///
/// Same-CRS input returns a clone without touching the projection backend.
pub fn reproject_geometry(geometry: &Geometry, from: &Crs, to: &Crs) -> Result<Geometry> {
    if crs_match(from, to) {
        return Ok(geometry.clone());
    }

    let from_code = format!("EPSG:{}", from.epsg);
    let to_code = format!("EPSG:{}", to.epsg);
    let proj = Proj::new_known_crs(&from_code, &to_code, None).map_err(|e| {
        MetroshareError::Projection {
            from: from_code.clone(),
            to: to_code.clone(),
            reason: e.to_string(),
        }
    })?;

    let convert = |coord: &[f64; 2]| -> Result<[f64; 2]> {
        proj.convert((coord[0], coord[1])).map(|(x, y)| [x, y]).map_err(|e| {
            MetroshareError::Projection {
                from: from_code.clone(),
                to: to_code.clone(),
                reason: e.to_string(),
            }
        })
    };

    let transformed = match geometry {
        Geometry::Point { coordinates } => Geometry::Point { coordinates: convert(coordinates)? },
        Geometry::Polygon { coordinates } => {
            Geometry::Polygon { coordinates: convert_rings(coordinates, &convert)? }
        }
        Geometry::MultiPolygon { coordinates } => {
            let polygons: Result<Vec<_>> =
                coordinates.iter().map(|rings| convert_rings(rings, &convert)).collect();
            Geometry::MultiPolygon { coordinates: polygons? }
        }
    };

    Ok(transformed)
}

fn convert_rings(
    rings: &[Vec<[f64; 2]>],
    convert: &dyn Fn(&[f64; 2]) -> Result<[f64; 2]>,
) -> Result<Vec<Vec<[f64; 2]>>> {
    rings
        .iter()
        .map(|ring| ring.iter().map(convert).collect::<Result<Vec<_>>>())
        .collect()
}

/// Normalize a boundary collection to the target CRS in place.
///
/// The declared CRS wins; absent that, `fallback` is assumed. A collection
/// with neither is fatal, since containment against misaligned frames would
/// silently produce wrong assignments. Normalizing an already-canonical
/// collection is a no-op, so the step is idempotent and can run at any
/// pipeline position.
pub fn normalize_collection(
    collection: &mut BoundaryCollection,
    fallback: Option<&Crs>,
    target: &Crs,
) -> Result<()> {
    let source = match (&collection.crs, fallback) {
        (Some(declared), _) => declared.clone(),
        (None, Some(assumed)) => {
            tracing::warn!(
                dataset = %collection.name,
                assumed = %assumed,
                "boundary set declares no CRS, assuming configured fallback"
            );
            assumed.clone()
        }
        (None, None) => {
            return Err(MetroshareError::CrsUndefined { dataset: collection.name.clone() })
        }
    };

    if crs_match(&source, target) {
        collection.crs = Some(source);
        return Ok(());
    }

    tracing::debug!(
        dataset = %collection.name,
        from = %source,
        to = %target,
        regions = collection.regions.len(),
        "reprojecting boundary set"
    );
    for region in &mut collection.regions {
        region.geometry = reproject_geometry(&region.geometry, &source, target)?;
    }
    collection.crs = Some(target.clone());

    Ok(())
}
