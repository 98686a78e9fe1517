//! Boundary filtering and the fine-against-coarse spatial join.

use geo::algorithm::intersects::Intersects;

use crate::error::{MetroshareError, Result};
use crate::models::boundary::{BoundaryCollection, BoundaryRegion};
use crate::models::geometry::to_geo_geometry;

/// Filter a boundary collection to an allow-list of region names.
///
/// Declared order is preserved. Zero matches is not an error: downstream
/// resolution degrades to an all-"Outside Metro" assignment and downstream
/// aggregation omits empty regions.
pub fn filter_by_names(collection: &BoundaryCollection, names: &[String]) -> BoundaryCollection {
    let regions: Vec<BoundaryRegion> = collection
        .regions
        .iter()
        .filter(|region| names.iter().any(|n| n == &region.name))
        .cloned()
        .collect();

    if regions.is_empty() {
        tracing::warn!(
            dataset = %collection.name,
            "allow-list matched no regions; all points will resolve outside"
        );
    }

    BoundaryCollection { name: collection.name.clone(), crs: collection.crs.clone(), regions }
}

/// Inner spatial join of a fine boundary set against a coarse one.
///
/// A fine polygon is kept if and only if it intersects at least one coarse
/// region. Each kept row carries the fine geometry and the name of the
/// intersecting coarse region, so a fine polygon touching N coarse regions
/// appears N times. Rows follow fine declared order, ties broken by coarse
/// declared order; the resolver's first-match policy then keeps a point in
/// an overlap from counting twice.
///
/// Both collections must already be normalized to the same CRS.
pub fn intersect_join(
    fine: &BoundaryCollection,
    coarse: &BoundaryCollection,
) -> Result<BoundaryCollection> {
    match (&fine.crs, &coarse.crs) {
        (Some(left), Some(right)) if left.epsg == right.epsg => {}
        (left, right) => {
            return Err(MetroshareError::CrsMismatch {
                left: left.as_ref().map_or("undefined".to_string(), |c| c.to_string()),
                right: right.as_ref().map_or("undefined".to_string(), |c| c.to_string()),
            });
        }
    }

    let coarse_geoms: Vec<_> =
        coarse.regions.iter().map(|r| to_geo_geometry(&r.geometry)).collect();

    let mut regions = Vec::new();
    for fine_region in &fine.regions {
        let fine_geom = to_geo_geometry(&fine_region.geometry);
        for (coarse_region, coarse_geom) in coarse.regions.iter().zip(&coarse_geoms) {
            if fine_geom.intersects(coarse_geom) {
                regions.push(BoundaryRegion {
                    name: coarse_region.name.clone(),
                    geometry: fine_region.geometry.clone(),
                });
            }
        }
    }

    tracing::debug!(
        fine = fine.regions.len(),
        coarse = coarse.regions.len(),
        joined = regions.len(),
        "intersect join complete"
    );

    Ok(BoundaryCollection { name: fine.name.clone(), crs: fine.crs.clone(), regions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geometry::{Crs, Geometry};

    fn square(name: &str, min: f64, max: f64) -> BoundaryRegion {
        BoundaryRegion {
            name: name.into(),
            geometry: Geometry::polygon(vec![vec![
                [min, min],
                [max, min],
                [max, max],
                [min, max],
                [min, min],
            ]]),
        }
    }

    fn collection(name: &str, regions: Vec<BoundaryRegion>) -> BoundaryCollection {
        let mut coll = BoundaryCollection::new(name, Some(Crs::wgs84()));
        coll.regions = regions;
        coll
    }

    #[test]
    fn test_filter_keeps_allowed_names_in_order() {
        let coll = collection(
            "coarse",
            vec![square("Albury", 0.0, 1.0), square("Sydney", 2.0, 3.0), square("Melbourne", 4.0, 5.0)],
        );
        let allowed = vec!["Sydney".to_string(), "Melbourne".to_string()];
        let filtered = filter_by_names(&coll, &allowed);
        assert_eq!(filtered.names(), vec!["Sydney", "Melbourne"]);
        assert_eq!(filtered.crs, coll.crs);
    }

    #[test]
    fn test_filter_with_no_matches_is_empty_not_error() {
        let coll = collection("coarse", vec![square("Albury", 0.0, 1.0)]);
        let filtered = filter_by_names(&coll, &["Sydney".to_string()]);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_join_keeps_intersecting_fine_polygons() {
        let coarse = collection("coarse", vec![square("Sydney", 0.0, 10.0)]);
        let fine = collection(
            "fine",
            vec![square("core-1", 2.0, 4.0), square("core-2", 50.0, 60.0)],
        );
        let joined = intersect_join(&fine, &coarse).unwrap();
        // Non-intersecting fine polygon dropped; kept row renamed to the
        // coarse region
        assert_eq!(joined.names(), vec!["Sydney"]);
        assert_eq!(joined.regions[0].geometry, fine.regions[0].geometry);
    }

    #[test]
    fn test_join_duplicates_fine_polygon_per_match() {
        let coarse = collection(
            "coarse",
            vec![square("Sydney", 0.0, 10.0), square("Melbourne", 8.0, 20.0)],
        );
        // One fine polygon straddling both coarse regions
        let fine = collection("fine", vec![square("core", 7.0, 11.0)]);
        let joined = intersect_join(&fine, &coarse).unwrap();
        assert_eq!(joined.names(), vec!["Sydney", "Melbourne"]);
    }

    #[test]
    fn test_join_against_empty_coarse_is_empty() {
        let coarse = collection("coarse", vec![]);
        let fine = collection("fine", vec![square("core", 0.0, 1.0)]);
        let joined = intersect_join(&fine, &coarse).unwrap();
        assert!(joined.is_empty());
    }

    #[test]
    fn test_join_rejects_mismatched_crs() {
        let mut coarse = collection("coarse", vec![square("Sydney", 0.0, 10.0)]);
        coarse.crs = Some(Crs::gda2020());
        let fine = collection("fine", vec![square("core", 0.0, 1.0)]);
        let err = intersect_join(&fine, &coarse).unwrap_err();
        assert!(matches!(err, MetroshareError::CrsMismatch { .. }));
    }

    #[test]
    fn test_join_rejects_undefined_crs() {
        let mut coarse = collection("coarse", vec![square("Sydney", 0.0, 10.0)]);
        coarse.crs = None;
        let fine = collection("fine", vec![square("core", 0.0, 1.0)]);
        assert!(intersect_join(&fine, &coarse).is_err());
    }
}
