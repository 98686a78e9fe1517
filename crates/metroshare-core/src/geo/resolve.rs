//! Region resolution: tag each point with its containing metro area.

use crate::geo::index::RegionIndex;
use crate::models::boundary::BoundaryCollection;
use crate::models::point::{PointRecord, TaggedPoint};

/// Label assigned to points not contained by any kept region polygon
pub const OUTSIDE_METRO: &str = "Outside Metro";

/// Assign each point the name of the first declared region containing it.
///
/// Every point gets exactly one label: a region name from `boundaries` or
/// [`OUTSIDE_METRO`]. An empty boundary collection tags everything outside.
pub fn assign_regions(points: Vec<PointRecord>, boundaries: &BoundaryCollection) -> Vec<TaggedPoint> {
    let index = RegionIndex::build(boundaries);

    let mut outside = 0usize;
    let tagged: Vec<TaggedPoint> = points
        .into_iter()
        .map(|record| {
            let metro_area = match index.locate(record.longitude, record.latitude) {
                Some(name) => name.to_string(),
                None => {
                    outside += 1;
                    OUTSIDE_METRO.to_string()
                }
            };
            TaggedPoint { record, metro_area }
        })
        .collect();

    tracing::debug!(
        points = tagged.len(),
        outside,
        regions = boundaries.len(),
        "region assignment complete"
    );

    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::boundary::BoundaryRegion;
    use crate::models::geometry::{Crs, Geometry};

    fn point(name: &str, longitude: f64, latitude: f64) -> PointRecord {
        PointRecord {
            name: name.into(),
            categories: "Pharmacy".into(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            postcode: String::new(),
            corporate: "SIG".into(),
            corporate_two: "Mergeco".into(),
            latitude,
            longitude,
        }
    }

    fn sydney_boundaries() -> BoundaryCollection {
        let mut coll = BoundaryCollection::new("coarse", Some(Crs::wgs84()));
        coll.regions.push(BoundaryRegion {
            name: "Sydney".into(),
            geometry: Geometry::polygon(vec![vec![
                [150.5, -34.2],
                [151.5, -34.2],
                [151.5, -33.5],
                [150.5, -33.5],
                [150.5, -34.2],
            ]]),
        });
        coll
    }

    #[test]
    fn test_sydney_point_tagged_far_south_outside() {
        let points = vec![point("inside", 151.21, -33.87), point("far-south", 0.0, -90.0)];
        let tagged = assign_regions(points, &sydney_boundaries());

        assert_eq!(tagged[0].metro_area, "Sydney");
        assert_eq!(tagged[1].metro_area, OUTSIDE_METRO);
    }

    #[test]
    fn test_every_point_gets_exactly_one_known_label() {
        let boundaries = sydney_boundaries();
        let points =
            vec![point("a", 151.0, -33.9), point("b", 140.0, -20.0), point("c", 151.2, -34.0)];
        let tagged = assign_regions(points, &boundaries);

        assert_eq!(tagged.len(), 3);
        for t in &tagged {
            assert!(
                t.metro_area == OUTSIDE_METRO
                    || boundaries.names().contains(&t.metro_area.as_str())
            );
        }
    }

    #[test]
    fn test_empty_boundary_set_tags_everything_outside() {
        let empty = BoundaryCollection::new("coarse", Some(Crs::wgs84()));
        let tagged = assign_regions(vec![point("a", 151.21, -33.87)], &empty);
        assert_eq!(tagged[0].metro_area, OUTSIDE_METRO);
    }

    #[test]
    fn test_overlapping_duplicate_regions_resolve_once() {
        // Join output can carry two rows with the same name and overlapping
        // geometry; a point in the overlap must resolve to a single label.
        let mut coll = sydney_boundaries();
        let duplicate = coll.regions[0].clone();
        coll.regions.push(duplicate);

        let tagged = assign_regions(vec![point("a", 151.21, -33.87)], &coll);
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].metro_area, "Sydney");
    }
}
