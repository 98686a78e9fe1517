//! Bounding-box index over a boundary collection.
//!
//! Containment queries are a full O(points × polygons) scan at heart; the
//! R-tree narrows the candidate set per point. Candidates are re-sorted by
//! declared ordinal before the exact test, so the first-match-by-declared-
//! order contract of the resolver is preserved.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::contains::Contains;
use geo::Geometry as GeoGeometry;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::models::boundary::BoundaryCollection;
use crate::models::geometry::to_geo_geometry;

/// Bounding box of one region, keyed by its declared position
#[derive(Debug, Clone, PartialEq)]
struct RegionEnvelope {
    ordinal: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for RegionEnvelope {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope.distance_2(point)
    }
}

/// Containment index over a boundary collection.
///
/// Holds the converted `geo` geometries alongside the tree so each region
/// is converted once per run rather than once per point.
pub struct RegionIndex {
    tree: RTree<RegionEnvelope>,
    geometries: Vec<GeoGeometry>,
    names: Vec<String>,
}

impl RegionIndex {
    /// Build an index from a boundary collection, preserving declared order
    pub fn build(collection: &BoundaryCollection) -> Self {
        let mut envelopes = Vec::with_capacity(collection.regions.len());
        let mut geometries = Vec::with_capacity(collection.regions.len());
        let mut names = Vec::with_capacity(collection.regions.len());

        for (ordinal, region) in collection.regions.iter().enumerate() {
            let geometry = to_geo_geometry(&region.geometry);
            if let Some(rect) = geometry.bounding_rect() {
                let min = rect.min();
                let max = rect.max();
                envelopes.push(RegionEnvelope {
                    ordinal,
                    envelope: AABB::from_corners([min.x, min.y], [max.x, max.y]),
                });
            }
            // Degenerate (empty) regions get no envelope; they can never
            // contain a point, but their ordinal slot is kept so candidate
            // ordering stays aligned with the collection.
            geometries.push(geometry);
            names.push(region.name.clone());
        }

        Self { tree: RTree::bulk_load(envelopes), geometries, names }
    }

    /// Name of the first declared region containing the point, if any.
    ///
    /// Whether a point exactly on a region border counts as contained is
    /// whatever `geo`'s `Contains` defines; callers must not rely on either
    /// behavior.
    pub fn locate(&self, longitude: f64, latitude: f64) -> Option<&str> {
        let point = geo::Point::new(longitude, latitude);

        let mut candidates: Vec<usize> = self
            .tree
            .locate_all_at_point(&[longitude, latitude])
            .map(|e| e.ordinal)
            .collect();
        candidates.sort_unstable();

        candidates
            .into_iter()
            .find(|&ordinal| self.geometries[ordinal].contains(&point))
            .map(|ordinal| self.names[ordinal].as_str())
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::boundary::BoundaryRegion;
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

    fn collection(regions: Vec<BoundaryRegion>) -> BoundaryCollection {
        let mut coll = BoundaryCollection::new("test", Some(Crs::wgs84()));
        coll.regions = regions;
        coll
    }

    #[test]
    fn test_locate_inside_and_outside() {
        let index = RegionIndex::build(&collection(vec![square("A", 0.0, 10.0)]));
        assert_eq!(index.locate(5.0, 5.0), Some("A"));
        assert_eq!(index.locate(15.0, 15.0), None);
    }

    #[test]
    fn test_overlap_resolves_to_first_declared() {
        // B overlaps A; A is declared first and must win in the overlap
        let index = RegionIndex::build(&collection(vec![
            square("B", 4.0, 20.0),
            square("A", 0.0, 10.0),
        ]));
        assert_eq!(index.locate(5.0, 5.0), Some("B"));

        let index = RegionIndex::build(&collection(vec![
            square("A", 0.0, 10.0),
            square("B", 4.0, 20.0),
        ]));
        assert_eq!(index.locate(5.0, 5.0), Some("A"));
        assert_eq!(index.locate(15.0, 15.0), Some("B"));
    }

    #[test]
    fn test_bbox_overlap_without_containment() {
        // Triangle whose bbox covers the query point, but the geometry
        // itself does not
        let triangle = BoundaryRegion {
            name: "T".into(),
            geometry: Geometry::polygon(vec![vec![
                [0.0, 0.0],
                [10.0, 0.0],
                [0.0, 10.0],
                [0.0, 0.0],
            ]]),
        };
        let index = RegionIndex::build(&collection(vec![triangle]));
        assert_eq!(index.locate(9.0, 9.0), None);
        assert_eq!(index.locate(1.0, 1.0), Some("T"));
    }

    #[test]
    fn test_empty_collection() {
        let index = RegionIndex::build(&collection(vec![]));
        assert!(index.is_empty());
        assert_eq!(index.locate(0.0, 0.0), None);
    }

    #[test]
    fn test_multi_polygon_region() {
        let region = BoundaryRegion {
            name: "M".into(),
            geometry: Geometry::multi_polygon(vec![
                vec![vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]],
                vec![vec![[8.0, 8.0], [9.0, 8.0], [9.0, 9.0], [8.0, 9.0], [8.0, 8.0]]],
            ]),
        };
        let index = RegionIndex::build(&collection(vec![region]));
        assert_eq!(index.locate(1.0, 1.0), Some("M"));
        assert_eq!(index.locate(8.5, 8.5), Some("M"));
        assert_eq!(index.locate(5.0, 5.0), None);
    }
}
