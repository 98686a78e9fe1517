//! Boundary polygon collections.

use geojson::{Feature, FeatureCollection, GeoJson};
use serde::{Deserialize, Serialize};

use crate::models::geometry::{to_geo_geometry, Crs, Geometry};

/// A named region polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRegion {
    pub name: String,
    pub geometry: Geometry,
}

/// An ordered collection of boundary regions sharing one CRS.
///
/// Iteration order is the declared order of the source dataset and is
/// significant: the region resolver assigns the first containing region.
/// `crs` is `None` when the source carried no reference system metadata;
/// such a collection must be normalized with a fallback CRS before any
/// containment query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCollection {
    pub name: String,
    pub crs: Option<Crs>,
    pub regions: Vec<BoundaryRegion>,
}

impl BoundaryCollection {
    pub fn new(name: impl Into<String>, crs: Option<Crs>) -> Self {
        Self { name: name.into(), crs, regions: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region names in declared order (duplicates preserved)
    pub fn names(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.name.as_str()).collect()
    }

    /// Serializable GeoJSON rendition for overlay rendering.
    ///
    /// Each region becomes a feature with a `metro_area` property. Opaque
    /// to the pipeline itself; consumers feed it to whatever map layer they
    /// use.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .regions
            .iter()
            .map(|region| {
                let mut properties = serde_json::Map::new();
                properties.insert(
                    "metro_area".to_string(),
                    serde_json::Value::String(region.name.clone()),
                );
                let value = geojson::Value::from(&to_geo_geometry(&region.geometry));
                Feature {
                    bbox: None,
                    geometry: Some(geojson::Geometry::new(value)),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection { bbox: None, features, foreign_members: None }
    }

    /// GeoJSON text of [`Self::to_feature_collection`]
    pub fn to_geojson_string(&self) -> String {
        GeoJson::FeatureCollection(self.to_feature_collection()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sydney_square() -> Geometry {
        Geometry::polygon(vec![vec![
            [150.5, -34.2],
            [151.5, -34.2],
            [151.5, -33.5],
            [150.5, -33.5],
            [150.5, -34.2],
        ]])
    }

    #[test]
    fn test_names_preserve_order_and_duplicates() {
        let mut coll = BoundaryCollection::new("test", Some(Crs::wgs84()));
        coll.regions.push(BoundaryRegion { name: "Sydney".into(), geometry: sydney_square() });
        coll.regions.push(BoundaryRegion { name: "Sydney".into(), geometry: sydney_square() });
        assert_eq!(coll.names(), vec!["Sydney", "Sydney"]);
    }

    #[test]
    fn test_feature_collection_carries_region_names() {
        let mut coll = BoundaryCollection::new("test", Some(Crs::wgs84()));
        coll.regions.push(BoundaryRegion { name: "Sydney".into(), geometry: sydney_square() });

        let fc = coll.to_feature_collection();
        assert_eq!(fc.features.len(), 1);
        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["metro_area"], "Sydney");
        assert!(fc.features[0].geometry.is_some());
    }

    #[test]
    fn test_geojson_string_parses_back() {
        let mut coll = BoundaryCollection::new("test", Some(Crs::wgs84()));
        coll.regions.push(BoundaryRegion { name: "Sydney".into(), geometry: sydney_square() });

        let text = coll.to_geojson_string();
        let parsed: GeoJson = text.parse().unwrap();
        assert!(matches!(parsed, GeoJson::FeatureCollection(_)));
    }
}
