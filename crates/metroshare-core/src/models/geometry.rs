//! Canonical geometry types.
//!
//! These types bridge GeoJSON serialization and the computational `geo`
//! crate types. The pipeline only deals in points and (multi)polygons.

use geo::Geometry as GeoGeometry;
use serde::{Deserialize, Serialize};

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into() }
    }

    /// WGS 84 (EPSG:4326), the canonical frame for all spatial operations
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// GDA2020 geographic (EPSG:7844), the usual frame of Australian
    /// boundary releases that ship without projection metadata
    pub fn gda2020() -> Self {
        Self::new(7844, "GDA2020")
    }

    /// Build a CRS from a bare EPSG code
    pub fn from_epsg(epsg: u32) -> Self {
        match epsg {
            4326 => Self::wgs84(),
            7844 => Self::gda2020(),
            other => Self::new(other, format!("EPSG:{}", other)),
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{} ({})", self.epsg, self.name)
    }
}

/// GeoJSON-compatible geometry representation
///
/// Serializes directly as a GeoJSON geometry object. Line geometries are
/// out of scope for the pipeline and are dropped at the format readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry from longitude/latitude
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a Polygon geometry from rings (exterior first)
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(rings_to_polygon(coordinates)),
        Geometry::MultiPolygon { coordinates } => {
            let polygons: Vec<geo::Polygon> = coordinates.iter().map(rings_to_polygon).collect();
            GeoGeometry::MultiPolygon(geo::MultiPolygon::new(polygons))
        }
    }
}

fn rings_to_polygon(rings: &Vec<Vec<[f64; 2]>>) -> geo::Polygon {
    let mut lines: Vec<geo::LineString> = rings
        .iter()
        .map(|ring| {
            let coords: Vec<geo::Coord> =
                ring.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect();
            geo::LineString::new(coords)
        })
        .collect();
    if lines.is_empty() {
        geo::Polygon::new(geo::LineString::new(vec![]), vec![])
    } else {
        let exterior = lines.remove(0);
        geo::Polygon::new(exterior, lines)
    }
}

/// Convert a geo::Geometry to a canonical Geometry
///
/// Returns `None` for geometry kinds the pipeline has no use for
/// (lines, collections).
pub fn from_geo_geometry(geom: &GeoGeometry) -> Option<Geometry> {
    match geom {
        GeoGeometry::Point(p) => Some(Geometry::Point { coordinates: [p.x(), p.y()] }),
        GeoGeometry::Polygon(p) => Some(Geometry::Polygon { coordinates: polygon_to_rings(p) }),
        GeoGeometry::MultiPolygon(mp) => Some(Geometry::MultiPolygon {
            coordinates: mp.iter().map(polygon_to_rings).collect(),
        }),
        GeoGeometry::Rect(r) => from_geo_geometry(&GeoGeometry::Polygon(r.to_polygon())),
        GeoGeometry::Triangle(t) => from_geo_geometry(&GeoGeometry::Polygon(t.to_polygon())),
        _ => None,
    }
}

fn polygon_to_rings(p: &geo::Polygon) -> Vec<Vec<[f64; 2]>> {
    let mut rings = Vec::with_capacity(1 + p.interiors().len());
    rings.push(p.exterior().coords().map(|c| [c.x, c.y]).collect());
    for interior in p.interiors() {
        rings.push(interior.coords().map(|c| [c.x, c.y]).collect());
    }
    rings
}
