//! Core value types shared across the pipeline.

pub mod boundary;
pub mod geometry;
pub mod point;
pub mod share;

pub use boundary::{BoundaryCollection, BoundaryRegion};
pub use geometry::{from_geo_geometry, to_geo_geometry, Crs, Geometry};
pub use point::{CategoryField, PointRecord, TaggedPoint};
pub use share::ShareTable;
