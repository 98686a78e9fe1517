//! Spatial operations: CRS normalization, boundary filtering/joins, and
//! region resolution.

pub mod index;
pub mod join;
pub mod resolve;
pub mod transform;

pub use index::RegionIndex;
pub use join::{filter_by_names, intersect_join};
pub use resolve::{assign_regions, OUTSIDE_METRO};
pub use transform::{crs_match, normalize_collection, reproject_geometry};
