//! Metroshare Core - spatial assignment and aggregation pipeline
//!
//! Loads retail point records and metro boundary polygons, normalizes
//! coordinate reference systems, tags each point with its containing region,
//! and aggregates tagged points into per-region market-share tables.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod formats;
pub mod geo;
pub mod models;
pub mod pipeline;

pub use error::{MetroshareError, Result};
pub use geo::resolve::OUTSIDE_METRO;
pub use pipeline::{BoundaryMode, PipelineRun};
