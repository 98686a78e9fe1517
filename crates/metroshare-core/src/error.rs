//! Error types for metroshare

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetroshareError {
    // Input errors
    #[error("Data unavailable: {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    #[error("{format} error: {message}")]
    Format { format: String, message: String },

    #[error("Unsupported boundary format: .{extension} (supported: {supported:?})")]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },

    // CRS errors
    #[error("Boundary set '{dataset}' declares no CRS and no fallback is configured")]
    CrsUndefined { dataset: String },

    #[error("CRS mismatch: {left} vs {right}")]
    CrsMismatch { left: String, right: String },

    #[error("Reprojection from {from} to {to} failed: {reason}")]
    Projection {
        from: String,
        to: String,
        reason: String,
    },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MetroshareError>;
