//! Error types for the geoqc library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for geoqc operations.
#[derive(Debug, Error)]
pub enum GeoQcError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a LAS file.
    #[error("LAS parse error at line {line}: {message}")]
    LasParse { line: usize, message: String },

    /// LAS file contains no curve data.
    #[error("Empty LAS file: {0}")]
    EmptyLas(String),

    /// Structurally invalid or truncated SEG-Y file.
    #[error("SEG-Y error: {0}")]
    Segy(String),

    /// SEG-Y file lacks usable 3D inline/crossline geometry.
    #[error("No 3D geometry: {0}")]
    NoGeometry(String),

    /// Malformed curve configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geoqc operations.
pub type Result<T> = std::result::Result<T, GeoQcError>;

impl GeoQcError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeoQcError::Io {
            path: path.into(),
            source,
        }
    }
}
