//! Error types.

use thiserror::Error;

/// Errors raised by the geometry core.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Unsupported shape kind for hit testing: {0}")]
    UnsupportedShapeKind(String),
    #[error("Invalid zoom factor: {0}")]
    InvalidZoom(f64),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
