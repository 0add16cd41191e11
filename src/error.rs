//! # Error Types
//!
//! This module defines error types used throughout the certcanvas library.

use thiserror::Error;

/// Main error type for certcanvas operations
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Structurally malformed document (bad fields, duplicate ids, non-positive size)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// An image or QR source could not be resolved.
    ///
    /// Renderers recover from this locally by painting a placeholder; it never
    /// escapes `render`.
    #[error("Unresolved asset: {0}")]
    UnresolvedAsset(String),

    /// A configured resource bound was exceeded
    #[error("Resource limit exceeded: {what} is {actual}, limit is {limit}")]
    ResourceLimitExceeded {
        what: &'static str,
        actual: u64,
        limit: u64,
    },

    /// Image encoding or decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CanvasError {
    pub(crate) fn limit(what: &'static str, actual: u64, limit: u64) -> Self {
        CanvasError::ResourceLimitExceeded {
            what,
            actual,
            limit,
        }
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(e: serde_json::Error) -> Self {
        CanvasError::InvalidDocument(e.to_string())
    }
}

impl From<image::ImageError> for CanvasError {
    fn from(e: image::ImageError) -> Self {
        CanvasError::Image(e.to_string())
    }
}
