//! Error Module
//!
//! Errors surfaced by the save/load and configuration paths.
//! The per-frame navigation path never fails: missing geometry, raycast misses
//! and zero-length transits are ordinary state, not errors.

use std::path::PathBuf;

/// Errors that can occur while saving, loading or configuring the showroom.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JPEG encoding of a frame capture failed.
    #[error("thumbnail encoding failed: {0}")]
    ImageEncode(#[from] image::ImageError),

    /// Frame capture buffer does not match its declared dimensions.
    #[error("frame capture is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    InvalidCapture {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// A save was requested while the core was not in editing mode.
    #[error("save is only available in editing mode")]
    NotEditing,

    /// A save was requested before the model loader supplied a collidable.
    #[error("no model loaded, nothing to save")]
    NoModelLoaded,

    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, NavError>;
