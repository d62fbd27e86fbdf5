//! Error types for artifact-gc

use thiserror::Error;

/// Result type alias for garbage collection operations
pub type Result<T> = std::result::Result<T, GcError>;

/// Garbage collection error types
///
/// Only failures that abort a run live here. A missing target directory is
/// reported through the run report, and single-file deletion failures are
/// recorded in the eviction outcome.
#[derive(Error, Debug)]
pub enum GcError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("Scan error: {0}")]
    Walk(#[from] walkdir::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
