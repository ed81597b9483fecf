//! Store error types.

use std::path::PathBuf;

/// Errors from durable store writes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Key does not match `^[A-Za-z0-9_-]{1,64}$`.
    #[error("invalid store key {0:?}: must match [A-Za-z0-9_-], 1-64 chars")]
    InvalidKey(String),
    /// Record could not be serialized.
    #[error("failed to serialize record for {key}: {source}")]
    Serialization {
        key: String,
        source: serde_json::Error,
    },
}
