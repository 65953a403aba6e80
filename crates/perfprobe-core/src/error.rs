//! Error type shared across the crate.

use std::path::PathBuf;

/// Errors surfaced by the stores and the sampling loop.
///
/// Per-sample command failures and parse misses are never errors — they
/// degrade the affected field to absent. Only storage problems and failed
/// lookups reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("baseline not found: {0}")]
    BaselineNotFound(String),

    #[error("no session data found in {0}")]
    NoSessionData(PathBuf),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProbeError>;
