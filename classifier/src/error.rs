//! Error types for snapshot loading
//!
//! Classification itself never fails; an incomplete protocol is reported as
//! [`ReviewType::InsufficientInfo`](crate::ReviewType::InsufficientInfo).
//! These errors cover reading a snapshot from disk or text.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for snapshot loading
pub type Result<T> = std::result::Result<T, ScreenError>;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("Failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot JSON: {source}")]
    SnapshotParseJson { source: serde_json::Error },

    #[error("Failed to parse snapshot TOML: {source}")]
    SnapshotParseToml { source: toml::de::Error },

    #[error("Unsupported snapshot format for {path} (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },
}

impl ScreenError {
    /// Whether the error came from the snapshot contents rather than the filesystem.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ScreenError::SnapshotParseJson { .. } | ScreenError::SnapshotParseToml { .. }
        )
    }
}
