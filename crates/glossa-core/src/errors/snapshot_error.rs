//! Snapshot export/import errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while encoding, decoding, or storing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot serialization failed: {message}")]
    Serialize { message: String },

    #[error("snapshot deserialization failed: {message}")]
    Deserialize { message: String },

    #[error("snapshot version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("snapshot config rejected: {message}")]
    IncompatibleConfig { message: String },

    #[error("snapshot I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no snapshot stored")]
    Missing,
}

impl ErrorCode for SnapshotError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::VersionMismatch { .. } => error_code::SNAPSHOT_VERSION,
            Self::Io { .. } | Self::Missing => error_code::SNAPSHOT_IO,
            _ => error_code::SNAPSHOT_ERROR,
        }
    }
}
