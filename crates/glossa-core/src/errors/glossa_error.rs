use super::error_code::{self, ErrorCode};
use super::{ConfigError, SnapshotError};

/// Top-level error for the Glossa predictive core.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum GlossaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("unknown stream: {stream_id}")]
    UnknownStream { stream_id: String },
}

impl ErrorCode for GlossaError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Snapshot(e) => e.error_code(),
            Self::UnknownStream { .. } => error_code::UNKNOWN_STREAM,
        }
    }
}

/// Convenience alias used across the workspace.
pub type GlossaResult<T> = Result<T, GlossaError>;
