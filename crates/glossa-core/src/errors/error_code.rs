//! Stable error codes for callers that branch on error kind.

/// Trait for mapping an error or condition to a stable string code.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CAPACITY_EXCEEDED: &str = "CAPACITY_EXCEEDED";
pub const SNAPSHOT_ERROR: &str = "SNAPSHOT_ERROR";
pub const SNAPSHOT_VERSION: &str = "SNAPSHOT_VERSION";
pub const SNAPSHOT_IO: &str = "SNAPSHOT_IO";
pub const UNKNOWN_STREAM: &str = "UNKNOWN_STREAM";
pub const COLD_START: &str = "COLD_START";
pub const STALE_FEEDBACK: &str = "STALE_FEEDBACK";
pub const VOCABULARY_FULL: &str = "VOCABULARY_FULL";
