//! Error handling for Glossa.
//! One error enum per concern, `thiserror` only, zero `anyhow`.
//!
//! Steady-state ingestion and prediction never fail: their soft outcomes are
//! [`Condition`]s carried in return values. Only configuration and snapshot
//! handling produce hard errors.

pub mod condition;
pub mod config_error;
pub mod error_code;
pub mod glossa_error;
pub mod snapshot_error;

pub use condition::Condition;
pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use glossa_error::{GlossaError, GlossaResult};
pub use snapshot_error::SnapshotError;
