//! # glossa-engine
//!
//! Multi-stream front end for the predictive core. Streams own their
//! character history and segment buffer; the context table, the segment
//! vocabulary, and the performance tracker are shared behind locks.
//!
//! Lock order: stream → context table → vocabulary, and stream → tracker.
//! The tracker lock is never held together with the context table or the
//! vocabulary.

pub mod engine;
pub mod report;
pub mod snapshot;
pub mod store;
pub mod stream;

pub use engine::GlossaEngine;
pub use report::{ObserveReport, Prediction};
pub use snapshot::Snapshot;
pub use store::{FileSnapshotStore, MemorySnapshotStore};
pub use stream::StreamState;

pub use glossa_core::{GlossaConfig, GlossaError, GlossaResult};
pub use glossa_prediction::{FeedbackReport, FeedbackStatus};
