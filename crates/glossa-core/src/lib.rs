//! # glossa-core
//!
//! Foundation crate for the Glossa predictive core.
//! Defines the shared models, capability traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::GlossaConfig;
pub use errors::{Condition, GlossaError, GlossaResult};
pub use models::{
    Candidate, CharDistribution, Outcome, PredictionId, PredictionMode, RankedCandidates,
    SegmentId, SegmentMatch, Source, StreamId,
};
