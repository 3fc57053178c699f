//! Capability traits at the seams between subsystems.
//! The hybrid predictor consumes sources only through these.

pub mod char_predictor;
pub mod segment_feedback;
pub mod segment_provider;
pub mod snapshot_store;

pub use char_predictor::ICharPredictor;
pub use segment_feedback::ISegmentFeedback;
pub use segment_provider::ISegmentProvider;
pub use snapshot_store::ISnapshotStore;
