//! Shared value types exchanged between the character model, the segment
//! discoverer, the hybrid predictor, and the performance tracker.

pub mod candidate;
pub mod distribution;
pub mod ids;
pub mod mode;
pub mod outcome;
pub mod segment_match;
pub mod source;

pub use candidate::{Candidate, RankedCandidates};
pub use distribution::CharDistribution;
pub use ids::{PredictionId, SegmentId, StreamId};
pub use mode::PredictionMode;
pub use outcome::Outcome;
pub use segment_match::SegmentMatch;
pub use source::Source;
