//! # glossa-prediction
//!
//! Hybrid predictor: fuses the character distribution and segment
//! continuations into one ranked candidate list, weighting each source.
//! Performance tracker: issues prediction ids, collects feedback, and adapts
//! the source weights and segment confidences. Outcomes are also kept per
//! segment, so the best-performing segments can be listed and analysed.

pub mod hybrid;
pub mod scoring;
pub mod tracker;
pub mod weights;

pub use hybrid::HybridPredictor;
pub use tracker::{
    Evidence, FeedbackReport, FeedbackStatus, PendingPrediction, PerformanceTracker,
    SegmentAnalysis, SegmentMetrics, SourceMetrics, TrackerMetrics, TrackerState,
};
pub use weights::SourceWeights;
