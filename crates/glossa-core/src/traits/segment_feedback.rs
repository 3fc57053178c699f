use crate::models::SegmentId;

/// Receiver of "was this segment useful" signals from the tracker.
pub trait ISegmentFeedback {
    /// Fold one binary signal into the segment's confidence.
    /// Returns `false` when the id no longer resolves (evicted segment).
    fn record_signal(&mut self, id: SegmentId, useful: bool) -> bool;
}
