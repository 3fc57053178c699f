use crate::models::SegmentMatch;

/// Read-only view of the segments applicable at a stream position.
///
/// Overlapping matches of different lengths are all returned; resolving
/// between them is the consumer's job.
pub trait ISegmentProvider {
    /// Every segment aligned with the stream ending at `position`,
    /// longest segment first.
    fn segments_at(&self, position: u64) -> Vec<SegmentMatch>;

    /// Current stream position (characters observed so far).
    fn position(&self) -> u64;
}
