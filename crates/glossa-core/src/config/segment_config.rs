use serde::{Deserialize, Serialize};

use super::defaults;

/// Segment discovery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Shortest segment length in characters.
    pub min_segment_len: usize,
    /// Longest segment length in characters; longer merges are never formed.
    pub max_segment_len: usize,
    /// Adjacent-pair count at which two tokens merge into a segment.
    pub merge_threshold: u32,
    /// Hard cap on live vocabulary segments.
    pub vocabulary_cap: usize,
    /// Hard cap on tracked merge candidates (pairs).
    pub pair_table_cap: usize,
    /// Confidence assigned to a freshly merged segment.
    pub initial_confidence: f64,
    /// EMA rate applied to "confirmed useful" signals.
    pub confidence_decay: f64,
    /// Segments below this confidence start their grace period.
    pub confidence_floor: f64,
    /// Observations a segment may stay below the floor before eviction.
    pub grace_period: u64,
    /// Observations between floor sweeps.
    pub sweep_interval: u64,
    /// Characters retained per stream for matching.
    pub buffer_len: usize,
    /// Evicted segments kept for restore; 0 disables the archive.
    pub archive_cap: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_segment_len: defaults::DEFAULT_MIN_SEGMENT_LEN,
            max_segment_len: defaults::DEFAULT_MAX_SEGMENT_LEN,
            merge_threshold: defaults::DEFAULT_MERGE_THRESHOLD,
            vocabulary_cap: defaults::DEFAULT_VOCABULARY_CAP,
            pair_table_cap: defaults::DEFAULT_PAIR_TABLE_CAP,
            initial_confidence: defaults::DEFAULT_INITIAL_CONFIDENCE,
            confidence_decay: defaults::DEFAULT_CONFIDENCE_DECAY,
            confidence_floor: defaults::DEFAULT_CONFIDENCE_FLOOR,
            grace_period: defaults::DEFAULT_GRACE_PERIOD,
            sweep_interval: defaults::DEFAULT_SWEEP_INTERVAL,
            buffer_len: defaults::DEFAULT_BUFFER_LEN,
            archive_cap: defaults::DEFAULT_ARCHIVE_CAP,
        }
    }
}
