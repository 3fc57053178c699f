use serde::{Deserialize, Serialize};

use glossa_core::constants::HIGH_CONFIDENCE;

use crate::vocabulary::SegmentVocabulary;

/// Snapshot of vocabulary health.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VocabularyStats {
    pub live_segments: usize,
    pub merges: u64,
    pub evictions: u64,
    pub pair_candidates: usize,
    pub archived: usize,
    pub max_segment_len: usize,
    pub avg_segment_len: f64,
    pub avg_confidence: f64,
    /// Segments at or above the high-confidence mark.
    pub high_confidence: usize,
}

impl VocabularyStats {
    pub fn collect(vocab: &SegmentVocabulary) -> Self {
        let mut stats = Self {
            live_segments: vocab.len(),
            merges: vocab.merges,
            evictions: vocab.evictions,
            pair_candidates: vocab.pairs().len(),
            archived: vocab.archive().len(),
            ..Self::default()
        };
        if vocab.is_empty() {
            return stats;
        }

        let mut total_len = 0usize;
        let mut total_confidence = 0.0;
        for (_, segment) in vocab.iter() {
            total_len += segment.len();
            total_confidence += segment.confidence;
            stats.max_segment_len = stats.max_segment_len.max(segment.len());
            if segment.confidence >= HIGH_CONFIDENCE {
                stats.high_confidence += 1;
            }
        }
        let n = vocab.len() as f64;
        stats.avg_segment_len = total_len as f64 / n;
        stats.avg_confidence = total_confidence / n;
        stats
    }
}
