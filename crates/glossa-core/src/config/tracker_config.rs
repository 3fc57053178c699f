use serde::{Deserialize, Serialize};

use super::defaults;

/// Performance tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// EMA rate (α) for source weights and decaying accuracy.
    pub learning_rate: f64,
    /// No source weight is allowed below this share after renormalisation.
    pub weight_floor: f64,
    /// Outstanding predictions kept for feedback; older ones expire.
    pub max_pending: usize,
    /// Seconds an issued prediction waits for feedback before expiring.
    pub pending_ttl_secs: u64,
    /// Evaluations each source needs before a mode is recommended.
    pub min_samples: u64,
    /// Segments with per-segment outcome metrics; least recently judged drop first.
    pub segment_metrics_cap: usize,
    /// Judgements a segment needs before it is ranked or recommended.
    pub segment_min_samples: u64,
    /// Decaying accuracy at which a segment is recommended.
    pub segment_accuracy_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            weight_floor: defaults::DEFAULT_WEIGHT_FLOOR,
            max_pending: defaults::DEFAULT_MAX_PENDING,
            pending_ttl_secs: defaults::DEFAULT_PENDING_TTL_SECS,
            min_samples: defaults::DEFAULT_MIN_SAMPLES,
            segment_metrics_cap: defaults::DEFAULT_SEGMENT_METRICS_CAP,
            segment_min_samples: defaults::DEFAULT_SEGMENT_MIN_SAMPLES,
            segment_accuracy_threshold: defaults::DEFAULT_SEGMENT_ACCURACY_THRESHOLD,
        }
    }
}
