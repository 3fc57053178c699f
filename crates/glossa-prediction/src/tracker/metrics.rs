//! Per-source accuracy bookkeeping and mode recommendation.

use glossa_core::constants::MODE_SWITCH_MARGIN;
use glossa_core::{PredictionMode, Source};
use serde::{Deserialize, Serialize};

/// Evaluations in which one source contributed to the judged candidate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceMetrics {
    pub total: u64,
    pub correct: u64,
    /// EMA of correctness; recent feedback counts more.
    pub decaying_accuracy: f64,
    confidence_sum: f64,
}

impl SourceMetrics {
    pub fn record(&mut self, correct: bool, confidence: f64, rate: f64) {
        let c = if correct { 1.0 } else { 0.0 };
        self.decaying_accuracy = if self.total == 0 {
            c
        } else {
            self.decaying_accuracy * (1.0 - rate) + c * rate
        };
        self.total += 1;
        if correct {
            self.correct += 1;
        }
        self.confidence_sum += confidence;
    }

    /// Lifetime accuracy in [0, 1].
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }

    /// Mean probability of the judged candidates.
    pub fn average_confidence(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.confidence_sum / self.total as f64
    }
}

/// Aggregate tracker counters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackerMetrics {
    sources: [SourceMetrics; Source::COUNT],
    pub issued: u64,
    pub feedback_applied: u64,
    pub stale_feedback: u64,
    pub expired: u64,
}

impl TrackerMetrics {
    pub fn source(&self, source: Source) -> &SourceMetrics {
        &self.sources[source.index()]
    }

    pub(crate) fn source_mut(&mut self, source: Source) -> &mut SourceMetrics {
        &mut self.sources[source.index()]
    }

    /// Single-source mode when one source's decaying accuracy leads the
    /// other's by more than the switch margin, once both have `min_samples`
    /// evaluations; `Hybrid` otherwise.
    pub fn recommended_mode(&self, min_samples: u64) -> PredictionMode {
        let chars = self.source(Source::Character);
        let segments = self.source(Source::Segment);
        if chars.total < min_samples || segments.total < min_samples {
            return PredictionMode::Hybrid;
        }
        if segments.decaying_accuracy > chars.decaying_accuracy + MODE_SWITCH_MARGIN {
            PredictionMode::SegmentOnly
        } else if chars.decaying_accuracy > segments.decaying_accuracy + MODE_SWITCH_MARGIN {
            PredictionMode::CharacterOnly
        } else {
            PredictionMode::Hybrid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_decaying_accuracy() {
        let mut m = SourceMetrics::default();
        m.record(true, 0.4, 0.1);
        assert_eq!(m.decaying_accuracy, 1.0);
        m.record(false, 0.2, 0.1);
        assert!((m.decaying_accuracy - 0.9).abs() < 1e-12);
        assert_eq!(m.accuracy(), 0.5);
        assert!((m.average_confidence() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn recommendation_needs_samples_and_margin() {
        let mut metrics = TrackerMetrics::default();
        for _ in 0..5 {
            metrics.source_mut(Source::Segment).record(true, 0.5, 0.1);
            metrics.source_mut(Source::Character).record(false, 0.5, 0.1);
        }
        assert_eq!(metrics.recommended_mode(10), PredictionMode::Hybrid);
        assert_eq!(metrics.recommended_mode(5), PredictionMode::SegmentOnly);
    }
}
