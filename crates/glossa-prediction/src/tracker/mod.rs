//! Performance tracker: prediction ids, feedback attribution, and source
//! re-weighting.

pub mod ledger;
pub mod metrics;
pub mod segments;

pub use ledger::{PendingPrediction, PredictionLedger};
pub use metrics::{SourceMetrics, TrackerMetrics};
pub use segments::{Evidence, SegmentAnalysis, SegmentMetrics, SegmentPerformance};

use chrono::{DateTime, Utc};
use glossa_core::config::TrackerConfig;
use glossa_core::{
    Condition, Outcome, PredictionId, PredictionMode, RankedCandidates, SegmentId, Source,
    StreamId,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::weights::SourceWeights;

/// What a piece of feedback changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub prediction_id: PredictionId,
    pub stream_id: StreamId,
    /// Text of the judged candidate; `None` when the requested rank did not exist.
    pub evaluated: Option<String>,
    pub correct: bool,
    /// Sources whose weights were updated.
    pub sources: SmallVec<[Source; 2]>,
    /// Usefulness signals to forward to the segment vocabulary.
    pub segment_signals: Vec<(SegmentId, bool)>,
    /// Weights after the update.
    pub weights: SourceWeights,
}

/// Result of [`PerformanceTracker::record_feedback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedbackStatus {
    Applied(FeedbackReport),
    /// Unknown, already received, or expired prediction. Nothing changed.
    Stale(PredictionId),
}

impl FeedbackStatus {
    pub fn condition(&self) -> Option<Condition> {
        match self {
            Self::Applied(_) => None,
            Self::Stale(_) => Some(Condition::StaleFeedback),
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale(_))
    }

    pub fn report(&self) -> Option<&FeedbackReport> {
        match self {
            Self::Applied(report) => Some(report),
            Self::Stale(_) => None,
        }
    }
}

/// Persistent part of the tracker. In-flight predictions are not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub weights: SourceWeights,
    pub metrics: TrackerMetrics,
    #[serde(default)]
    pub segments: SegmentPerformance,
    pub next_id: u64,
}

/// Issues prediction ids and turns feedback into weight and confidence updates.
#[derive(Debug)]
pub struct PerformanceTracker {
    config: TrackerConfig,
    weights: SourceWeights,
    metrics: TrackerMetrics,
    segments: SegmentPerformance,
    ledger: PredictionLedger,
    next_id: u64,
}

impl PerformanceTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let ledger = PredictionLedger::new(config.max_pending, config.pending_ttl_secs);
        let segments = SegmentPerformance::new(config.segment_metrics_cap);
        Self {
            config,
            weights: SourceWeights::equal(),
            metrics: TrackerMetrics::default(),
            segments,
            ledger,
            next_id: 0,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn weights(&self) -> SourceWeights {
        self.weights
    }

    pub fn metrics(&self) -> &TrackerMetrics {
        &self.metrics
    }

    pub fn ledger(&self) -> &PredictionLedger {
        &self.ledger
    }

    pub fn pending(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_pending(&self, id: PredictionId) -> bool {
        self.ledger.contains(id)
    }

    /// Register a ranking as issued and return its id.
    pub fn issue(
        &mut self,
        stream_id: StreamId,
        ranking: &RankedCandidates,
        now: DateTime<Utc>,
    ) -> PredictionId {
        let id = PredictionId(self.next_id);
        self.next_id += 1;
        let entry = PendingPrediction {
            id,
            stream_id,
            candidates: ranking.candidates.clone(),
            issued_at: now,
        };
        let expired = self.settle(|ledger| ledger.insert(entry));
        self.metrics.issued += 1;
        if !expired.is_empty() {
            debug!(
                count = expired.len(),
                oldest = %expired[0],
                pending = self.ledger.len(),
                "pending predictions expired"
            );
        }
        id
    }

    /// Judge an issued prediction against what actually happened.
    ///
    /// The evaluated candidate (top-ranked unless `outcome` names a rank) is
    /// correct when `outcome.actual` starts with it. Each contributing source
    /// takes an EMA step toward the result; weights are then floored and
    /// renormalised. Contributing segments are returned as signals for the
    /// vocabulary.
    pub fn record_feedback(
        &mut self,
        id: PredictionId,
        outcome: &Outcome,
        now: DateTime<Utc>,
    ) -> FeedbackStatus {
        let Some(entry) = self.settle(|ledger| ledger.take(id, now)) else {
            self.metrics.stale_feedback += 1;
            debug!(prediction = %id, "stale feedback ignored");
            return FeedbackStatus::Stale(id);
        };

        let rank = outcome.evaluated_rank.unwrap_or(0);
        let Some(candidate) = entry.candidates.get(rank) else {
            self.metrics.feedback_applied += 1;
            debug!(prediction = %id, rank, "feedback named a missing rank");
            return FeedbackStatus::Applied(FeedbackReport {
                prediction_id: id,
                stream_id: entry.stream_id,
                evaluated: None,
                correct: false,
                sources: SmallVec::new(),
                segment_signals: Vec::new(),
                weights: self.weights,
            });
        };

        let correct = outcome.confirms(&candidate.text);
        let rate = self.config.learning_rate;
        self.weights
            .update(&candidate.sources, correct, rate, self.config.weight_floor);
        for source in &candidate.sources {
            self.metrics
                .source_mut(*source)
                .record(correct, candidate.probability, rate);
        }
        for segment in &candidate.segments {
            self.segments
                .record(*segment, correct, candidate.probability, rate);
        }
        self.metrics.feedback_applied += 1;

        debug!(
            prediction = %id,
            candidate = candidate.text.as_str(),
            correct,
            character_weight = self.weights.get(Source::Character),
            segment_weight = self.weights.get(Source::Segment),
            "feedback applied"
        );

        FeedbackStatus::Applied(FeedbackReport {
            prediction_id: id,
            stream_id: entry.stream_id.clone(),
            evaluated: Some(candidate.text.clone()),
            correct,
            sources: candidate.sources.clone(),
            segment_signals: candidate.segments.iter().map(|s| (*s, correct)).collect(),
            weights: self.weights,
        })
    }

    /// Expire every in-flight prediction issued on `stream_id`.
    pub fn expire_stream(&mut self, stream_id: &StreamId) -> usize {
        self.settle(|ledger| ledger.expire_stream(stream_id))
    }

    /// Expire one in-flight prediction. Returns whether it was still pending.
    pub fn expire(&mut self, id: PredictionId) -> bool {
        self.settle(|ledger| ledger.expire(id))
    }

    /// Expire predictions outside their window.
    pub fn expire_due(&mut self, now: DateTime<Utc>) -> usize {
        self.settle(|ledger| ledger.expire_due(now)).len()
    }

    // Every ledger mutation goes through here so `metrics.expired` tracks
    // the ledger's own count.
    fn settle<T>(&mut self, f: impl FnOnce(&mut PredictionLedger) -> T) -> T {
        let before = self.ledger.expired_total();
        let out = f(&mut self.ledger);
        self.metrics.expired += self.ledger.expired_total() - before;
        out
    }

    pub fn recommended_mode(&self) -> PredictionMode {
        self.metrics.recommended_mode(self.config.min_samples)
    }

    // --- per-segment outcomes ---

    pub fn segment_metrics(&self, segment: SegmentId) -> Option<&SegmentMetrics> {
        self.segments.get(segment)
    }

    /// Whether `segment` has enough judgements at a high enough accuracy.
    pub fn should_use_segment(&self, segment: SegmentId) -> bool {
        self.segments.should_use(
            segment,
            self.config.segment_min_samples,
            self.config.segment_accuracy_threshold,
        )
    }

    /// Up to `max` recommended segments, best score first.
    pub fn best_segments(&self, max: usize) -> Vec<SegmentAnalysis> {
        self.segments.best(
            max,
            self.config.segment_min_samples,
            self.config.segment_accuracy_threshold,
        )
    }

    pub fn segment_analysis(&self, segment: SegmentId) -> Option<SegmentAnalysis> {
        self.segments.analysis(
            segment,
            self.config.segment_min_samples,
            self.config.segment_accuracy_threshold,
        )
    }

    /// Drop metrics of segments that left the vocabulary. Returns how many
    /// had metrics.
    pub fn forget_segments(&mut self, evicted: &[SegmentId]) -> usize {
        let mut forgotten = 0;
        for id in evicted {
            if self.segments.forget(*id) {
                forgotten += 1;
            }
        }
        forgotten
    }

    pub fn state(&self) -> TrackerState {
        TrackerState {
            weights: self.weights,
            metrics: self.metrics.clone(),
            segments: self.segments.clone(),
            next_id: self.next_id,
        }
    }

    /// Replace weights, metrics, and the id counter. Clears in-flight predictions.
    pub fn restore(&mut self, state: TrackerState) {
        self.weights = state.weights;
        self.metrics = state.metrics;
        self.segments = state.segments;
        self.segments.set_cap(self.config.segment_metrics_cap);
        self.next_id = state.next_id;
        self.ledger.clear();
    }
}
