//! Per-segment outcome bookkeeping: how often candidates built from a
//! segment were judged correct.

use glossa_core::SegmentId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::metrics::SourceMetrics;

const ACCURACY_WEIGHT: f64 = 0.6;
const CONFIDENCE_WEIGHT: f64 = 0.25;
const USAGE_WEIGHT: f64 = 0.15;

/// Outcomes of every judged candidate that `segment` contributed to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentMetrics {
    pub outcomes: SourceMetrics,
    /// Judgement sequence number of the latest update.
    pub last_judged: u64,
}

impl SegmentMetrics {
    pub fn hits(&self) -> u64 {
        self.outcomes.correct
    }

    pub fn misses(&self) -> u64 {
        self.outcomes.total - self.outcomes.correct
    }

    /// Weighted blend of decaying accuracy, average confidence, and a
    /// logarithmic usage term, in `[0, 1]`.
    pub fn score(&self) -> f64 {
        let usage = ((self.outcomes.total as f64).ln().max(0.0) / 10.0).min(1.0);
        ACCURACY_WEIGHT * self.outcomes.decaying_accuracy
            + CONFIDENCE_WEIGHT * self.outcomes.average_confidence()
            + USAGE_WEIGHT * usage
    }
}

/// How much evidence backs a segment's metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// Fewer than `min_samples` judgements.
    Low,
    Medium,
    /// At least twice `min_samples` judgements.
    High,
}

impl Evidence {
    fn from_samples(total: u64, min_samples: u64) -> Self {
        if total >= min_samples.saturating_mul(2) {
            Self::High
        } else if total >= min_samples {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Judgement of one segment's usefulness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    pub segment: SegmentId,
    pub score: f64,
    pub metrics: SegmentMetrics,
    pub recommended: bool,
    pub evidence: Evidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SegmentPerformanceRepr {
    cap: usize,
    judged: u64,
    entries: Vec<(SegmentId, SegmentMetrics)>,
}

/// Bounded table of [`SegmentMetrics`]. Over the cap, the segment judged
/// least recently is forgotten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SegmentPerformanceRepr", from = "SegmentPerformanceRepr")]
pub struct SegmentPerformance {
    cap: usize,
    judged: u64,
    entries: FxHashMap<SegmentId, SegmentMetrics>,
}

impl SegmentPerformance {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            judged: 0,
            entries: FxHashMap::default(),
        }
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.enforce_cap();
    }

    pub fn record(&mut self, segment: SegmentId, correct: bool, confidence: f64, rate: f64) {
        self.judged += 1;
        let entry = self.entries.entry(segment).or_default();
        entry.outcomes.record(correct, confidence, rate);
        entry.last_judged = self.judged;
        self.enforce_cap();
    }

    /// Drop an evicted segment's metrics.
    pub fn forget(&mut self, segment: SegmentId) -> bool {
        self.entries.remove(&segment).is_some()
    }

    pub fn get(&self, segment: SegmentId) -> Option<&SegmentMetrics> {
        self.entries.get(&segment)
    }

    /// At least `min_samples` judgements and decaying accuracy at or above
    /// `threshold`.
    pub fn should_use(&self, segment: SegmentId, min_samples: u64, threshold: f64) -> bool {
        self.get(segment)
            .is_some_and(|m| qualifies(m, min_samples, threshold))
    }

    /// Up to `max` qualifying segments, best score first; ties by id.
    pub fn best(&self, max: usize, min_samples: u64, threshold: f64) -> Vec<SegmentAnalysis> {
        let mut best: Vec<SegmentAnalysis> = self
            .entries
            .iter()
            .filter(|(_, m)| qualifies(m, min_samples, threshold))
            .map(|(id, m)| analyse(*id, m, min_samples, threshold))
            .collect();
        best.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.segment.cmp(&b.segment))
        });
        best.truncate(max);
        best
    }

    pub fn analysis(
        &self,
        segment: SegmentId,
        min_samples: u64,
        threshold: f64,
    ) -> Option<SegmentAnalysis> {
        self.get(segment)
            .map(|m| analyse(segment, m, min_samples, threshold))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn enforce_cap(&mut self) {
        while self.entries.len() > self.cap {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(id, m)| (m.last_judged, **id))
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    self.entries.remove(&id);
                }
                None => break,
            }
        }
    }
}

impl Default for SegmentPerformance {
    fn default() -> Self {
        Self::new(glossa_core::config::TrackerConfig::default().segment_metrics_cap)
    }
}

fn qualifies(metrics: &SegmentMetrics, min_samples: u64, threshold: f64) -> bool {
    metrics.outcomes.total >= min_samples && metrics.outcomes.decaying_accuracy >= threshold
}

fn analyse(
    segment: SegmentId,
    metrics: &SegmentMetrics,
    min_samples: u64,
    threshold: f64,
) -> SegmentAnalysis {
    SegmentAnalysis {
        segment,
        score: metrics.score(),
        metrics: metrics.clone(),
        recommended: qualifies(metrics, min_samples, threshold),
        evidence: Evidence::from_samples(metrics.outcomes.total, min_samples),
    }
}

impl From<SegmentPerformance> for SegmentPerformanceRepr {
    fn from(table: SegmentPerformance) -> Self {
        let mut entries: Vec<(SegmentId, SegmentMetrics)> = table.entries.into_iter().collect();
        entries.sort_by_key(|(id, _)| *id);
        Self {
            cap: table.cap,
            judged: table.judged,
            entries,
        }
    }
}

impl From<SegmentPerformanceRepr> for SegmentPerformance {
    fn from(repr: SegmentPerformanceRepr) -> Self {
        Self {
            cap: repr.cap,
            judged: repr.judged,
            entries: repr.entries.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(slot: u32) -> SegmentId {
        SegmentId::new(slot, 0)
    }

    #[test]
    fn hits_and_misses_are_counted_per_segment() {
        let mut table = SegmentPerformance::new(8);
        table.record(id(1), true, 0.6, 0.1);
        table.record(id(1), false, 0.4, 0.1);
        table.record(id(2), true, 0.9, 0.1);
        let m = table.get(id(1)).unwrap();
        assert_eq!((m.hits(), m.misses()), (1, 1));
        assert!((m.outcomes.average_confidence() - 0.5).abs() < 1e-12);
        assert_eq!(table.get(id(2)).unwrap().hits(), 1);
    }

    #[test]
    fn least_recently_judged_is_dropped_over_cap() {
        let mut table = SegmentPerformance::new(2);
        table.record(id(1), true, 0.5, 0.1);
        table.record(id(2), true, 0.5, 0.1);
        table.record(id(1), true, 0.5, 0.1);
        table.record(id(3), true, 0.5, 0.1);
        assert!(table.get(id(2)).is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn best_filters_by_samples_and_threshold() {
        let mut table = SegmentPerformance::new(8);
        for _ in 0..4 {
            table.record(id(1), true, 0.9, 0.1);
            table.record(id(2), true, 0.3, 0.1);
            table.record(id(3), false, 0.9, 0.1);
        }
        table.record(id(4), true, 0.9, 0.1);

        let best = table.best(10, 3, 0.6);
        let ids: Vec<SegmentId> = best.iter().map(|a| a.segment).collect();
        assert_eq!(ids, vec![id(1), id(2)]);
        assert!(table.should_use(id(1), 3, 0.6));
        assert!(!table.should_use(id(3), 3, 0.6));
        assert!(!table.should_use(id(4), 3, 0.6));
        assert_eq!(table.best(1, 3, 0.6).len(), 1);
    }

    #[test]
    fn evidence_grows_with_samples() {
        let mut table = SegmentPerformance::new(8);
        let level = |t: &SegmentPerformance| t.analysis(id(1), 2, 0.5).map(|a| a.evidence);
        assert_eq!(level(&table), None);
        table.record(id(1), true, 0.5, 0.1);
        assert_eq!(level(&table), Some(Evidence::Low));
        table.record(id(1), true, 0.5, 0.1);
        assert_eq!(level(&table), Some(Evidence::Medium));
        table.record(id(1), true, 0.5, 0.1);
        table.record(id(1), true, 0.5, 0.1);
        assert_eq!(level(&table), Some(Evidence::High));
        assert!(table.forget(id(1)));
        assert_eq!(level(&table), None);
    }
}
