use serde::{Deserialize, Serialize};

/// A discovered character subsequence and its statistics.
///
/// Content is fixed at creation; only the statistics change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    content: String,
    len: usize,
    pub occurrences: u64,
    /// Vocabulary tick at creation.
    pub first_seen: u64,
    /// Vocabulary tick of the latest complete match.
    pub last_seen: u64,
    pub confidence: f64,
    /// Tick at which confidence last dropped below the floor, if still below.
    pub below_floor_since: Option<u64>,
    /// Usefulness signals folded into `confidence`.
    pub signals: u64,
}

impl Segment {
    pub fn new(content: String, occurrences: u64, tick: u64, confidence: f64) -> Self {
        let len = content.chars().count();
        Self {
            content,
            len,
            occurrences,
            first_seen: tick,
            last_seen: tick,
            confidence,
            below_floor_since: None,
            signals: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fold one binary signal into confidence as an exponential moving average.
    pub fn apply_signal(&mut self, useful: bool, rate: f64, floor: f64, tick: u64) {
        let target = if useful { 1.0 } else { 0.0 };
        self.confidence = (self.confidence * (1.0 - rate) + target * rate).clamp(0.0, 1.0);
        self.signals += 1;
        self.track_floor(floor, tick);
    }

    pub fn track_floor(&mut self, floor: f64, tick: u64) {
        if self.confidence < floor {
            self.below_floor_since.get_or_insert(tick);
        } else {
            self.below_floor_since = None;
        }
    }

    /// Below the floor for longer than `grace_period` ticks.
    pub fn is_expired(&self, tick: u64, grace_period: u64) -> bool {
        self.below_floor_since
            .is_some_and(|since| tick.saturating_sub(since) > grace_period)
    }
}
