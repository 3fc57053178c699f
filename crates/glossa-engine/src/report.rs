use glossa_core::{Condition, PredictionId, RankedCandidates, SegmentId, StreamId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Effect of one observed character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserveReport {
    /// Stream position after the character.
    pub position: u64,
    /// Segment created by this character, if any.
    pub merged: Option<SegmentId>,
    /// Segments evicted while handling this character.
    pub evicted: SmallVec<[SegmentId; 2]>,
    /// `VocabularyFull` when an eviction happened.
    pub condition: Option<Condition>,
}

/// A ranked prediction issued to a caller, addressable by feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: PredictionId,
    pub stream_id: StreamId,
    /// Stream position the prediction was made at.
    pub position: u64,
    pub ranking: RankedCandidates,
}

impl Prediction {
    /// Top candidate text, if any.
    pub fn best(&self) -> Option<&str> {
        self.ranking.top().map(|c| c.text.as_str())
    }
}
