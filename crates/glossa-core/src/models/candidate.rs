use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{PredictionMode, SegmentId, Source};

/// One ranked continuation: a single next character or a multi-character
/// continuation implied by one or more segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    /// Combined `weight[source] * source_probability`, summed over contributors.
    pub score: f64,
    /// Score renormalised over the returned candidates.
    pub probability: f64,
    /// Sources that contributed, in `Source` order.
    pub sources: SmallVec<[Source; 2]>,
    /// Segments that implied this continuation.
    pub segments: SmallVec<[SegmentId; 4]>,
}

impl Candidate {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn has_source(&self, source: Source) -> bool {
        self.sources.contains(&source)
    }
}

/// Output of one hybrid prediction, before it is issued to a caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankedCandidates {
    pub candidates: Vec<Candidate>,
    /// Mode actually applied after adaptive resolution and fallback.
    pub mode: PredictionMode,
    /// The character source had no data.
    pub cold_start: bool,
}

impl RankedCandidates {
    pub fn top(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn total_probability(&self) -> f64 {
        self.candidates.iter().map(|c| c.probability).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
