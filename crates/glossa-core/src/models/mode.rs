use serde::{Deserialize, Serialize};

use super::Source;

/// How the hybrid predictor combines its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// Character model only.
    CharacterOnly,
    /// Segment vocabulary only.
    SegmentOnly,
    /// Weighted combination of both sources.
    #[default]
    Hybrid,
    /// Hybrid, unless one source's weight dominates; then that source alone.
    Adaptive,
}

impl PredictionMode {
    /// Whether this (resolved) mode draws candidates from `source`.
    pub fn uses(self, source: Source) -> bool {
        match self {
            Self::CharacterOnly => source == Source::Character,
            Self::SegmentOnly => source == Source::Segment,
            Self::Hybrid | Self::Adaptive => true,
        }
    }

    /// The single-source mode for `source`.
    pub fn only(source: Source) -> Self {
        match source {
            Source::Character => Self::CharacterOnly,
            Source::Segment => Self::SegmentOnly,
        }
    }
}
