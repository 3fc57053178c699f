use serde::{Deserialize, Serialize};

use super::error_code::{self, ErrorCode};

/// Recoverable conditions raised on the ingestion/prediction path.
///
/// None of these halt a stream; they are reported and handled locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// No model data yet; a uniform distribution was returned.
    ColdStart,
    /// Feedback referenced an unknown, settled, or expired prediction.
    StaleFeedback,
    /// The vocabulary hit its cap and evicted a segment.
    VocabularyFull,
}

impl ErrorCode for Condition {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ColdStart => error_code::COLD_START,
            Self::StaleFeedback => error_code::STALE_FEEDBACK,
            Self::VocabularyFull => error_code::VOCABULARY_FULL,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.error_code())
    }
}
