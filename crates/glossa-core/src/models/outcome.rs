use serde::{Deserialize, Serialize};

/// Ground truth supplied for an issued prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Text that actually followed the prediction point.
    pub actual: String,
    /// Rank of the candidate being judged; `None` judges the top candidate.
    pub evaluated_rank: Option<usize>,
}

impl Outcome {
    /// Judge the top-ranked candidate against `actual`.
    pub fn actual(actual: impl Into<String>) -> Self {
        Self {
            actual: actual.into(),
            evaluated_rank: None,
        }
    }

    /// Judge the candidate at `rank` instead of the top one.
    pub fn evaluating(mut self, rank: usize) -> Self {
        self.evaluated_rank = Some(rank);
        self
    }

    /// A candidate is correct when the actual text starts with it.
    pub fn confirms(&self, candidate: &str) -> bool {
        !candidate.is_empty() && self.actual.starts_with(candidate)
    }
}
