use serde::{Deserialize, Serialize};

use super::SegmentId;

/// A vocabulary segment aligned with the stream at a given position.
///
/// The stream's last `matched` characters equal the segment's first `matched`
/// characters. A complete match (`matched == len`) ends exactly at the
/// position; a partial match implies the continuation `content[matched..]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMatch {
    pub id: SegmentId,
    pub content: String,
    /// Aligned characters ending at the queried position.
    pub matched: usize,
    /// Segment length in characters.
    pub len: usize,
    pub confidence: f64,
    pub occurrences: u64,
}

impl SegmentMatch {
    pub fn is_complete(&self) -> bool {
        self.matched == self.len
    }

    /// The characters this segment predicts next, if it is not complete.
    pub fn continuation(&self) -> Option<&str> {
        if self.is_complete() {
            return None;
        }
        let start = self
            .content
            .char_indices()
            .nth(self.matched)
            .map(|(i, _)| i)?;
        Some(&self.content[start..])
    }
}
