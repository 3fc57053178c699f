use crate::models::CharDistribution;

/// A source of next-character distributions for one stream.
pub trait ICharPredictor {
    /// Distribution over the next character given the stream's history.
    /// Never empty; flagged `cold_start` when no data exists.
    fn predict_next(&self) -> CharDistribution;
}
