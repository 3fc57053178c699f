/// Glossa crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot format version. Bumped whenever the persisted layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Smallest context table that still holds a useful set of order-1 contexts.
pub const MIN_CONTEXT_TABLE_SIZE: usize = 16;

/// Smallest vocabulary that can hold competing segments.
pub const MIN_VOCABULARY_CAP: usize = 4;

/// Segments are multi-character by definition.
pub const MIN_SEGMENT_LEN: usize = 2;

/// Confidence at or above which a segment counts as high-confidence.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Accuracy margin one source needs over the other before a mode is recommended.
pub const MODE_SWITCH_MARGIN: f64 = 0.1;

/// Alphabet used for the uniform cold-start distribution (printable ASCII).
pub const COLD_START_ALPHABET: std::ops::RangeInclusive<char> = ' '..='~';
