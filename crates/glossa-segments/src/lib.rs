//! # glossa-segments
//!
//! Segment discovery: adjacent tokens that keep co-occurring are merged
//! online into longer segments (bottom-up, one pair at a time). Segments live
//! in a bounded vocabulary shared by all streams; each stream keeps its own
//! buffer. Matching exposes every aligned segment, overlaps included.
//! Evicted segments go to a bounded archive and can be restored from it.

pub mod archive;
pub mod buffer;
pub mod discoverer;
pub mod matching;
pub mod pairs;
pub mod segment;
pub mod stats;
pub mod vocabulary;

pub use archive::{ArchivedSegment, EvictionReason, SegmentArchive};
pub use buffer::SegmentBuffer;
pub use discoverer::{SegmentDiscoverer, SegmentView};
pub use pairs::PairTable;
pub use segment::Segment;
pub use stats::VocabularyStats;
pub use vocabulary::{ObserveOutcome, SegmentVocabulary};
