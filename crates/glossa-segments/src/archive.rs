//! Bounded archive of evicted segments, kept so they can be restored.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// Why a segment left the live vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionReason {
    /// Displaced by the vocabulary cap.
    Capacity,
    /// Stayed below the confidence floor past the grace period.
    Floor,
}

/// An evicted segment with its statistics at eviction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedSegment {
    pub segment: Segment,
    pub reason: EvictionReason,
    /// Vocabulary tick of the eviction.
    pub evicted_at: u64,
}

/// Oldest evictions are forgotten first once `cap` is reached.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SegmentArchive {
    cap: usize,
    entries: VecDeque<ArchivedSegment>,
}

impl SegmentArchive {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: VecDeque::new(),
        }
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.trim();
    }

    /// Archive an evicted segment, replacing any older entry with the same
    /// content.
    pub fn push(&mut self, entry: ArchivedSegment) {
        if self.cap == 0 {
            return;
        }
        self.discard(entry.segment.content());
        self.entries.push_back(entry);
        self.trim();
    }

    /// Remove and return the archived entry for `content`.
    pub fn take(&mut self, content: &str) -> Option<ArchivedSegment> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.segment.content() == content)?;
        self.entries.remove(index)
    }

    pub fn discard(&mut self, content: &str) -> bool {
        self.take(content).is_some()
    }

    pub fn get(&self, content: &str) -> Option<&ArchivedSegment> {
        self.entries
            .iter()
            .find(|entry| entry.segment.content() == content)
    }

    /// Archived entries, oldest eviction first.
    pub fn iter(&self) -> impl Iterator<Item = &ArchivedSegment> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn trim(&mut self) {
        let excess = self.entries.len().saturating_sub(self.cap);
        self.entries.drain(..excess);
    }
}
