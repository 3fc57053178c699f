//! Per-stream rolling buffer and tokenizer state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// The recent characters of one stream plus its open/closed token state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentBuffer {
    chars: VecDeque<char>,
    capacity: usize,
    position: u64,
    /// Token still being extended.
    pub(crate) open: String,
    /// Last token closed on this stream; left side of the next pair.
    pub(crate) previous: Option<String>,
}

impl SegmentBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            chars: VecDeque::with_capacity(capacity),
            capacity,
            position: 0,
            open: String::new(),
            previous: None,
        }
    }

    pub(crate) fn push(&mut self, ch: char) {
        if self.capacity > 0 {
            if self.chars.len() == self.capacity {
                self.chars.pop_front();
            }
            self.chars.push_back(ch);
        }
        self.position += 1;
    }

    /// Characters observed on this stream so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of retained characters ending at `position`, or `None` when the
    /// position is in the future or already scrolled out of the buffer.
    pub fn retained_before(&self, position: u64) -> Option<usize> {
        if position > self.position {
            return None;
        }
        let behind = usize::try_from(self.position - position).ok()?;
        if behind > self.chars.len() {
            return None;
        }
        Some(self.chars.len() - behind)
    }

    /// The `len` characters ending `end` characters into the retained buffer.
    pub(crate) fn slice(&self, end: usize, len: usize) -> String {
        self.chars.range(end - len..end).collect()
    }

    /// The token currently being extended.
    pub fn open_token(&self) -> &str {
        &self.open
    }
}
