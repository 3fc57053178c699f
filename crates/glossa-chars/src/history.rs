//! Bounded per-stream character history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// The last `capacity` characters of one stream plus its absolute position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharHistory {
    chars: VecDeque<char>,
    capacity: usize,
    position: u64,
}

impl CharHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            chars: VecDeque::with_capacity(capacity),
            capacity,
            position: 0,
        }
    }

    pub fn push(&mut self, ch: char) {
        if self.capacity == 0 {
            self.position += 1;
            return;
        }
        if self.chars.len() == self.capacity {
            self.chars.pop_front();
        }
        self.chars.push_back(ch);
        self.position += 1;
    }

    /// Context of exactly `order` characters ending at the current position,
    /// or `None` if fewer characters are retained.
    pub fn context(&self, order: usize) -> Option<String> {
        if order > self.chars.len() {
            return None;
        }
        Some(self.chars.iter().skip(self.chars.len() - order).collect())
    }

    /// Longest order a context lookup can currently use.
    pub fn available_order(&self) -> usize {
        self.chars.len()
    }

    /// Characters observed on this stream, including those no longer retained.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}
