//! Bounded co-occurrence counts of adjacent token pairs (merge candidates).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Serialized form of one pair count.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairCount {
    pub left: String,
    pub right: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PairTableRepr {
    cap: usize,
    pairs: Vec<PairCount>,
}

/// Adjacent-pair counts with a hard cap.
///
/// Above the cap every count is halved and zero counts dropped, which keeps
/// frequent pairs and forgets one-offs.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(into = "PairTableRepr", from = "PairTableRepr")]
pub struct PairTable {
    cap: usize,
    counts: FxHashMap<(String, String), u32>,
    /// Sum of all current counts.
    total: u64,
}

impl PairTable {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            counts: FxHashMap::default(),
            total: 0,
        }
    }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.enforce_cap();
    }

    /// Count one more co-occurrence and return the pair's new count.
    pub fn increment(&mut self, left: &str, right: &str) -> u32 {
        let key = (left.to_string(), right.to_string());
        let count = {
            let slot = self.counts.entry(key.clone()).or_insert(0);
            if *slot < u32::MAX {
                *slot += 1;
                self.total += 1;
            }
            *slot
        };
        if self.counts.len() > self.cap {
            self.enforce_cap();
            return self.counts.get(&key).copied().unwrap_or(0);
        }
        count
    }

    pub fn count(&self, left: &str, right: &str) -> u32 {
        self.counts
            .get(&(left.to_string(), right.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn remove(&mut self, left: &str, right: &str) {
        if let Some(count) = self.counts.remove(&(left.to_string(), right.to_string())) {
            self.total -= u64::from(count);
        }
    }

    /// `count(left, right)` as a share of all counted pairs, in `[0, 1]`.
    pub fn strength(&self, left: &str, right: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.count(left, right)) / self.total as f64
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn enforce_cap(&mut self) {
        let before = self.counts.len();
        while self.counts.len() > self.cap {
            self.counts.retain(|_, count| {
                *count /= 2;
                *count > 0
            });
        }
        self.total = self.counts.values().map(|c| u64::from(*c)).sum();
        if before != self.counts.len() {
            debug!(before, after = self.counts.len(), cap = self.cap, "pair table halved");
        }
    }
}

impl From<PairTable> for PairTableRepr {
    fn from(table: PairTable) -> Self {
        let mut pairs: Vec<PairCount> = table
            .counts
            .into_iter()
            .map(|((left, right), count)| PairCount { left, right, count })
            .collect();
        pairs.sort();
        Self {
            cap: table.cap,
            pairs,
        }
    }
}

impl From<PairTableRepr> for PairTable {
    fn from(repr: PairTableRepr) -> Self {
        let counts: FxHashMap<(String, String), u32> = repr
            .pairs
            .into_iter()
            .map(|p| ((p.left, p.right), p.count))
            .collect();
        let total = counts.values().map(|c| u64::from(*c)).sum();
        Self {
            cap: repr.cap,
            counts,
            total,
        }
    }
}
