//! In-flight predictions awaiting feedback, with a FIFO expiry queue.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use glossa_core::{Candidate, PredictionId, StreamId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// An issued prediction: everything feedback needs to attribute credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPrediction {
    pub id: PredictionId,
    pub stream_id: StreamId,
    pub candidates: Vec<Candidate>,
    pub issued_at: DateTime<Utc>,
}

/// Issued → (Received | Expired). An entry leaves the ledger exactly once.
///
/// An entry expires once `max_pending` predictions have been issued after it,
/// or once it is at least `ttl` old, whichever comes first. Later predictions
/// count toward the window whether or not they were settled, so at most
/// `max_pending` entries are ever outstanding. The
/// queue may hold ids that were already received; those are skipped lazily.
/// Every expiry is counted in [`expired_total`](Self::expired_total).
#[derive(Debug)]
pub struct PredictionLedger {
    pending: FxHashMap<PredictionId, PendingPrediction>,
    queue: VecDeque<PredictionId>,
    max_pending: usize,
    ttl: Duration,
    newest: Option<PredictionId>,
    expired: u64,
}

impl PredictionLedger {
    pub fn new(max_pending: usize, ttl_secs: u64) -> Self {
        // chrono panics above i64::MAX milliseconds.
        let secs = ttl_secs.min(i64::MAX as u64 / 1_000) as i64;
        Self {
            pending: FxHashMap::default(),
            queue: VecDeque::new(),
            max_pending,
            ttl: Duration::seconds(secs),
            newest: None,
            expired: 0,
        }
    }

    /// Record a new prediction. Returns ids that fell out of the window.
    ///
    /// Ids are expected in issue order; an id older than the newest seen does
    /// not move the window.
    pub fn insert(&mut self, entry: PendingPrediction) -> Vec<PredictionId> {
        let now = entry.issued_at;
        if self.newest.map_or(true, |newest| entry.id > newest) {
            self.newest = Some(entry.id);
        }
        self.queue.push_back(entry.id);
        self.pending.insert(entry.id, entry);
        self.expire_due(now)
    }

    /// Remove and return a live entry. Entries outside the window are expired
    /// instead and yield `None`.
    pub fn take(&mut self, id: PredictionId, now: DateTime<Utc>) -> Option<PendingPrediction> {
        self.expire_due(now);
        self.pending.remove(&id)
    }

    /// Expire every entry that is at least `ttl` old or `max_pending` or more
    /// ids behind the newest, oldest first.
    pub fn expire_due(&mut self, now: DateTime<Utc>) -> Vec<PredictionId> {
        let mut expired = Vec::new();
        while let Some(front) = self.queue.front().copied() {
            let due = match self.pending.get(&front) {
                None => {
                    self.queue.pop_front();
                    continue;
                }
                Some(entry) => {
                    self.behind_window(front)
                        || now.signed_duration_since(entry.issued_at) >= self.ttl
                }
            };
            if !due {
                break;
            }
            self.queue.pop_front();
            self.pending.remove(&front);
            expired.push(front);
        }
        self.expired += expired.len() as u64;
        expired
    }

    /// Expire one entry regardless of the window. Returns whether it was live.
    pub fn expire(&mut self, id: PredictionId) -> bool {
        let live = self.pending.remove(&id).is_some();
        if live {
            self.expired += 1;
        }
        live
    }

    /// Expire every entry issued on `stream`. Returns how many.
    pub fn expire_stream(&mut self, stream: &StreamId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, entry| &entry.stream_id != stream);
        let removed = before - self.pending.len();
        self.expired += removed as u64;
        removed
    }

    fn behind_window(&self, id: PredictionId) -> bool {
        match self.newest {
            Some(newest) => newest.0.saturating_sub(id.0) >= self.max_pending as u64,
            None => false,
        }
    }

    pub fn contains(&self, id: PredictionId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Entries expired over the ledger's lifetime.
    pub fn expired_total(&self) -> u64 {
        self.expired
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.queue.clear();
        self.newest = None;
    }
}
