//! Shared context table: next-character counts per context string.

use std::collections::{BTreeMap, BTreeSet};

use glossa_core::config::CharModelConfig;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::history::CharHistory;

/// Next-character counts observed after one context.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextStats {
    next: BTreeMap<char, u32>,
    total: u64,
    last_used: u64,
}

impl ContextStats {
    pub fn count(&self, ch: char) -> u32 {
        self.next.get(&ch).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Distinct characters seen after this context.
    pub fn distinct(&self) -> usize {
        self.next.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.next.iter().map(|(c, n)| (*c, *n))
    }

    pub fn last_used(&self) -> u64 {
        self.last_used
    }

    fn record(&mut self, ch: char, tick: u64) {
        let slot = self.next.entry(ch).or_insert(0);
        *slot = slot.saturating_add(1);
        self.total += 1;
        self.last_used = tick;
    }
}

/// Summary counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub contexts: usize,
    pub alphabet: usize,
    pub observations: u64,
    pub evictions: u64,
}

/// Context → next-character statistics, shared by all streams.
///
/// The empty (order-0) context is never evicted. Above `max_contexts`, the
/// least recently used contexts are dropped in one batch down to 90% of the
/// cap so eviction cost is amortised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextTable {
    config: CharModelConfig,
    contexts: FxHashMap<String, ContextStats>,
    alphabet: BTreeSet<char>,
    tick: u64,
    evictions: u64,
}

impl ContextTable {
    pub fn new(config: CharModelConfig) -> Self {
        Self {
            config,
            contexts: FxHashMap::default(),
            alphabet: BTreeSet::new(),
            tick: 0,
            evictions: 0,
        }
    }

    pub fn config(&self) -> &CharModelConfig {
        &self.config
    }

    /// Adopt new limits, evicting immediately if the table is now over cap.
    pub fn reconfigure(&mut self, config: CharModelConfig) {
        self.config = config;
        self.enforce_cap();
    }

    /// Record that `ch` followed the stream described by `history`, for every
    /// context order from 0 up to the configured maximum. The caller pushes
    /// `ch` into the history afterwards.
    pub fn observe(&mut self, history: &CharHistory, ch: char) {
        self.tick += 1;
        let tick = self.tick;
        let max_order = self.config.max_context_len.min(history.available_order());
        for order in 0..=max_order {
            if let Some(context) = history.context(order) {
                self.contexts.entry(context).or_default().record(ch, tick);
            }
        }
        self.alphabet.insert(ch);
        self.enforce_cap();
    }

    pub fn get(&self, context: &str) -> Option<&ContextStats> {
        self.contexts.get(context)
    }

    /// Every character ever observed, in order.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn is_empty(&self) -> bool {
        self.alphabet.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            contexts: self.contexts.len(),
            alphabet: self.alphabet.len(),
            observations: self.tick,
            evictions: self.evictions,
        }
    }

    fn enforce_cap(&mut self) {
        if self.contexts.len() <= self.config.max_contexts {
            return;
        }
        let target = self.config.max_contexts * 9 / 10;
        let mut victims: Vec<(u64, &String)> = self
            .contexts
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, stats)| (stats.last_used, key))
            .collect();
        victims.sort();
        let excess = self.contexts.len().saturating_sub(target);
        let doomed: Vec<String> = victims
            .into_iter()
            .take(excess)
            .map(|(_, key)| key.clone())
            .collect();
        for key in &doomed {
            self.contexts.remove(key);
        }
        self.evictions += doomed.len() as u64;
        debug!(
            evicted = doomed.len(),
            remaining = self.contexts.len(),
            cap = self.config.max_contexts,
            "context table eviction"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_str(table: &mut ContextTable, history: &mut CharHistory, text: &str) {
        for ch in text.chars() {
            table.observe(history, ch);
            history.push(ch);
        }
    }

    #[test]
    fn records_every_order_up_to_the_limit() {
        let config = CharModelConfig {
            max_context_len: 2,
            ..CharModelConfig::default()
        };
        let mut table = ContextTable::new(config);
        let mut history = CharHistory::new(2);
        observe_str(&mut table, &mut history, "abc");

        assert_eq!(table.get("").unwrap().total(), 3);
        assert_eq!(table.get("a").unwrap().count('b'), 1);
        assert_eq!(table.get("ab").unwrap().count('c'), 1);
        assert!(table.get("abc").is_none());
        assert_eq!(table.alphabet().len(), 3);
    }

    #[test]
    fn eviction_keeps_order_zero_and_respects_cap() {
        let config = CharModelConfig {
            max_context_len: 3,
            max_contexts: 16,
        };
        let mut table = ContextTable::new(config);
        let mut history = CharHistory::new(3);
        observe_str(
            &mut table,
            &mut history,
            "the quick brown fox jumps over the lazy dog",
        );

        assert!(table.len() <= 16);
        assert!(table.get("").is_some());
        assert!(table.stats().evictions > 0);
    }

    #[test]
    fn eviction_prefers_least_recently_used() {
        let config = CharModelConfig {
            max_context_len: 1,
            max_contexts: 16,
        };
        let mut table = ContextTable::new(config);
        let mut history = CharHistory::new(1);
        observe_str(&mut table, &mut history, "abcdefghijklmnopqrs");

        // The most recent context always survives a batch eviction.
        assert!(table.get("r").is_some());
        assert!(table.get("a").is_none());
    }
}
