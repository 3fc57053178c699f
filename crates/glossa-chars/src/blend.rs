//! Back-off blending across context orders.
//!
//! Escape-style interpolation: each order `k` context with `n` observations
//! and `t` distinct successors keeps weight `n / (n + t)` for its own counts
//! and passes the rest down to the blend of shorter contexts. The base of the
//! recursion spreads mass uniformly over the observed alphabet, so every
//! observed character keeps a non-zero probability.

use std::collections::BTreeMap;

use glossa_core::constants::COLD_START_ALPHABET;
use glossa_core::CharDistribution;

use crate::history::CharHistory;
use crate::table::ContextTable;

/// Blend every available order for `history` into one distribution.
pub fn blend(table: &ContextTable, history: &CharHistory) -> CharDistribution {
    if table.is_empty() {
        return CharDistribution::uniform(COLD_START_ALPHABET, true);
    }

    let alphabet = table.alphabet();
    let uniform = 1.0 / alphabet.len() as f64;
    let mut probs: BTreeMap<char, f64> = alphabet.iter().map(|c| (*c, uniform)).collect();

    let max_order = table
        .config()
        .max_context_len
        .min(history.available_order());
    for order in 0..=max_order {
        let Some(stats) = history.context(order).and_then(|ctx| table.get(&ctx)) else {
            continue;
        };
        if stats.total() == 0 {
            continue;
        }
        let n = stats.total() as f64;
        let t = stats.distinct() as f64;
        let keep = n / (n + t);
        for p in probs.values_mut() {
            *p *= 1.0 - keep;
        }
        for (ch, count) in stats.iter() {
            if let Some(p) = probs.get_mut(&ch) {
                *p += keep * f64::from(count) / n;
            }
        }
    }

    CharDistribution::new(probs.into_iter().collect(), false)
}
