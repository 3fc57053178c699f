//! Per-source weights: a two-entry probability vector with a floor.

use glossa_core::Source;
use serde::{Deserialize, Serialize};

/// Relative trust in each source. Always sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWeights {
    weights: [f64; Source::COUNT],
}

impl SourceWeights {
    /// Equal trust in every source.
    pub fn equal() -> Self {
        Self {
            weights: [1.0 / Source::COUNT as f64; Source::COUNT],
        }
    }

    /// Weights proportional to `character` and `segment`.
    /// Non-finite or non-positive input falls back to equal weights.
    pub fn new(character: f64, segment: f64) -> Self {
        let mut weights = Self {
            weights: [character, segment],
        };
        if !weights.normalise() {
            weights = Self::equal();
        }
        weights
    }

    pub fn get(&self, source: Source) -> f64 {
        self.weights[source.index()]
    }

    pub fn as_array(&self) -> [f64; Source::COUNT] {
        self.weights
    }

    /// Weights restricted to `active`, renormalised to sum to 1 over them.
    pub fn over(&self, active: &[Source]) -> [f64; Source::COUNT] {
        let mut out = [0.0; Source::COUNT];
        let total: f64 = active.iter().map(|s| self.get(*s)).sum();
        for source in active {
            out[source.index()] = if total > 0.0 {
                self.get(*source) / total
            } else {
                1.0 / active.len() as f64
            };
        }
        out
    }

    /// The source whose weight reaches `threshold`, if any. Highest wins.
    pub fn dominant(&self, threshold: f64) -> Option<Source> {
        Source::ALL
            .iter()
            .copied()
            .filter(|s| self.get(*s) >= threshold)
            .max_by(|a, b| self.get(*a).total_cmp(&self.get(*b)).then(b.cmp(a)))
    }

    /// EMA step toward `correct` for each contributing source, then floor and
    /// renormalise: `w ← w·(1−α) + c·α`.
    pub fn update(&mut self, contributing: &[Source], correct: bool, rate: f64, floor: f64) {
        if contributing.is_empty() {
            return;
        }
        let target = if correct { 1.0 } else { 0.0 };
        for source in contributing {
            let w = &mut self.weights[source.index()];
            *w = *w * (1.0 - rate) + target * rate;
        }
        if !self.normalise() {
            *self = Self::equal();
        }
        self.apply_floor(floor);
    }

    fn normalise(&mut self) -> bool {
        let total: f64 = self.weights.iter().sum();
        if !(total.is_finite() && total > 0.0) || self.weights.iter().any(|w| *w < 0.0) {
            return false;
        }
        for w in &mut self.weights {
            *w /= total;
        }
        true
    }

    /// Lift weights below `floor` to it, taking the mass proportionally from
    /// the others so the vector still sums to 1.
    fn apply_floor(&mut self, floor: f64) {
        let low: Vec<usize> = (0..Source::COUNT)
            .filter(|i| self.weights[*i] < floor)
            .collect();
        if low.is_empty() || low.len() == Source::COUNT {
            return;
        }
        let high_total: f64 = (0..Source::COUNT)
            .filter(|i| !low.contains(i))
            .map(|i| self.weights[i])
            .sum();
        let remaining = 1.0 - floor * low.len() as f64;
        for i in 0..Source::COUNT {
            self.weights[i] = if low.contains(&i) {
                floor
            } else {
                self.weights[i] / high_total * remaining
            };
        }
    }
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self::equal()
    }
}
