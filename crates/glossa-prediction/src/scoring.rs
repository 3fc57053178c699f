//! Candidate merging and ranking.

use std::collections::BTreeMap;

use glossa_core::{Candidate, SegmentId, Source};
use smallvec::SmallVec;

/// One candidate as proposed by a single source, before weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCandidate {
    pub text: String,
    /// Probability within the proposing source.
    pub probability: f64,
    pub segment: Option<SegmentId>,
}

/// Accumulates weighted contributions, merging identical continuations.
#[derive(Debug, Default)]
pub struct CandidatePool {
    entries: BTreeMap<String, Candidate>,
}

impl CandidatePool {
    pub fn add(&mut self, source: Source, candidate: SourceCandidate, weight: f64) {
        let entry = self
            .entries
            .entry(candidate.text.clone())
            .or_insert_with(|| Candidate {
                text: candidate.text,
                score: 0.0,
                probability: 0.0,
                sources: SmallVec::new(),
                segments: SmallVec::new(),
            });
        entry.score += weight * candidate.probability;
        if !entry.sources.contains(&source) {
            entry.sources.push(source);
            entry.sources.sort_unstable();
        }
        if let Some(id) = candidate.segment {
            if !entry.segments.contains(&id) {
                entry.segments.push(id);
                entry.segments.sort_unstable();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `k` by score, shorter first on ties, then lexicographic; each
    /// `probability` is the score renormalised over the returned candidates.
    pub fn into_ranked(self, k: usize) -> Vec<Candidate> {
        let mut ranked: Vec<Candidate> = self.entries.into_values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.char_len().cmp(&b.char_len()))
                .then_with(|| a.text.cmp(&b.text))
        });
        ranked.truncate(k);

        let total: f64 = ranked.iter().map(|c| c.score).sum();
        let n = ranked.len() as f64;
        for candidate in &mut ranked {
            candidate.probability = if total > 0.0 {
                candidate.score / total
            } else {
                1.0 / n
            };
        }
        ranked
    }
}
