//! Hybrid predictor: one ranked candidate list from two sources.

use glossa_core::config::PredictorConfig;
use glossa_core::traits::{ICharPredictor, ISegmentProvider};
use glossa_core::{PredictionMode, RankedCandidates, Source};
use smallvec::SmallVec;
use tracing::trace;

use crate::scoring::{CandidatePool, SourceCandidate};
use crate::weights::SourceWeights;

/// Stateless combiner. All inputs are borrowed; nothing is mutated.
#[derive(Debug, Clone)]
pub struct HybridPredictor {
    config: PredictorConfig,
}

impl HybridPredictor {
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// The mode a query will start from. `Adaptive` narrows to one source
    /// when its weight reaches `adaptive_dominance`, otherwise `Hybrid`.
    pub fn resolve_mode(&self, weights: &SourceWeights) -> PredictionMode {
        match self.config.mode {
            PredictionMode::Adaptive => weights
                .dominant(self.config.adaptive_dominance)
                .map_or(PredictionMode::Hybrid, PredictionMode::only),
            mode => mode,
        }
    }

    /// Rank candidates at the provider's current position.
    ///
    /// Each source's candidates are scored `weight[source] * probability`,
    /// with weights renormalised over the sources that produced anything.
    /// A single-source mode that yields nothing falls back to the other
    /// source.
    pub fn predict(
        &self,
        chars: &dyn ICharPredictor,
        segments: &dyn ISegmentProvider,
        weights: &SourceWeights,
    ) -> RankedCandidates {
        let mut cold_start = false;
        let mut gather = |source: Source| match source {
            Source::Character => {
                let dist = chars.predict_next();
                cold_start |= dist.cold_start;
                character_candidates(&dist)
            }
            Source::Segment => segment_candidates(segments),
        };

        let mut mode = self.resolve_mode(weights);
        let mut batches: SmallVec<[(Source, Vec<SourceCandidate>); 2]> = Source::ALL
            .iter()
            .filter(|s| mode.uses(**s))
            .map(|s| (*s, gather(*s)))
            .collect();

        if batches.len() == 1 && batches[0].1.is_empty() {
            let fallback = batches[0].0.other();
            mode = PredictionMode::only(fallback);
            batches[0] = (fallback, gather(fallback));
        }

        let active: SmallVec<[Source; 2]> = batches
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(s, _)| *s)
            .collect();
        let effective = weights.over(&active);

        let mut pool = CandidatePool::default();
        for (source, list) in batches {
            let weight = effective[source.index()];
            for candidate in list {
                pool.add(source, candidate, weight);
            }
        }
        trace!(
            ?mode,
            pooled = pool.len(),
            position = segments.position(),
            "hybrid candidates pooled"
        );

        RankedCandidates {
            candidates: pool.into_ranked(self.config.top_k),
            mode,
            cold_start,
        }
    }
}

fn character_candidates(dist: &glossa_core::CharDistribution) -> Vec<SourceCandidate> {
    dist.entries()
        .iter()
        .map(|(ch, p)| SourceCandidate {
            text: ch.to_string(),
            probability: *p,
            segment: None,
        })
        .collect()
}

/// Continuations implied by partial matches, each with probability
/// proportional to `confidence × occurrences` (uniform if all are zero).
fn segment_candidates(segments: &dyn ISegmentProvider) -> Vec<SourceCandidate> {
    let matches = segments.segments_at(segments.position());
    let proposals: Vec<(String, f64, glossa_core::SegmentId)> = matches
        .iter()
        .filter_map(|m| {
            m.continuation()
                .map(|rest| (rest.to_string(), m.confidence * m.occurrences as f64, m.id))
        })
        .collect();
    if proposals.is_empty() {
        return Vec::new();
    }

    let total: f64 = proposals.iter().map(|(_, raw, _)| raw).sum();
    let n = proposals.len() as f64;
    proposals
        .into_iter()
        .map(|(text, raw, id)| SourceCandidate {
            text,
            probability: if total > 0.0 { raw / total } else { 1.0 / n },
            segment: Some(id),
        })
        .collect()
}
