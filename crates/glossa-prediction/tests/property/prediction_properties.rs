use chrono::Utc;
use glossa_chars::CharacterModel;
use glossa_core::config::{PredictorConfig, SegmentConfig, TrackerConfig};
use glossa_core::{Outcome, PredictionMode, Source, StreamId};
use glossa_prediction::{HybridPredictor, PerformanceTracker, SourceWeights};
use glossa_segments::SegmentDiscoverer;
use proptest::prelude::*;

fn arb_mode() -> impl Strategy<Value = PredictionMode> {
    prop_oneof![
        Just(PredictionMode::CharacterOnly),
        Just(PredictionMode::SegmentOnly),
        Just(PredictionMode::Hybrid),
        Just(PredictionMode::Adaptive),
    ]
}

proptest! {
    #[test]
    fn ranked_probabilities_sum_to_one(
        text in "[abc ]{0,150}",
        mode in arb_mode(),
        top_k in 1usize..8,
        character in 0.01f64..1.0,
    ) {
        let mut chars = CharacterModel::default();
        let mut segments = SegmentDiscoverer::new(SegmentConfig {
            merge_threshold: 2,
            ..SegmentConfig::default()
        });
        chars.observe_str(&text);
        segments.observe_str(&text);

        let predictor = HybridPredictor::new(PredictorConfig {
            mode,
            top_k,
            ..PredictorConfig::default()
        });
        let weights = SourceWeights::new(character, 1.0 - character + 0.01);
        let ranked = predictor.predict(&chars, &segments, &weights);

        prop_assert!(!ranked.candidates.is_empty());
        prop_assert!(ranked.candidates.len() <= top_k);
        prop_assert!((ranked.total_probability() - 1.0).abs() < 1e-9);
        for pair in ranked.candidates.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn weights_stay_normalised_and_floored(
        feedback in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..200),
    ) {
        let config = TrackerConfig::default();
        let floor = config.weight_floor;
        let mut tracker = PerformanceTracker::new(config);
        let now = Utc::now();
        for (segment_sourced, correct) in feedback {
            let source = if segment_sourced { Source::Segment } else { Source::Character };
            let ranking = glossa_core::RankedCandidates {
                candidates: vec![glossa_core::Candidate {
                    text: "a".into(),
                    score: 1.0,
                    probability: 1.0,
                    sources: smallvec::smallvec![source],
                    segments: smallvec::SmallVec::new(),
                }],
                mode: PredictionMode::Hybrid,
                cold_start: false,
            };
            let id = tracker.issue(StreamId::from("s"), &ranking, now);
            let actual = if correct { "a" } else { "b" };
            tracker.record_feedback(id, &Outcome::actual(actual), now);

            let w = tracker.weights();
            let total: f64 = w.as_array().iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
            for s in Source::ALL {
                prop_assert!(w.get(s) >= floor - 1e-12);
            }
        }
    }

    #[test]
    fn expired_predictions_never_apply(
        max_pending in 1usize..6,
        answered in proptest::collection::vec(any::<bool>(), 1..80),
    ) {
        let mut tracker = PerformanceTracker::new(TrackerConfig {
            max_pending,
            ..TrackerConfig::default()
        });
        let now = Utc::now();
        let empty = glossa_core::RankedCandidates {
            candidates: Vec::new(),
            mode: PredictionMode::Hybrid,
            cold_start: false,
        };
        let mut unanswered = Vec::new();
        for answer in answered {
            let id = tracker.issue(StreamId::from("s"), &empty, now);
            if answer {
                tracker.record_feedback(id, &Outcome::actual("a"), now);
            } else {
                unanswered.push(id);
            }
            prop_assert!(tracker.pending() <= max_pending);
        }
        let newest = tracker.state().next_id - 1;
        for id in unanswered {
            let live = newest - id.0 < max_pending as u64;
            let status = tracker.record_feedback(id, &Outcome::actual("a"), now);
            prop_assert_eq!(status.is_stale(), !live);
        }
        prop_assert_eq!(tracker.metrics().expired, tracker.ledger().expired_total());
    }
}
