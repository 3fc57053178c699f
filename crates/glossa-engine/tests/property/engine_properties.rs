use glossa_core::{GlossaConfig, Outcome, StreamId};
use glossa_engine::GlossaEngine;
use proptest::prelude::*;

fn small_config(cap: usize) -> GlossaConfig {
    let mut config = GlossaConfig::default();
    config.segments.merge_threshold = 2;
    config.segments.vocabulary_cap = cap;
    config.segments.pair_table_cap = cap * 4;
    config
}

proptest! {
    #[test]
    fn predictions_are_normalised_at_every_step(
        text in "[a-d ]{1,80}",
    ) {
        let engine = GlossaEngine::new(small_config(16)).unwrap();
        let stream = StreamId::from("s");
        for ch in text.chars() {
            engine.observe(&stream, ch);
            let prediction = engine.predict(&stream);
            prop_assert!(!prediction.ranking.candidates.is_empty());
            prop_assert!((prediction.ranking.total_probability() - 1.0).abs() < 1e-9);
            engine.record_feedback(prediction.id, &Outcome::actual(ch.to_string()));
        }
    }

    #[test]
    fn vocabulary_never_exceeds_its_cap(
        texts in proptest::collection::vec("[a-f]{1,40}", 1..4),
        cap in 4usize..12,
    ) {
        let engine = GlossaEngine::new(small_config(cap)).unwrap();
        for (i, text) in texts.iter().enumerate() {
            let stream = StreamId::new(format!("s{i}"));
            engine.observe_str(&stream, text);
            engine.observe_str(&stream, text);
            prop_assert!(engine.vocabulary_stats().live_segments <= cap);
        }
    }

    #[test]
    fn identical_input_is_deterministic(
        text in "[a-e ]{0,120}",
    ) {
        let a = GlossaEngine::new(small_config(32)).unwrap();
        let b = GlossaEngine::new(small_config(32)).unwrap();
        let stream = StreamId::from("s");
        a.observe_str(&stream, &text);
        b.observe_str(&stream, &text);
        prop_assert_eq!(a.predict(&stream), b.predict(&stream));
        prop_assert_eq!(a.export_state(), b.export_state());
    }
}
