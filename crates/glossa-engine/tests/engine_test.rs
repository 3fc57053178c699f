use glossa_core::errors::{ConfigError, ErrorCode};
use glossa_core::{Condition, GlossaConfig, GlossaError, Outcome, PredictionMode, Source, StreamId};
use glossa_engine::{FeedbackStatus, GlossaEngine};

fn engine() -> GlossaEngine {
    GlossaEngine::new(GlossaConfig::default()).unwrap()
}

fn top_k(k: usize) -> GlossaConfig {
    let mut config = GlossaConfig::default();
    config.predictor.top_k = k;
    config
}

#[test]
fn invalid_config_is_rejected_at_startup() {
    let mut config = GlossaConfig::default();
    config.segments.vocabulary_cap = 1;
    let err = GlossaEngine::new(config).unwrap_err();
    assert!(matches!(
        err,
        GlossaError::Config(ConfigError::CapacityExceeded { .. })
    ));
    assert_eq!(err.error_code(), "CAPACITY_EXCEEDED");
}

#[test]
fn fresh_engine_predicts_cold_start_uniform() {
    let engine = engine();
    let prediction = engine.predict(&StreamId::from("new"));
    assert!(prediction.ranking.cold_start);
    assert_eq!(prediction.position, 0);
    assert_eq!(prediction.ranking.candidates.len(), 5);
    assert!((prediction.ranking.total_probability() - 1.0).abs() < 1e-9);
    // Predicting on an unknown stream does not open it.
    assert!(engine.stream_ids().is_empty());
}

#[test]
fn alternating_stream_discovers_ab() {
    let engine = engine();
    let stream = StreamId::from("ab");
    for _ in 0..3 {
        engine.observe_str(&stream, "ababababab");
    }
    let matches = engine.segments_at(&stream, 4).unwrap();
    assert!(matches.iter().any(|m| m.content == "ab" && m.is_complete()));
    assert!(engine.vocabulary_stats().live_segments >= 1);
}

#[test]
fn observe_reports_position_and_merges() {
    let engine = engine();
    let stream = StreamId::from("s");
    let reports = engine.observe_str(&stream, "ababababab");
    assert_eq!(reports.last().unwrap().position, 10);
    assert!(reports[6].merged.is_some());
    assert_eq!(engine.stream_position(&stream), Some(10));
}

#[test]
fn vocabulary_pressure_reports_vocabulary_full() {
    let mut config = GlossaConfig::default();
    config.segments.merge_threshold = 1;
    config.segments.vocabulary_cap = 4;
    let engine = GlossaEngine::new(config).unwrap();
    let reports = engine.observe_str(
        &StreamId::from("s"),
        "pack my box with five dozen liquor jugs",
    );
    assert!(reports
        .iter()
        .any(|r| r.condition == Some(Condition::VocabularyFull)));
    assert!(engine.vocabulary_stats().live_segments <= 4);
}

#[test]
fn trained_stream_predicts_its_continuation() {
    let engine = engine();
    let stream = StreamId::from("s");
    for _ in 0..10 {
        engine.observe_str(&stream, "hello world ");
    }
    engine.observe_str(&stream, "hell");
    let prediction = engine.predict(&stream);
    assert!(!prediction.ranking.cold_start);
    assert!(prediction.best().is_some_and(|t| t.starts_with('o')));
}

#[test]
fn segment_feedback_raises_segment_weight_and_confidence() {
    let engine = GlossaEngine::new(top_k(10)).unwrap();
    engine.observe_str(&StreamId::from("train"), &"xyz".repeat(10));
    let query = StreamId::from("query");
    engine.observe(&query, 'x');

    let prediction = engine.predict(&query);
    let rank = prediction
        .ranking
        .candidates
        .iter()
        .position(|c| c.text == "yz")
        .expect("xyz implies the continuation yz");
    assert_eq!(
        prediction.ranking.candidates[rank].sources.as_slice(),
        &[Source::Segment]
    );

    let before = engine.vocabulary_stats().avg_confidence;
    let status = engine.record_feedback(prediction.id, &Outcome::actual("yzx").evaluating(rank));
    let report = status.report().unwrap();
    assert!(report.correct);
    assert!(!report.segment_signals.is_empty());
    assert!(engine.weights().get(Source::Segment) > 0.5);
    assert!(engine.vocabulary_stats().avg_confidence > before);
}

#[test]
fn repeated_segment_success_makes_segment_source_dominate() {
    let engine = GlossaEngine::new(top_k(32)).unwrap();
    engine.observe_str(&StreamId::from("train"), &"xyz".repeat(10));
    let query = StreamId::from("query");
    engine.observe(&query, 'x');

    let mut previous = engine.weights().get(Source::Segment);
    for _ in 0..120 {
        let prediction = engine.predict(&query);
        let rank = prediction
            .ranking
            .candidates
            .iter()
            .position(|c| c.text == "yz" && c.sources.as_slice() == [Source::Segment])
            .expect("segment continuation stays available");
        engine.record_feedback(prediction.id, &Outcome::actual("yz").evaluating(rank));
        let current = engine.weights().get(Source::Segment);
        assert!(current >= previous - 1e-9);
        previous = current;
        engine.observe_str(&query, "yzx");
    }
    let weights = engine.weights();
    assert!(weights.get(Source::Segment) > 0.9);
    assert!(weights.get(Source::Segment) > weights.get(Source::Character));
}

#[test]
fn stale_feedback_changes_no_weights() {
    let mut config = GlossaConfig::default();
    config.tracker.max_pending = 1;
    let engine = GlossaEngine::new(config).unwrap();
    let stream = StreamId::from("s");
    engine.observe_str(&stream, "abc");
    let first = engine.predict(&stream);
    let _second = engine.predict(&stream);
    let before = engine.weights();

    let status = engine.record_feedback(first.id, &Outcome::actual("x"));
    assert_eq!(status, FeedbackStatus::Stale(first.id));
    assert_eq!(status.condition(), Some(Condition::StaleFeedback));
    assert_eq!(engine.weights(), before);
}

#[test]
fn closing_a_stream_expires_its_predictions() {
    let engine = engine();
    let a = StreamId::from("a");
    let b = StreamId::from("b");
    engine.observe_str(&a, "abc");
    engine.observe_str(&b, "abc");
    let pa = engine.predict(&a);
    let pb = engine.predict(&b);

    assert_eq!(engine.close_stream(&a).unwrap(), 1);
    assert_eq!(engine.stream_ids(), vec![b.clone()]);
    assert!(engine.record_feedback(pa.id, &Outcome::actual("a")).is_stale());
    assert!(!engine.record_feedback(pb.id, &Outcome::actual("a")).is_stale());

    let err = engine.close_stream(&a).unwrap_err();
    assert!(matches!(err, GlossaError::UnknownStream { .. }));
}

#[test]
fn segments_at_unknown_stream_is_an_error() {
    let engine = engine();
    let err = engine.segments_at(&StreamId::from("nope"), 0).unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_STREAM");
}

#[test]
fn character_only_mode_never_uses_segments() {
    let mut config = GlossaConfig::default();
    config.predictor.mode = PredictionMode::CharacterOnly;
    let engine = GlossaEngine::new(config).unwrap();
    engine.observe_str(&StreamId::from("train"), &"xyz".repeat(10));
    let query = StreamId::from("query");
    engine.observe(&query, 'x');
    let prediction = engine.predict(&query);
    assert_eq!(prediction.ranking.mode, PredictionMode::CharacterOnly);
    assert!(prediction
        .ranking
        .candidates
        .iter()
        .all(|c| c.sources.as_slice() == [Source::Character]));
}

#[test]
fn greedy_segmentation_uses_discovered_segments() {
    let engine = engine();
    engine.observe_str(&StreamId::from("train"), &"xyz".repeat(10));
    let tokens = engine.segment_text("xyzxyz");
    assert_eq!(tokens.concat(), "xyzxyz");
    assert!(tokens.len() < 6);
}

#[test]
fn identical_input_yields_identical_state_and_predictions() {
    let a = engine();
    let b = engine();
    let stream = StreamId::from("s");
    let text = "the cat sat on the mat with the hat ";
    for _ in 0..3 {
        a.observe_str(&stream, text);
        b.observe_str(&stream, text);
    }
    assert_eq!(a.predict(&stream), b.predict(&stream));
    assert_eq!(a.export_state(), b.export_state());
}

#[test]
fn old_prediction_expires_even_when_later_ones_are_answered() {
    let mut config = GlossaConfig::default();
    config.tracker.max_pending = 2;
    let engine = GlossaEngine::new(config).unwrap();
    let stream = StreamId::from("s");
    engine.observe_str(&stream, "hello hello ");
    let old = engine.predict(&stream);
    for _ in 0..50 {
        let prediction = engine.predict(&stream);
        engine.record_feedback(prediction.id, &Outcome::actual("h"));
    }
    let before = engine.weights();

    let status = engine.record_feedback(old.id, &Outcome::actual("zzz"));
    assert_eq!(status, FeedbackStatus::Stale(old.id));
    assert_eq!(engine.weights(), before);
    assert_eq!(engine.metrics().expired, 1);
}

#[test]
fn segment_feedback_builds_per_segment_metrics() {
    let mut config = top_k(10);
    config.tracker.segment_min_samples = 2;
    config.tracker.segment_accuracy_threshold = 0.5;
    let engine = GlossaEngine::new(config).unwrap();
    engine.observe_str(&StreamId::from("train"), &"xyz".repeat(10));

    for i in 0..3 {
        let query = StreamId::new(format!("query-{i}"));
        engine.observe(&query, 'x');
        let prediction = engine.predict(&query);
        let rank = prediction
            .ranking
            .candidates
            .iter()
            .position(|c| c.text == "yz")
            .expect("xyz implies the continuation yz");
        engine.record_feedback(prediction.id, &Outcome::actual("yzx").evaluating(rank));
    }

    let best = engine.best_segments(5);
    let (content, analysis) = best.first().expect("a recommended segment");
    assert!(content.starts_with('x') && content.ends_with("yz"));
    assert_eq!(analysis.metrics.hits(), 3);
    assert!(analysis.recommended);
    assert!(engine.should_use_segment(content));
    assert_eq!(engine.segment_analysis(content).as_ref(), Some(analysis));
    assert!(engine.segment_analysis("no such segment").is_none());
}

#[test]
fn evicted_segments_are_archived_and_restorable() {
    let mut config = GlossaConfig::default();
    config.segments.merge_threshold = 1;
    config.segments.vocabulary_cap = 4;
    config.segments.archive_cap = 8;
    let engine = GlossaEngine::new(config).unwrap();
    engine.observe_str(&StreamId::from("s"), "pack my box with five dozen liquor jugs");

    let archived = engine.archived_segments();
    assert!(!archived.is_empty() && archived.len() <= 8);
    assert_eq!(engine.vocabulary_stats().archived, archived.len());

    let content = archived[archived.len() - 1].segment.content().to_string();
    assert!(engine.lookup_segment(&content).is_none());
    let id = engine.restore_segment(&content).expect("archived segment restores");
    assert_eq!(engine.lookup_segment(&content), Some(id));
    assert!(engine.vocabulary_stats().live_segments <= 4);
    assert!(engine.restore_segment(&content).is_none());
}

#[test]
fn pair_strength_favours_frequent_neighbours() {
    let mut config = GlossaConfig::default();
    config.segments.merge_threshold = 50;
    let engine = GlossaEngine::new(config).unwrap();
    engine.observe_str(&StreamId::from("s"), "abababab xa");
    assert!(engine.pair_strength("a", "b") > engine.pair_strength("b", " "));
    assert!(engine.pair_strength("b", " ") > 0.0);
    assert_eq!(engine.pair_strength("z", "z"), 0.0);
}
