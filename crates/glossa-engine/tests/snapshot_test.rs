use glossa_core::errors::{ErrorCode, SnapshotError};
use glossa_core::traits::ISnapshotStore;
use glossa_core::{GlossaConfig, GlossaError, Outcome, StreamId};
use glossa_engine::{FileSnapshotStore, GlossaEngine, MemorySnapshotStore, Snapshot};

fn trained() -> GlossaEngine {
    let engine = GlossaEngine::with_defaults();
    let a = StreamId::from("a");
    let b = StreamId::from("b");
    for _ in 0..5 {
        engine.observe_str(&a, "the quick brown fox ");
        engine.observe_str(&b, "jumps over the lazy dog ");
    }
    for stream in [&a, &b] {
        let prediction = engine.predict(stream);
        engine.record_feedback(prediction.id, &Outcome::actual("t"));
    }
    engine
}

fn drive(engine: &GlossaEngine) -> Vec<glossa_engine::Prediction> {
    let a = StreamId::from("a");
    let b = StreamId::from("b");
    let mut out = Vec::new();
    for text in ["the qu", "jum", "ick brown"] {
        engine.observe_str(&a, text);
        engine.observe_str(&b, text);
        out.push(engine.predict(&a));
        out.push(engine.predict(&b));
    }
    out
}

#[test]
fn restored_engine_continues_identically() {
    let original = trained();
    let bytes = original.export_state().to_json().unwrap();

    let restored = GlossaEngine::from_snapshot_bytes(GlossaConfig::default(), &bytes).unwrap();
    assert_eq!(restored.stream_ids(), original.stream_ids());
    assert_eq!(restored.weights(), original.weights());

    assert_eq!(drive(&original), drive(&restored));
    assert_eq!(original.export_state(), restored.export_state());
}

#[test]
fn snapshot_json_roundtrip_is_lossless() {
    let snapshot = trained().export_state();
    let decoded = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(decoded, snapshot);
}

#[test]
fn import_discards_in_flight_predictions() {
    let original = trained();
    let snapshot = original.export_state();
    let pending = original.predict(&StreamId::from("a"));

    original.import_state(snapshot).unwrap();
    assert_eq!(original.pending_predictions(), 0);
    assert!(original
        .record_feedback(pending.id, &Outcome::actual("x"))
        .is_stale());
}

#[test]
fn unknown_version_is_rejected() {
    let mut snapshot = trained().export_state();
    snapshot.version = 99;
    let bytes = snapshot.to_json().unwrap();

    let err = Snapshot::from_json(&bytes).unwrap_err();
    assert!(matches!(
        err,
        SnapshotError::VersionMismatch { found: 99, .. }
    ));
    assert_eq!(err.error_code(), "SNAPSHOT_VERSION");
}

#[test]
fn mismatched_windows_are_incompatible() {
    let snapshot = trained().export_state();
    let mut config = GlossaConfig::default();
    config.chars.max_context_len = 3;
    let engine = GlossaEngine::new(config).unwrap();

    let err = engine.import_state(snapshot).unwrap_err();
    assert!(matches!(
        err,
        GlossaError::Snapshot(SnapshotError::IncompatibleConfig { .. })
    ));
    // Failed imports leave the engine untouched.
    assert!(engine.stream_ids().is_empty());
}

#[test]
fn tunables_may_differ_between_export_and_import() {
    let snapshot = trained().export_state();
    let mut config = GlossaConfig::default();
    config.predictor.top_k = 3;
    config.tracker.learning_rate = 0.2;
    let engine = GlossaEngine::new(config).unwrap();

    engine.import_state(snapshot).unwrap();
    let prediction = engine.predict(&StreamId::from("a"));
    assert!(prediction.ranking.candidates.len() <= 3);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let err = Snapshot::from_json(b"not json").unwrap_err();
    assert!(matches!(err, SnapshotError::Deserialize { .. }));
}

#[test]
fn memory_store_roundtrip() {
    let store = MemorySnapshotStore::new();
    let original = trained();
    original.save_to(&store).unwrap();

    let restored = GlossaEngine::with_defaults();
    restored.load_from(&store).unwrap();
    assert_eq!(restored.export_state(), original.export_state());
}

#[test]
fn file_store_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path().join("glossa.json"));
    let original = trained();
    original.save_to(&store).unwrap();
    assert!(store.load().is_ok());

    let restored = GlossaEngine::with_defaults();
    restored.load_from(&store).unwrap();
    assert_eq!(drive(&original), drive(&restored));
}

#[test]
fn loading_from_an_empty_store_fails() {
    let engine = GlossaEngine::with_defaults();
    let err = engine.load_from(&MemorySnapshotStore::new()).unwrap_err();
    assert!(matches!(err, GlossaError::Snapshot(SnapshotError::Missing)));
}

#[test]
fn per_segment_metrics_survive_export_and_import() {
    let mut config = GlossaConfig::default();
    config.predictor.top_k = 10;
    let original = GlossaEngine::new(config.clone()).unwrap();
    original.observe_str(&StreamId::from("train"), &"xyz".repeat(10));
    let query = StreamId::from("query");
    original.observe(&query, 'x');
    let prediction = original.predict(&query);
    let rank = prediction
        .ranking
        .candidates
        .iter()
        .position(|c| c.text == "yz")
        .expect("continuation yz");
    original.record_feedback(prediction.id, &Outcome::actual("yz").evaluating(rank));
    let before = original.segment_analysis("xyz").expect("xyz judged");

    let restored = GlossaEngine::new(config).unwrap();
    restored.import_state(original.export_state()).unwrap();
    assert_eq!(restored.segment_analysis("xyz"), Some(before));
}
