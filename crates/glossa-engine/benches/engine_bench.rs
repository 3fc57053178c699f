//! Criterion benchmarks for glossa-engine.
//!
//! Covers the two hot paths: per-character ingestion and ranking.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glossa_core::{Outcome, StreamId};
use glossa_engine::GlossaEngine;

const CORPUS: &str = "the quick brown fox jumps over the lazy dog while the cat sleeps ";

fn trained_engine() -> GlossaEngine {
    let engine = GlossaEngine::with_defaults();
    let stream = StreamId::from("train");
    for _ in 0..50 {
        engine.observe_str(&stream, CORPUS);
    }
    engine
}

fn bench_observe(c: &mut Criterion) {
    c.bench_function("observe_corpus_line", |b| {
        let engine = GlossaEngine::with_defaults();
        let stream = StreamId::from("bench");
        b.iter(|| engine.observe_str(&stream, black_box(CORPUS)));
    });
}

fn bench_predict(c: &mut Criterion) {
    let engine = trained_engine();
    let stream = StreamId::from("query");
    engine.observe_str(&stream, "the quick br");

    c.bench_function("predict_trained", |b| {
        b.iter(|| {
            let prediction = engine.predict(black_box(&stream));
            engine.record_feedback(prediction.id, &Outcome::actual("own"));
        });
    });
}

criterion_group!(benches, bench_observe, bench_predict);
criterion_main!(benches);
