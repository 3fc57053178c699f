//! GlossaEngine: the multi-stream entry point.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use dashmap::DashMap;
use glossa_chars::{CharView, ContextTable, TableStats};
use glossa_core::traits::{ISegmentFeedback, ISnapshotStore};
use glossa_core::constants::SNAPSHOT_VERSION;
use glossa_core::{
    Condition, GlossaConfig, GlossaError, GlossaResult, Outcome, PredictionId, PredictionMode,
    RankedCandidates, SegmentId, SegmentMatch, StreamId,
};
use glossa_prediction::{
    FeedbackStatus, HybridPredictor, PerformanceTracker, SegmentAnalysis, SourceWeights,
    TrackerMetrics,
};
use glossa_segments::{
    matching, ArchivedSegment, SegmentVocabulary, SegmentView, VocabularyStats,
};
use tracing::{debug, info};

use crate::report::{ObserveReport, Prediction};
use crate::snapshot::Snapshot;
use crate::stream::StreamState;

type StreamHandle = Arc<Mutex<StreamState>>;

/// Predictive core serving any number of independent streams.
///
/// Characters on one stream are processed strictly in call order; separate
/// streams may be driven from separate threads.
pub struct GlossaEngine {
    config: GlossaConfig,
    predictor: HybridPredictor,
    streams: DashMap<StreamId, StreamHandle>,
    chars: RwLock<ContextTable>,
    vocab: RwLock<SegmentVocabulary>,
    tracker: RwLock<PerformanceTracker>,
}

impl GlossaEngine {
    /// Build an engine. Fails only if `config` is invalid.
    pub fn new(config: GlossaConfig) -> GlossaResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::build(GlossaConfig::default())
    }

    fn build(config: GlossaConfig) -> Self {
        Self {
            predictor: HybridPredictor::new(config.predictor.clone()),
            streams: DashMap::new(),
            chars: RwLock::new(ContextTable::new(config.chars.clone())),
            vocab: RwLock::new(SegmentVocabulary::new(config.segments.clone())),
            tracker: RwLock::new(PerformanceTracker::new(config.tracker.clone())),
            config,
        }
    }

    pub fn config(&self) -> &GlossaConfig {
        &self.config
    }

    // --- ingestion ---

    /// Feed one character to `stream_id`, opening the stream on first use.
    pub fn observe(&self, stream_id: &StreamId, ch: char) -> ObserveReport {
        let handle = self.stream_or_open(stream_id);
        let mut state = lock(&handle);
        let StreamState { history, buffer, .. } = &mut *state;

        {
            let mut table = write(&self.chars);
            table.observe(history, ch);
        }
        history.push(ch);

        let outcome = write(&self.vocab).observe(buffer, ch);
        let condition = (!outcome.evicted.is_empty()).then_some(Condition::VocabularyFull);
        if !outcome.evicted.is_empty() {
            write(&self.tracker).forget_segments(&outcome.evicted);
        }
        if let Some(id) = outcome.merged {
            debug!(stream = %stream_id, segment = %id, position = history.position(), "segment discovered");
        }

        ObserveReport {
            position: history.position(),
            merged: outcome.merged,
            evicted: outcome.evicted,
            condition,
        }
    }

    /// Feed every character of `text` in order.
    pub fn observe_str(&self, stream_id: &StreamId, text: &str) -> Vec<ObserveReport> {
        text.chars().map(|ch| self.observe(stream_id, ch)).collect()
    }

    // --- prediction ---

    /// Rank continuations for the stream's current position and issue a
    /// prediction id for later feedback. An unknown stream predicts from an
    /// empty history.
    pub fn predict(&self, stream_id: &StreamId) -> Prediction {
        self.predict_on(stream_id, self.stream(stream_id))
    }

    /// The stream lock is held from ranking through issuing, so a concurrent
    /// `close_stream` either expires the new id or is seen as `closed` here.
    fn predict_on(&self, stream_id: &StreamId, handle: Option<StreamHandle>) -> Prediction {
        let weights = read(&self.tracker).weights();

        let (ranking, position, id) = match handle {
            Some(handle) => {
                let state = lock(&handle);
                let ranking = self.rank(&state, &weights);
                let mut tracker = write(&self.tracker);
                let id = tracker.issue(stream_id.clone(), &ranking, Utc::now());
                if state.closed {
                    tracker.expire(id);
                    debug!(
                        stream = %stream_id,
                        prediction = %id,
                        "stream closed during prediction, expired"
                    );
                }
                (ranking, state.position(), id)
            }
            None => {
                let state = StreamState::new(&self.config);
                let ranking = self.rank(&state, &weights);
                let id = write(&self.tracker).issue(stream_id.clone(), &ranking, Utc::now());
                (ranking, 0, id)
            }
        };

        if ranking.cold_start {
            debug!(stream = %stream_id, prediction = %id, "cold start prediction");
        }
        Prediction {
            id,
            stream_id: stream_id.clone(),
            position,
            ranking,
        }
    }

    fn rank(&self, state: &StreamState, weights: &SourceWeights) -> RankedCandidates {
        let table = read(&self.chars);
        let vocab = read(&self.vocab);
        self.predictor.predict(
            &CharView::new(&table, &state.history),
            &SegmentView::new(&vocab, &state.buffer),
            weights,
        )
    }

    // --- feedback ---

    /// Apply ground truth to an issued prediction. Stale ids are a no-op.
    pub fn record_feedback(&self, id: PredictionId, outcome: &Outcome) -> FeedbackStatus {
        let status = write(&self.tracker).record_feedback(id, outcome, Utc::now());

        if let FeedbackStatus::Applied(report) = &status {
            if !report.segment_signals.is_empty() {
                let mut vocab = write(&self.vocab);
                for (segment, useful) in &report.segment_signals {
                    vocab.record_signal(*segment, *useful);
                }
            }
        }
        status
    }

    // --- stream lifecycle ---

    /// Discard a stream's private state and expire its in-flight predictions.
    /// Returns the number of predictions expired.
    pub fn close_stream(&self, stream_id: &StreamId) -> GlossaResult<usize> {
        let Some((_, handle)) = self.streams.remove(stream_id) else {
            return Err(GlossaError::UnknownStream {
                stream_id: stream_id.to_string(),
            });
        };
        let mut state = lock(&handle);
        state.closed = true;
        let expired = write(&self.tracker).expire_stream(stream_id);
        drop(state);
        info!(stream = %stream_id, expired, "stream closed");
        Ok(expired)
    }

    /// Open stream ids, sorted.
    pub fn stream_ids(&self) -> Vec<StreamId> {
        let mut ids: Vec<StreamId> = self.streams.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn stream_position(&self, stream_id: &StreamId) -> Option<u64> {
        self.stream(stream_id).map(|handle| lock(&handle).position())
    }

    /// Segments aligned with `stream_id` ending at `position`.
    pub fn segments_at(&self, stream_id: &StreamId, position: u64) -> GlossaResult<Vec<SegmentMatch>> {
        let handle = self.stream(stream_id).ok_or_else(|| GlossaError::UnknownStream {
            stream_id: stream_id.to_string(),
        })?;
        let state = lock(&handle);
        let vocab = read(&self.vocab);
        Ok(matching::segments_at(&vocab, &state.buffer, position))
    }

    /// Greedy longest-match tokenization with the current vocabulary.
    pub fn segment_text(&self, text: &str) -> Vec<String> {
        matching::segment_text(&read(&self.vocab), text)
    }

    pub fn lookup_segment(&self, content: &str) -> Option<SegmentId> {
        read(&self.vocab).lookup(content)
    }

    /// Share of counted adjacent token pairs that were `left` then `right`.
    pub fn pair_strength(&self, left: &str, right: &str) -> f64 {
        read(&self.vocab).pair_strength(left, right)
    }

    /// Evicted segments still available for restore, oldest eviction first.
    pub fn archived_segments(&self) -> Vec<ArchivedSegment> {
        read(&self.vocab).archive().iter().cloned().collect()
    }

    /// Return an archived segment to the live vocabulary. `None` when the
    /// content is not archived or is already live.
    pub fn restore_segment(&self, content: &str) -> Option<SegmentId> {
        let (id, evicted) = write(&self.vocab).restore_from_archive(content)?;
        if !evicted.is_empty() {
            write(&self.tracker).forget_segments(&evicted);
        }
        info!(segment = %id, content, displaced = evicted.len(), "segment restored");
        Some(id)
    }

    // --- per-segment outcomes ---

    /// Up to `max` live segments recommended by feedback, best first, with
    /// their content.
    pub fn best_segments(&self, max: usize) -> Vec<(String, SegmentAnalysis)> {
        let best = read(&self.tracker).best_segments(max);
        let vocab = read(&self.vocab);
        best.into_iter()
            .filter_map(|analysis| {
                let content = vocab.get(analysis.segment)?.content().to_string();
                Some((content, analysis))
            })
            .collect()
    }

    pub fn segment_analysis(&self, content: &str) -> Option<SegmentAnalysis> {
        let id = self.lookup_segment(content)?;
        read(&self.tracker).segment_analysis(id)
    }

    pub fn should_use_segment(&self, content: &str) -> bool {
        self.lookup_segment(content)
            .is_some_and(|id| read(&self.tracker).should_use_segment(id))
    }

    // --- diagnostics ---

    pub fn weights(&self) -> SourceWeights {
        read(&self.tracker).weights()
    }

    pub fn metrics(&self) -> TrackerMetrics {
        read(&self.tracker).metrics().clone()
    }

    pub fn recommended_mode(&self) -> PredictionMode {
        read(&self.tracker).recommended_mode()
    }

    pub fn pending_predictions(&self) -> usize {
        read(&self.tracker).pending()
    }

    /// Expire predictions past their time window now rather than lazily.
    pub fn expire_pending(&self) -> usize {
        write(&self.tracker).expire_due(Utc::now())
    }

    pub fn vocabulary_stats(&self) -> VocabularyStats {
        VocabularyStats::collect(&read(&self.vocab))
    }

    pub fn table_stats(&self) -> TableStats {
        read(&self.chars).stats()
    }

    // --- persistence ---

    /// Capture the full learned state. Streams are locked in id order, then
    /// the context table and vocabulary, so the capture is consistent.
    pub fn export_state(&self) -> Snapshot {
        let ids = self.stream_ids();
        let handles: Vec<(StreamId, StreamHandle)> = ids
            .into_iter()
            .filter_map(|id| self.stream(&id).map(|h| (id, h)))
            .collect();
        let guards: Vec<(StreamId, MutexGuard<'_, StreamState>)> = handles
            .iter()
            .map(|(id, handle)| (id.clone(), lock(handle)))
            .collect();

        let chars = read(&self.chars).clone();
        let vocabulary = read(&self.vocab).clone();
        let streams = guards
            .iter()
            .map(|(id, state)| (id.clone(), (**state).clone()))
            .collect();
        drop(guards);

        let tracker = read(&self.tracker).state();
        info!(
            streams = handles.len(),
            segments = vocabulary.len(),
            contexts = chars.len(),
            "state exported"
        );
        Snapshot {
            version: SNAPSHOT_VERSION,
            config: self.config.clone(),
            chars,
            vocabulary,
            tracker,
            streams,
        }
    }

    /// Replace all learned state with `snapshot`.
    ///
    /// Window sizes must match the engine's configuration; other tunables
    /// are taken from the engine. In-flight predictions are discarded.
    pub fn import_state(&self, snapshot: Snapshot) -> GlossaResult<()> {
        snapshot.check_compatible(&self.config)?;
        let Snapshot {
            mut chars,
            mut vocabulary,
            tracker,
            streams,
            ..
        } = snapshot;
        chars.reconfigure(self.config.chars.clone());
        let evicted = vocabulary.reconfigure(self.config.segments.clone());

        let stream_count = streams.len();
        {
            let mut table = write(&self.chars);
            let mut vocab = write(&self.vocab);
            *table = chars;
            *vocab = vocabulary;
            self.streams.clear();
            for (id, state) in streams {
                self.streams.insert(id, Arc::new(Mutex::new(state)));
            }
        }
        {
            let mut restored = write(&self.tracker);
            restored.restore(tracker);
            restored.forget_segments(&evicted);
        }

        info!(streams = stream_count, "state imported");
        Ok(())
    }

    /// Export and hand the encoded snapshot to `store`.
    pub fn save_to(&self, store: &dyn ISnapshotStore) -> GlossaResult<()> {
        let bytes = self.export_state().to_json()?;
        store.save(&bytes)?;
        Ok(())
    }

    /// Load the stored snapshot from `store` and import it.
    pub fn load_from(&self, store: &dyn ISnapshotStore) -> GlossaResult<()> {
        let bytes = store.load()?;
        let snapshot = Snapshot::from_json(&bytes)?;
        self.import_state(snapshot)
    }

    /// Build an engine directly from encoded snapshot bytes.
    pub fn from_snapshot_bytes(config: GlossaConfig, bytes: &[u8]) -> GlossaResult<Self> {
        let engine = Self::new(config)?;
        let snapshot = Snapshot::from_json(bytes)?;
        engine.import_state(snapshot)?;
        Ok(engine)
    }

    fn stream(&self, stream_id: &StreamId) -> Option<StreamHandle> {
        self.streams.get(stream_id).map(|entry| Arc::clone(entry.value()))
    }

    fn stream_or_open(&self, stream_id: &StreamId) -> StreamHandle {
        if let Some(handle) = self.stream(stream_id) {
            return handle;
        }
        let entry = self.streams.entry(stream_id.clone()).or_insert_with(|| {
            debug!(stream = %stream_id, "stream opened");
            Arc::new(Mutex::new(StreamState::new(&self.config)))
        });
        Arc::clone(entry.value())
    }
}

impl std::fmt::Debug for GlossaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlossaEngine")
            .field("streams", &self.streams.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// A panic while a lock is held leaves the data usable; recover the guard.

fn lock(handle: &Mutex<StreamState>) -> MutexGuard<'_, StreamState> {
    handle.lock().unwrap_or_else(|e| e.into_inner())
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
