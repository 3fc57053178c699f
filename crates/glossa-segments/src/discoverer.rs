//! Segment discoverer front ends implementing [`ISegmentProvider`].

use glossa_core::config::SegmentConfig;
use glossa_core::traits::{ISegmentFeedback, ISegmentProvider};
use glossa_core::{SegmentId, SegmentMatch};

use crate::buffer::SegmentBuffer;
use crate::matching;
use crate::stats::VocabularyStats;
use crate::vocabulary::{ObserveOutcome, SegmentVocabulary};

/// Owning single-stream discoverer.
#[derive(Debug, Clone)]
pub struct SegmentDiscoverer {
    vocab: SegmentVocabulary,
    buffer: SegmentBuffer,
}

impl SegmentDiscoverer {
    pub fn new(config: SegmentConfig) -> Self {
        let vocab = SegmentVocabulary::new(config);
        let buffer = vocab.new_buffer();
        Self { vocab, buffer }
    }

    pub fn observe(&mut self, ch: char) -> ObserveOutcome {
        self.vocab.observe(&mut self.buffer, ch)
    }

    pub fn observe_str(&mut self, text: &str) -> Vec<ObserveOutcome> {
        text.chars().map(|ch| self.observe(ch)).collect()
    }

    pub fn segment_text(&self, text: &str) -> Vec<String> {
        matching::segment_text(&self.vocab, text)
    }

    pub fn stats(&self) -> VocabularyStats {
        VocabularyStats::collect(&self.vocab)
    }

    pub fn vocabulary(&self) -> &SegmentVocabulary {
        &self.vocab
    }

    pub fn vocabulary_mut(&mut self) -> &mut SegmentVocabulary {
        &mut self.vocab
    }

    pub fn buffer(&self) -> &SegmentBuffer {
        &self.buffer
    }

    pub fn view(&self) -> SegmentView<'_> {
        SegmentView::new(&self.vocab, &self.buffer)
    }
}

impl Default for SegmentDiscoverer {
    fn default() -> Self {
        Self::new(SegmentConfig::default())
    }
}

impl ISegmentProvider for SegmentDiscoverer {
    fn segments_at(&self, position: u64) -> Vec<SegmentMatch> {
        matching::segments_at(&self.vocab, &self.buffer, position)
    }

    fn position(&self) -> u64 {
        self.buffer.position()
    }
}

impl ISegmentFeedback for SegmentDiscoverer {
    fn record_signal(&mut self, id: SegmentId, useful: bool) -> bool {
        self.vocab.record_signal(id, useful)
    }
}

/// A shared vocabulary seen through one stream's buffer.
#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    vocab: &'a SegmentVocabulary,
    buffer: &'a SegmentBuffer,
}

impl<'a> SegmentView<'a> {
    pub fn new(vocab: &'a SegmentVocabulary, buffer: &'a SegmentBuffer) -> Self {
        Self { vocab, buffer }
    }
}

impl ISegmentProvider for SegmentView<'_> {
    fn segments_at(&self, position: u64) -> Vec<SegmentMatch> {
        matching::segments_at(self.vocab, self.buffer, position)
    }

    fn position(&self) -> u64 {
        self.buffer.position()
    }
}
