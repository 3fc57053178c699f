use glossa_chars::CharHistory;
use glossa_core::GlossaConfig;
use glossa_segments::SegmentBuffer;
use serde::{Deserialize, Serialize};

/// Private per-stream state. Discarded when the stream is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamState {
    pub history: CharHistory,
    pub buffer: SegmentBuffer,
    /// Set under the stream lock once the stream is torn down.
    #[serde(skip)]
    pub(crate) closed: bool,
}

impl StreamState {
    pub fn new(config: &GlossaConfig) -> Self {
        Self {
            history: CharHistory::new(config.chars.max_context_len),
            buffer: SegmentBuffer::new(config.segments.buffer_len),
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn position(&self) -> u64 {
        self.history.position()
    }

    /// Whether this state was built with the same window sizes as `config`.
    pub fn fits(&self, config: &GlossaConfig) -> bool {
        self.history.capacity() == config.chars.max_context_len
            && self.buffer.capacity() == config.segments.buffer_len
            && self.history.position() == self.buffer.position()
    }
}
