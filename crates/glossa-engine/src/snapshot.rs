//! Serialized engine state.

use std::collections::BTreeMap;

use glossa_chars::ContextTable;
use glossa_core::constants::SNAPSHOT_VERSION;
use glossa_core::errors::SnapshotError;
use glossa_core::{GlossaConfig, StreamId};
use glossa_prediction::TrackerState;
use glossa_segments::SegmentVocabulary;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::stream::StreamState;

/// Everything needed to resume predictions identically: the context table,
/// the vocabulary, source weights and metrics, the prediction id counter, and
/// every open stream's buffers. In-flight predictions are not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub config: GlossaConfig,
    pub chars: ContextTable,
    pub vocabulary: SegmentVocabulary,
    pub tracker: TrackerState,
    pub streams: BTreeMap<StreamId, StreamState>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

impl Snapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec(self).map_err(|e| SnapshotError::Serialize {
            message: e.to_string(),
        })
    }

    /// Decode from JSON, rejecting unknown format versions before the body
    /// is interpreted.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let header: VersionHeader =
            serde_json::from_slice(bytes).map_err(|e| SnapshotError::Deserialize {
                message: e.to_string(),
            })?;
        check_version(header.version)?;
        serde_json::from_slice(bytes).map_err(|e| SnapshotError::Deserialize {
            message: e.to_string(),
        })
    }

    /// Check that this snapshot can be loaded under `config`: the window
    /// sizes that shape the stored state must match.
    pub fn check_compatible(&self, config: &GlossaConfig) -> Result<(), SnapshotError> {
        check_version(self.version)?;
        let ours = &config.segments;
        let theirs = &self.config.segments;
        let mismatch = if self.config.chars.max_context_len != config.chars.max_context_len {
            Some(format!(
                "chars.max_context_len is {} in the snapshot, {} configured",
                self.config.chars.max_context_len, config.chars.max_context_len
            ))
        } else if theirs.buffer_len != ours.buffer_len {
            Some(format!(
                "segments.buffer_len is {} in the snapshot, {} configured",
                theirs.buffer_len, ours.buffer_len
            ))
        } else if theirs.min_segment_len != ours.min_segment_len
            || theirs.max_segment_len != ours.max_segment_len
        {
            Some(format!(
                "segment length range is {}..={} in the snapshot, {}..={} configured",
                theirs.min_segment_len,
                theirs.max_segment_len,
                ours.min_segment_len,
                ours.max_segment_len
            ))
        } else {
            self.streams
                .iter()
                .find(|(_, state)| !state.fits(config))
                .map(|(id, _)| format!("stream {id} has inconsistent buffers"))
        };
        match mismatch {
            Some(message) => Err(SnapshotError::IncompatibleConfig { message }),
            None => Ok(()),
        }
    }
}

fn check_version(found: u32) -> Result<(), SnapshotError> {
    if found != SNAPSHOT_VERSION {
        warn!(found, expected = SNAPSHOT_VERSION, "snapshot version rejected");
        return Err(SnapshotError::VersionMismatch {
            found,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(())
}
