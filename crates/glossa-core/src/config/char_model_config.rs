use serde::{Deserialize, Serialize};

use super::defaults;

/// Character model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharModelConfig {
    /// Longest context (in characters) whose statistics are tracked.
    pub max_context_len: usize,
    /// Hard cap on distinct contexts; least-recently-used contexts are evicted above it.
    pub max_contexts: usize,
}

impl Default for CharModelConfig {
    fn default() -> Self {
        Self {
            max_context_len: defaults::DEFAULT_MAX_CONTEXT_LEN,
            max_contexts: defaults::DEFAULT_MAX_CONTEXTS,
        }
    }
}
