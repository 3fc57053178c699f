use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::PredictionMode;

/// Hybrid predictor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Number of ranked candidates returned per query.
    pub top_k: usize,
    /// How sources are combined.
    pub mode: PredictionMode,
    /// In `Adaptive` mode, a source whose weight reaches this share is used alone.
    pub adaptive_dominance: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_TOP_K,
            mode: PredictionMode::default(),
            adaptive_dominance: defaults::DEFAULT_ADAPTIVE_DOMINANCE,
        }
    }
}
