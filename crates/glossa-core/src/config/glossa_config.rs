//! Top-level Glossa configuration.

use serde::{Deserialize, Serialize};

use super::{CharModelConfig, PredictorConfig, SegmentConfig, TrackerConfig};
use crate::constants;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Every section and field is optional in TOML; anything missing keeps its
/// compiled default from [`super::defaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlossaConfig {
    pub chars: CharModelConfig,
    pub segments: SegmentConfig,
    pub predictor: PredictorConfig,
    pub tracker: TrackerConfig,
}

impl GlossaConfig {
    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Parse and validate in one step.
    pub fn from_toml_validated(toml_str: &str) -> Result<Self, ConfigError> {
        let config = Self::from_toml(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate limits and rates.
    ///
    /// Limits below the minimum viable size are `CapacityExceeded`;
    /// out-of-range rates and probabilities are `ValidationFailed`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let seg = &self.segments;

        at_least("chars.max_context_len", self.chars.max_context_len, 1)?;
        at_least(
            "chars.max_contexts",
            self.chars.max_contexts,
            constants::MIN_CONTEXT_TABLE_SIZE,
        )?;
        at_least(
            "segments.min_segment_len",
            seg.min_segment_len,
            constants::MIN_SEGMENT_LEN,
        )?;
        at_least(
            "segments.max_segment_len",
            seg.max_segment_len,
            seg.min_segment_len,
        )?;
        at_least("segments.merge_threshold", seg.merge_threshold as usize, 1)?;
        at_least(
            "segments.vocabulary_cap",
            seg.vocabulary_cap,
            constants::MIN_VOCABULARY_CAP,
        )?;
        at_least("segments.pair_table_cap", seg.pair_table_cap, seg.vocabulary_cap)?;
        at_least("segments.buffer_len", seg.buffer_len, seg.max_segment_len)?;
        at_least("segments.sweep_interval", seg.sweep_interval as usize, 1)?;
        at_least("predictor.top_k", self.predictor.top_k, 1)?;
        at_least("tracker.max_pending", self.tracker.max_pending, 1)?;
        at_least(
            "tracker.pending_ttl_secs",
            self.tracker.pending_ttl_secs.min(usize::MAX as u64) as usize,
            1,
        )?;
        at_least("tracker.segment_metrics_cap", self.tracker.segment_metrics_cap, 1)?;

        unit_interval("segments.initial_confidence", seg.initial_confidence)?;
        unit_interval("segments.confidence_floor", seg.confidence_floor)?;
        unit_interval("predictor.adaptive_dominance", self.predictor.adaptive_dominance)?;
        unit_interval(
            "tracker.segment_accuracy_threshold",
            self.tracker.segment_accuracy_threshold,
        )?;
        open_rate("segments.confidence_decay", seg.confidence_decay)?;
        open_rate("tracker.learning_rate", self.tracker.learning_rate)?;

        let floor = self.tracker.weight_floor;
        if !(floor > 0.0 && floor < 0.5) {
            return Err(ConfigError::ValidationFailed {
                field: "tracker.weight_floor".to_string(),
                message: format!("must be in (0.0, 0.5), got {floor}"),
            });
        }

        Ok(())
    }
}

fn at_least(field: &str, value: usize, minimum: usize) -> Result<(), ConfigError> {
    if value < minimum {
        return Err(ConfigError::CapacityExceeded {
            field: field.to_string(),
            value,
            minimum,
        });
    }
    Ok(())
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: format!("must be between 0.0 and 1.0, got {value}"),
        });
    }
    Ok(())
}

fn open_rate(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: format!("must be in (0.0, 1.0], got {value}"),
        });
    }
    Ok(())
}
