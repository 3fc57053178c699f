//! Configuration system for Glossa.
//! TOML-based, every field optional; missing values fall back to `defaults`.

pub mod char_model_config;
pub mod defaults;
pub mod glossa_config;
pub mod predictor_config;
pub mod segment_config;
pub mod tracker_config;

pub use char_model_config::CharModelConfig;
pub use glossa_config::GlossaConfig;
pub use predictor_config::PredictorConfig;
pub use segment_config::SegmentConfig;
pub use tracker_config::TrackerConfig;
