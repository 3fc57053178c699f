// Single source of truth for all default values.

// --- Character model ---
pub const DEFAULT_MAX_CONTEXT_LEN: usize = 4;
pub const DEFAULT_MAX_CONTEXTS: usize = 65_536;

// --- Segment discovery ---
pub const DEFAULT_MIN_SEGMENT_LEN: usize = 2;
pub const DEFAULT_MAX_SEGMENT_LEN: usize = 12;
pub const DEFAULT_MERGE_THRESHOLD: u32 = 3;
pub const DEFAULT_VOCABULARY_CAP: usize = 4_096;
pub const DEFAULT_PAIR_TABLE_CAP: usize = 16_384;
pub const DEFAULT_INITIAL_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_CONFIDENCE_DECAY: f64 = 0.1;
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.1;
pub const DEFAULT_GRACE_PERIOD: u64 = 2_048; // observations
pub const DEFAULT_SWEEP_INTERVAL: u64 = 256; // observations
pub const DEFAULT_BUFFER_LEN: usize = 64;
pub const DEFAULT_ARCHIVE_CAP: usize = 256;

// --- Hybrid predictor ---
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_ADAPTIVE_DOMINANCE: f64 = 0.8;

// --- Performance tracker ---
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub const DEFAULT_WEIGHT_FLOOR: f64 = 0.01;
pub const DEFAULT_MAX_PENDING: usize = 1_024;
pub const DEFAULT_PENDING_TTL_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_MIN_SAMPLES: u64 = 20;
pub const DEFAULT_SEGMENT_METRICS_CAP: usize = 4_096;
pub const DEFAULT_SEGMENT_MIN_SAMPLES: u64 = 5;
pub const DEFAULT_SEGMENT_ACCURACY_THRESHOLD: f64 = 0.6;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "glossa=info";
pub const LOG_ENV_VAR: &str = "GLOSSA_LOG";
