use crate::config::{
    DEFAULT_CHUNK_SAMPLES, DEFAULT_MAX_RECORD_SECS, default_chunk_samples, default_max_record_secs,
};

use serde::{Deserialize, Serialize};

/// Clip capture bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipConfig {
    /// Longest recording the clip store will hold, in seconds.
    #[serde(default = "default_max_record_secs")]
    pub max_record_secs: u64,
    /// Samples moved per transfer.
    #[serde(default = "default_chunk_samples")]
    pub chunk_samples: usize,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            max_record_secs: DEFAULT_MAX_RECORD_SECS,
            chunk_samples: DEFAULT_CHUNK_SAMPLES,
        }
    }
}
