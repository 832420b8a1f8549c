use crate::config::{DEFAULT_SAMPLE_RATE, default_sample_rate};

use serde::{Deserialize, Serialize};

/// Audio endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Samples per second on both endpoints.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Capture device name (None = default device).
    #[serde(default)]
    pub input_device: Option<String>,
    /// Render device name (None = default device).
    #[serde(default)]
    pub output_device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            input_device: None,
            output_device: None,
        }
    }
}
