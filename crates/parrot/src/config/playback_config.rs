use crate::config::{
    DEFAULT_GAIN, DEFAULT_REPEATS, DEFAULT_SPEED_FACTOR, default_gain, default_repeats,
    default_speed_factor,
};

use serde::{Deserialize, Serialize};

/// Playback shaping parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Scalar gain applied to every played sample.
    #[serde(default = "default_gain")]
    pub gain: f32,
    /// Keep every Nth sample during playback.
    #[serde(default = "default_speed_factor")]
    pub speed_factor: usize,
    /// Playback passes per accepted play press.
    #[serde(default = "default_repeats")]
    pub repeats: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            speed_factor: DEFAULT_SPEED_FACTOR,
            repeats: DEFAULT_REPEATS,
        }
    }
}
