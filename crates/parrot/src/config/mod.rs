mod audio_config;
mod clip_config;
#[allow(clippy::module_inception)]
mod config;
mod controls_config;
mod playback_config;
mod storage_config;

pub(crate) use {
    audio_config::AudioConfig,
    clip_config::ClipConfig,
    config::Config,
    controls_config::ControlsConfig,
    playback_config::PlaybackConfig,
    storage_config::{Backing, StorageConfig},
};

pub(crate) const DEFAULT_SAMPLE_RATE: u32 = 16_000;
pub(crate) const DEFAULT_MAX_RECORD_SECS: u64 = 20;
pub(crate) const DEFAULT_CHUNK_SAMPLES: usize = 1024;
pub(crate) const DEFAULT_GAIN: f32 = 5.0;
pub(crate) const DEFAULT_SPEED_FACTOR: usize = 3;
pub(crate) const DEFAULT_REPEATS: u32 = 2;
pub(crate) const DEFAULT_RECORD_HOTKEY: &str = "ctrl+shift+KeyR";
pub(crate) const DEFAULT_PLAY_HOTKEY: &str = "ctrl+shift+KeyP";
pub(crate) const DEFAULT_DEBOUNCE_MS: u64 = 100;
pub(crate) const DEFAULT_DEBOUNCE_SCOPE: &str = "per-button";
pub(crate) const DEFAULT_INDICATOR_POLICY: &str = "record-only";
pub(crate) const DEFAULT_TICK_MS: u64 = 10;
pub(crate) const DEFAULT_BOOT_BLINK_MS: u64 = 1000;
pub(crate) const DEFAULT_STORAGE_BACKING: &str = "memory";

pub(crate) fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

pub(crate) fn default_max_record_secs() -> u64 {
    DEFAULT_MAX_RECORD_SECS
}

pub(crate) fn default_chunk_samples() -> usize {
    DEFAULT_CHUNK_SAMPLES
}

pub(crate) fn default_gain() -> f32 {
    DEFAULT_GAIN
}

pub(crate) fn default_speed_factor() -> usize {
    DEFAULT_SPEED_FACTOR
}

pub(crate) fn default_repeats() -> u32 {
    DEFAULT_REPEATS
}

pub(crate) fn default_record_hotkey() -> String {
    DEFAULT_RECORD_HOTKEY.to_string()
}

pub(crate) fn default_play_hotkey() -> String {
    DEFAULT_PLAY_HOTKEY.to_string()
}

pub(crate) fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

pub(crate) fn default_debounce_scope() -> String {
    DEFAULT_DEBOUNCE_SCOPE.to_string()
}

pub(crate) fn default_indicator_policy() -> String {
    DEFAULT_INDICATOR_POLICY.to_string()
}

pub(crate) fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

pub(crate) fn default_boot_blink_ms() -> u64 {
    DEFAULT_BOOT_BLINK_MS
}

pub(crate) fn default_storage_backing() -> String {
    DEFAULT_STORAGE_BACKING.to_string()
}
