use crate::{
    AppError, AppResult,
    config::{
        DEFAULT_BOOT_BLINK_MS, DEFAULT_DEBOUNCE_MS, DEFAULT_DEBOUNCE_SCOPE,
        DEFAULT_INDICATOR_POLICY, DEFAULT_PLAY_HOTKEY, DEFAULT_RECORD_HOTKEY, DEFAULT_TICK_MS,
        default_boot_blink_ms, default_debounce_ms, default_debounce_scope,
        default_indicator_policy, default_play_hotkey, default_record_hotkey, default_tick_ms,
    },
};

use std::panic::Location;

use error_location::ErrorLocation;
use parrot_core::{DebounceScope, IndicatorPolicy};
use serde::{Deserialize, Serialize};

/// Control panel wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Hotkey binding for the record control.
    #[serde(default = "default_record_hotkey")]
    pub record_hotkey: String,
    /// Hotkey binding for the play control.
    #[serde(default = "default_play_hotkey")]
    pub play_hotkey: String,
    /// Minimum spacing between accepted presses, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Debounce sharing: "per-button" or "shared".
    #[serde(default = "default_debounce_scope")]
    pub debounce_scope: String,
    /// Indicator policy: "record-only" or "record-and-play".
    #[serde(default = "default_indicator_policy")]
    pub indicator: String,
    /// Control sampling period, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Boot indicator blink, in milliseconds.
    #[serde(default = "default_boot_blink_ms")]
    pub boot_blink_ms: u64,
}

impl ControlsConfig {
    /// Parse the configured debounce scope.
    #[track_caller]
    pub fn scope(&self) -> AppResult<DebounceScope> {
        match self.debounce_scope.as_str() {
            "per-button" => Ok(DebounceScope::PerButton),
            "shared" => Ok(DebounceScope::Shared),
            other => Err(AppError::ConfigError {
                reason: format!(
                    "Unknown debounce scope {:?}, expected \"per-button\" or \"shared\"",
                    other
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Parse the configured indicator policy.
    #[track_caller]
    pub fn indicator_policy(&self) -> AppResult<IndicatorPolicy> {
        match self.indicator.as_str() {
            "record-only" => Ok(IndicatorPolicy::RecordOnly),
            "record-and-play" => Ok(IndicatorPolicy::RecordAndPlay),
            other => Err(AppError::ConfigError {
                reason: format!(
                    "Unknown indicator policy {:?}, expected \"record-only\" or \"record-and-play\"",
                    other
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            record_hotkey: DEFAULT_RECORD_HOTKEY.to_string(),
            play_hotkey: DEFAULT_PLAY_HOTKEY.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            debounce_scope: DEFAULT_DEBOUNCE_SCOPE.to_string(),
            indicator: DEFAULT_INDICATOR_POLICY.to_string(),
            tick_ms: DEFAULT_TICK_MS,
            boot_blink_ms: DEFAULT_BOOT_BLINK_MS,
        }
    }
}
