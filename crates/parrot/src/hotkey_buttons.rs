//! Global hotkeys as the two panel controls.
//!
//! Registers the record and play hotkeys and mirrors their pressed state
//! into atomics the control panel samples as input lines.

use crate::{AppError, AppResult};

use std::{
    panic::Location,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use parrot_core::InputLine;
use tracing::{debug, info, instrument};

/// Live pressed level of one registered hotkey.
#[derive(Clone)]
pub struct HotkeyLine {
    level: Arc<AtomicBool>,
}

impl InputLine for HotkeyLine {
    fn is_active(&self) -> bool {
        self.level.load(Ordering::Acquire)
    }
}

/// The two registered hotkeys and their live pressed levels.
///
/// Dropping this unregisters the hotkeys, so it must be kept alive for
/// the whole application lifetime. On Windows the registering thread
/// must dispatch messages for hotkey events to be delivered.
pub struct HotkeyButtons {
    _manager: GlobalHotKeyManager,
    record: Arc<AtomicBool>,
    play: Arc<AtomicBool>,
}

impl HotkeyButtons {
    /// Register both hotkeys and start the event forwarder thread.
    #[track_caller]
    #[instrument]
    pub fn register(record_binding: &str, play_binding: &str) -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let record_hotkey = parse_binding(record_binding)?;
        let play_hotkey = parse_binding(play_binding)?;

        manager
            .register(record_hotkey)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register {}: {}", record_binding, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        manager
            .register(play_hotkey)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register {}: {}", play_binding, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            record = record_binding,
            play = play_binding,
            "Global hotkeys registered"
        );

        let record = Arc::new(AtomicBool::new(false));
        let play = Arc::new(AtomicBool::new(false));

        let record_id = record_hotkey.id();
        let play_id = play_hotkey.id();
        let record_level = Arc::clone(&record);
        let play_level = Arc::clone(&play);

        // Single persistent forwarder thread. GlobalHotKeyEvent::receiver()
        // is a crossbeam channel with blocking recv() -- zero polling.
        thread::spawn(move || {
            let receiver = GlobalHotKeyEvent::receiver().clone();
            while let Ok(event) = receiver.recv() {
                apply_event(
                    event.id,
                    event.state,
                    record_id,
                    play_id,
                    &record_level,
                    &play_level,
                );
            }
        });

        Ok(Self {
            _manager: manager,
            record,
            play,
        })
    }

    /// Input line sampling the record hotkey.
    pub(crate) fn record_line(&self) -> HotkeyLine {
        HotkeyLine {
            level: Arc::clone(&self.record),
        }
    }

    /// Input line sampling the play hotkey.
    pub(crate) fn play_line(&self) -> HotkeyLine {
        HotkeyLine {
            level: Arc::clone(&self.play),
        }
    }
}

#[track_caller]
fn parse_binding(binding: &str) -> AppResult<HotKey> {
    HotKey::from_str(binding).map_err(|e| AppError::HotkeyRegistrationFailed {
        reason: format!("Invalid hotkey binding {:?}: {}", binding, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Fold one hotkey event into the pressed levels.
pub(crate) fn apply_event(
    id: u32,
    state: HotKeyState,
    record_id: u32,
    play_id: u32,
    record_level: &AtomicBool,
    play_level: &AtomicBool,
) {
    let pressed = state == HotKeyState::Pressed;
    if id == record_id {
        record_level.store(pressed, Ordering::Release);
        debug!(pressed, "Record control level changed");
    } else if id == play_id {
        play_level.store(pressed, Ordering::Release);
        debug!(pressed, "Play control level changed");
    }
}
