//! Parrot: hold-to-record voice clips, played back loud and fast.

mod app;
mod config;
mod error;
mod hotkey_buttons;
mod indicator;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    hotkey_buttons::{HotkeyButtons, HotkeyLine},
    indicator::LogIndicator,
};

use crate::config::{Backing, Config};

use std::{thread, time::Duration};

use parrot_core::{
    CaptureBuffer, CaptureEndpoint, ClipFile, ClipStore, ControlPanel, RenderEndpoint,
    SessionController, StatusLine,
};
use tracing::error;

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("parrot=debug")
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        error!("Startup failed: {:?}", e);
        std::process::exit(1);
    }
}

/// Build the clip store selected by the config and launch the app.
fn run(config: &Config) -> AppResult<()> {
    let capacity = config.session_config().capacity_samples();

    match config.storage.backing()? {
        Backing::Memory => {
            let store = CaptureBuffer::with_capacity(capacity)?;
            launch(config, store)
        }
        Backing::File => {
            let path = config.storage.resolved_clip_path()?;
            let store = ClipFile::new(&path, capacity)?;
            launch(config, store)
        }
    }
}

/// Wire endpoints, hotkeys, and the panel, then hand off to the run loop.
fn launch<S: ClipStore>(config: &Config, store: S) -> AppResult<()> {
    let session = SessionController::new(store, config.session_config())?;

    let mic = CaptureEndpoint::new(config.audio.input_device.as_deref())?;
    let speaker = RenderEndpoint::new(config.audio.output_device.as_deref())?;

    let buttons = HotkeyButtons::register(
        &config.controls.record_hotkey,
        &config.controls.play_hotkey,
    )?;

    // Boot blink before the panel takes over the indicator.
    let mut indicator = LogIndicator::new();
    indicator.set_active(true);
    thread::sleep(Duration::from_millis(config.controls.boot_blink_ms));
    indicator.set_active(false);

    let panel = ControlPanel::new(
        buttons.record_line(),
        buttons.play_line(),
        indicator,
        config.control_config()?,
    );

    let app = App {
        panel,
        session,
        mic,
        speaker,
        tick: Duration::from_millis(config.controls.tick_ms),
        _buttons: buttons,
    };

    app.run()
}
