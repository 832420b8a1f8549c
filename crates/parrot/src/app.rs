use crate::{AppResult, HotkeyButtons, LogIndicator, hotkey_buttons::HotkeyLine};

use std::{
    thread,
    time::{Duration, Instant},
};

use parrot_core::{CaptureEndpoint, ClipStore, ControlPanel, RenderEndpoint, SessionController};
use tracing::{error, info, instrument};

/// Main application state.
///
/// Owns the control panel, the session controller, and both audio
/// endpoints. The hotkey buttons ride along so their registration
/// outlives the loop.
pub struct App<S: ClipStore> {
    pub(crate) panel: ControlPanel<HotkeyLine, HotkeyLine, LogIndicator>,
    pub(crate) session: SessionController<S>,
    pub(crate) mic: CaptureEndpoint,
    pub(crate) speaker: RenderEndpoint,
    pub(crate) tick: Duration,
    pub(crate) _buttons: HotkeyButtons,
}

impl<S: ClipStore> App<S> {
    /// Run the control loop.
    ///
    /// Samples the panel once per tick. A session error is logged and
    /// the loop keeps running; fatal conditions are caught at startup,
    /// before this point.
    #[instrument(skip(self))]
    pub(crate) fn run(mut self) -> AppResult<()> {
        info!("Parrot ready");

        loop {
            match self.panel.tick(
                Instant::now(),
                &mut self.session,
                &mut self.mic,
                &mut self.speaker,
            ) {
                Ok(Some(event)) => info!(event = ?event, "Session finished"),
                Ok(None) => {}
                Err(e) => error!(error = %e, "Session failed"),
            }

            thread::sleep(self.tick);
        }
    }
}
