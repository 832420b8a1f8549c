//! Parrot Core Library
//!
//! Hold-to-record voice clip engine over CPAL: capture into a bounded
//! clip store, play back with gain and decimation, drive it all from a
//! two-button control panel.
//!
//! # Example
//!
//! ```no_run
//! use parrot_core::{
//!     CaptureBuffer, CaptureEndpoint, CoreResult, RenderEndpoint, SessionConfig,
//!     SessionController,
//! };
//!
//! use std::time::Instant;
//!
//! fn main() -> CoreResult<()> {
//!     let cfg = SessionConfig::default();
//!     let store = CaptureBuffer::with_capacity(cfg.capacity_samples())?;
//!     let mut session = SessionController::new(store, cfg)?;
//!
//!     let mut mic = CaptureEndpoint::new(None)?;
//!     let mut speaker = RenderEndpoint::new(None)?;
//!
//!     let started = Instant::now();
//!     let report = session.record(&mut mic, || started.elapsed().as_secs() < 2)?;
//!     println!("Recorded {} samples", report.samples);
//!
//!     session.play(&mut speaker)?;
//!     Ok(())
//! }
//! ```

mod clip;
mod error;
mod panel;
mod session;
mod storage;
mod transform;
mod transport;

pub use {
    clip::CaptureBuffer,
    error::{ClipError, Result as CoreResult},
    panel::{
        ControlConfig, ControlPanel, DebounceScope, IndicatorPolicy, InputLine, SessionEvent,
        StatusLine,
    },
    session::{
        CaptureReport, PlaybackReport, SessionConfig, SessionController, SessionState, StopReason,
    },
    storage::{ClipFile, ClipStore},
    transform::PlaybackShaper,
    transport::{
        CaptureEndpoint, FrameSink, FrameSource, PortRole, RenderEndpoint, TransportConfig,
    },
};

#[cfg(test)]
mod tests;
