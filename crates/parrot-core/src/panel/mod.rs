use crate::{
    CoreResult,
    session::{CaptureReport, PlaybackReport, SessionController, SessionState},
    storage::ClipStore,
    transport::{FrameSink, FrameSource},
};

use std::time::{Duration, Instant};

use tracing::{debug, info};
use uuid::Uuid;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// A momentary control sampled by level. Pressed means active.
pub trait InputLine {
    /// Current level of the control.
    fn is_active(&self) -> bool;
}

/// A binary status output, lit during capture sessions.
pub trait StatusLine {
    /// Drive the output high or low.
    fn set_active(&mut self, active: bool);
}

/// Whether both controls share one debounce window or each has its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceScope {
    /// Each control debounces independently.
    #[default]
    PerButton,
    /// One accepted press suppresses both controls for the window.
    Shared,
}

/// Which sessions light the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorPolicy {
    /// Lit only while recording.
    #[default]
    RecordOnly,
    /// Lit while recording and while playing.
    RecordAndPlay,
}

/// Control panel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlConfig {
    /// Minimum spacing between accepted presses.
    pub debounce: Duration,
    /// How the debounce window is shared between controls.
    pub scope: DebounceScope,
    /// Which sessions light the indicator.
    pub indicator: IndicatorPolicy,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            scope: DebounceScope::default(),
            indicator: IndicatorPolicy::default(),
        }
    }
}

/// A session the panel ran to completion during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A capture session finished.
    Recorded(CaptureReport),
    /// A playback session finished.
    Played(PlaybackReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Button {
    Record,
    Play,
}

enum Stamps {
    Shared(Option<Instant>),
    PerButton {
        record: Option<Instant>,
        play: Option<Instant>,
    },
}

/// Press acceptance filter. Stamps advance only when a press is
/// accepted, so a rejected press never extends the window.
pub(crate) struct Debounce {
    window: Duration,
    stamps: Stamps,
}

impl Debounce {
    pub(crate) fn new(window: Duration, scope: DebounceScope) -> Self {
        let stamps = match scope {
            DebounceScope::Shared => Stamps::Shared(None),
            DebounceScope::PerButton => Stamps::PerButton {
                record: None,
                play: None,
            },
        };
        Self { window, stamps }
    }

    pub(crate) fn ready(&self, button: Button, now: Instant) -> bool {
        let stamp = match (&self.stamps, button) {
            (Stamps::Shared(stamp), _) => stamp,
            (Stamps::PerButton { record, .. }, Button::Record) => record,
            (Stamps::PerButton { play, .. }, Button::Play) => play,
        };
        match stamp {
            None => true,
            Some(last) => now.duration_since(*last) >= self.window,
        }
    }

    pub(crate) fn accept(&mut self, button: Button, now: Instant) {
        match (&mut self.stamps, button) {
            (Stamps::Shared(stamp), _) => *stamp = Some(now),
            (Stamps::PerButton { record, .. }, Button::Record) => *record = Some(now),
            (Stamps::PerButton { play, .. }, Button::Play) => *play = Some(now),
        }
    }
}

/// Two-control front end over a [`SessionController`].
///
/// The record control is level-triggered through an armed latch: the
/// latch starts armed, disarms when a capture session starts, and
/// re-arms only once the control is observed inactive outside a capture
/// session. Holding the control across a session boundary therefore
/// starts at most one session. The play control is edge-style: each
/// accepted press runs one full playback session.
pub struct ControlPanel<R, P, L>
where
    R: InputLine,
    P: InputLine,
    L: StatusLine,
{
    record_btn: R,
    play_btn: P,
    indicator: L,
    armed: bool,
    debounce: Debounce,
    indicator_policy: IndicatorPolicy,
}

impl<R, P, L> ControlPanel<R, P, L>
where
    R: InputLine,
    P: InputLine,
    L: StatusLine,
{
    /// Wire the panel to its controls and indicator.
    pub fn new(record_btn: R, play_btn: P, indicator: L, cfg: ControlConfig) -> Self {
        Self {
            record_btn,
            play_btn,
            indicator,
            armed: true,
            debounce: Debounce::new(cfg.debounce, cfg.scope),
            indicator_policy: cfg.indicator,
        }
    }

    #[cfg(test)]
    pub(crate) fn armed(&self) -> bool {
        self.armed
    }

    /// Sample both controls once and run at most one session.
    ///
    /// Record wins when both controls are active. Sessions block until
    /// complete, so a tick either returns immediately or carries a whole
    /// session. Errors from a session pass through after the indicator
    /// is restored; the panel stays usable afterwards.
    ///
    /// # Errors
    ///
    /// Propagates session errors from [`SessionController`].
    pub fn tick<S, M, K>(
        &mut self,
        now: Instant,
        session: &mut SessionController<S>,
        mic: &mut M,
        speaker: &mut K,
    ) -> CoreResult<Option<SessionEvent>>
    where
        S: ClipStore,
        M: FrameSource,
        K: FrameSink,
    {
        let record_active = self.record_btn.is_active();

        if !record_active && !self.armed && session.state() != SessionState::Recording {
            self.armed = true;
            debug!("Record control re-armed");
        }

        if record_active
            && self.armed
            && session.state() == SessionState::Idle
            && self.debounce.ready(Button::Record, now)
        {
            self.debounce.accept(Button::Record, now);
            self.armed = false;

            let session_id = Uuid::new_v4();
            info!(session_id = %session_id, "Record control accepted");

            self.indicator.set_active(true);
            let result = session.record(mic, || self.record_btn.is_active());
            self.indicator.set_active(false);

            return Ok(Some(SessionEvent::Recorded(result?)));
        }

        if self.play_btn.is_active()
            && session.state() == SessionState::Idle
            && self.debounce.ready(Button::Play, now)
        {
            self.debounce.accept(Button::Play, now);

            let session_id = Uuid::new_v4();
            info!(session_id = %session_id, "Play control accepted");

            let lit = self.indicator_policy == IndicatorPolicy::RecordAndPlay;
            if lit {
                self.indicator.set_active(true);
            }
            let result = session.play(speaker);
            if lit {
                self.indicator.set_active(false);
            }

            return Ok(Some(SessionEvent::Played(result?)));
        }

        Ok(None)
    }
}
