use crate::{
    ClipError, CoreResult,
    clip::alloc_samples,
    storage::ClipStore,
    transform::PlaybackShaper,
    transport::{FrameSink, FrameSource, TransportConfig},
};

use std::{
    panic::Location,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

const DEFAULT_SAMPLE_RATE: u32 = 16_000;
const DEFAULT_CHUNK_SAMPLES: usize = 1024;
const DEFAULT_MAX_RECORD: Duration = Duration::from_secs(20);
const DEFAULT_REPEATS: u32 = 2;
const DEFAULT_GAIN: f32 = 5.0;
const DEFAULT_SPEED_FACTOR: usize = 3;

/// What the controller is currently doing. Capture and playback are
/// mutually exclusive; transitions happen only inside [`SessionController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session active.
    Idle,
    /// A capture session is filling the clip store.
    Recording,
    /// A playback session is draining the clip store.
    Playing,
}

/// Why a capture session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The clip store ran out of capacity.
    Full,
    /// The hold signal went inactive.
    Released,
    /// The wall-clock safety bound elapsed.
    TimeLimit,
}

/// Outcome of a completed capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureReport {
    /// Samples committed to the clip store.
    pub samples: usize,
    /// Wall-clock duration of the session.
    pub elapsed: Duration,
    /// Which bound terminated the session.
    pub stop: StopReason,
}

/// Outcome of a completed playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Samples the render endpoint accepted across all repeats.
    pub samples_written: usize,
    /// Repeat passes performed.
    pub repeats: u32,
}

/// Session parameters. Defaults match the reference deployment: 16kHz
/// mono, 1024-sample chunks, 20s clip, two playback repeats at gain 5
/// and triple speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Samples per second on both endpoints.
    pub sample_rate: u32,
    /// Upper bound on samples moved per transfer.
    pub chunk_samples: usize,
    /// Wall-clock safety bound on one capture session.
    pub max_record: Duration,
    /// Playback passes per accepted play request.
    pub repeats: u32,
    /// Scalar gain applied to every played sample.
    pub gain: f32,
    /// Keep every Nth sample during playback.
    pub speed_factor: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            chunk_samples: DEFAULT_CHUNK_SAMPLES,
            max_record: DEFAULT_MAX_RECORD,
            repeats: DEFAULT_REPEATS,
            gain: DEFAULT_GAIN,
            speed_factor: DEFAULT_SPEED_FACTOR,
        }
    }
}

impl SessionConfig {
    /// Clip capacity implied by the sample rate and maximum duration.
    pub fn capacity_samples(&self) -> usize {
        ((self.sample_rate as u128 * self.max_record.as_millis()) / 1000) as usize
    }

    /// Reject parameter combinations the pipeline cannot run with.
    ///
    /// Gain and speed factor are validated by [`PlaybackShaper`].
    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        if self.sample_rate == 0 {
            return Err(ClipError::InvalidConfig {
                reason: "sample rate must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.chunk_samples == 0 {
            return Err(ClipError::InvalidConfig {
                reason: "chunk size must be at least 1 sample".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.max_record.is_zero() {
            return Err(ClipError::InvalidConfig {
                reason: "maximum record duration must be non-zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.repeats == 0 {
            return Err(ClipError::InvalidConfig {
                reason: "repeat count must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

/// Orchestrates capture and playback sessions over one clip store.
///
/// Owns the store exclusively: the mutual-exclusion invariant (never
/// reading while writing) is enforced by the state machine rather than
/// a lock. Both session kinds are blocking; the controller returns to
/// [`SessionState::Idle`] unconditionally, success or failure.
pub struct SessionController<S: ClipStore> {
    store: S,
    shaper: PlaybackShaper,
    cfg: SessionConfig,
    state: SessionState,
    read_scratch: Vec<i16>,
    shaped_scratch: Vec<i16>,
}

impl<S: ClipStore> SessionController<S> {
    /// Build a controller, allocating its transfer scratch up front.
    ///
    /// # Errors
    ///
    /// Returns [`ClipError::InvalidConfig`] for rejected parameters and
    /// [`ClipError::AllocationFailure`] when scratch memory cannot be
    /// reserved.
    #[track_caller]
    #[instrument(skip(store))]
    pub fn new(store: S, cfg: SessionConfig) -> CoreResult<Self> {
        cfg.validate()?;
        let shaper = PlaybackShaper::new(cfg.gain, cfg.speed_factor)?;

        let read_scratch = alloc_samples(cfg.chunk_samples)?;
        let shaped_scratch = alloc_samples(shaper.output_len(cfg.chunk_samples))?;

        info!(
            sample_rate = cfg.sample_rate,
            chunk_samples = cfg.chunk_samples,
            capacity_samples = cfg.capacity_samples(),
            "Session controller initialized"
        );

        Ok(Self {
            store,
            shaper,
            cfg,
            state: SessionState::Idle,
            read_scratch,
            shaped_scratch,
        })
    }

    /// Current state of the controller.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The clip store the controller owns.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Session parameters in effect.
    pub fn config(&self) -> &SessionConfig {
        &self.cfg
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Run one capture session: pull chunks from `source` into the clip
    /// store while `hold` stays true.
    ///
    /// The previous clip is discarded. The session ends when the store
    /// fills, `hold` goes inactive, the wall-clock bound elapses, or the
    /// source is exhausted. Samples committed before an abort stay
    /// committed.
    ///
    /// # Errors
    ///
    /// [`ClipError::SessionBusy`] when the controller is not idle;
    /// [`ClipError::TransferExhausted`] when the source returns zero
    /// progress; store and endpoint errors pass through.
    #[track_caller]
    #[instrument(skip(self, source, hold))]
    pub fn record<F, H>(&mut self, source: &mut F, hold: H) -> CoreResult<CaptureReport>
    where
        F: FrameSource,
        H: FnMut() -> bool,
    {
        if self.state != SessionState::Idle {
            return Err(ClipError::SessionBusy {
                state: self.state,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.state = SessionState::Recording;
        let result = self.capture_session(source, hold);
        self.state = SessionState::Idle;

        if let Ok(report) = &result {
            info!(
                samples = report.samples,
                elapsed_ms = report.elapsed.as_millis() as u64,
                stop = ?report.stop,
                "Capture session complete"
            );
        }
        result
    }

    fn capture_session<F, H>(&mut self, source: &mut F, hold: H) -> CoreResult<CaptureReport>
    where
        F: FrameSource,
        H: FnMut() -> bool,
    {
        let started = Instant::now();

        self.store.open_for_write()?;

        if let Err(e) = source.configure(&TransportConfig::capture(self.cfg.sample_rate)) {
            if let Err(close_err) = self.store.close() {
                warn!(error = %close_err, "Clip store close failed after configure error");
            }
            return Err(e);
        }

        let outcome = self.capture_loop(source, hold, started);

        if let Err(e) = source.shutdown() {
            warn!(error = %e, "Capture endpoint shutdown failed");
        }
        if let Err(e) = self.store.close() {
            warn!(error = %e, "Clip store close failed");
        }

        let (samples, stop) = outcome?;
        Ok(CaptureReport {
            samples,
            elapsed: started.elapsed(),
            stop,
        })
    }

    fn capture_loop<F, H>(
        &mut self,
        source: &mut F,
        mut hold: H,
        started: Instant,
    ) -> CoreResult<(usize, StopReason)>
    where
        F: FrameSource,
        H: FnMut() -> bool,
    {
        let mut total = 0usize;

        loop {
            // Chunk requests are clamped to what the store can still take.
            let chunk = match self.store.remaining_capacity() {
                Some(0) => return Ok((total, StopReason::Full)),
                Some(remaining) => remaining.min(self.cfg.chunk_samples),
                None => self.cfg.chunk_samples,
            };
            if !hold() {
                return Ok((total, StopReason::Released));
            }
            if started.elapsed() >= self.cfg.max_record {
                return Ok((total, StopReason::TimeLimit));
            }

            let frame = &mut self.read_scratch[..chunk];
            let read = source.read(frame)?;
            if read == 0 {
                return Err(ClipError::TransferExhausted {
                    transferred: total,
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            self.store.write(&frame[..read])?;
            total += read;

            debug!(chunk_samples = read, total_samples = total, "Capture chunk committed");
        }
    }

    /// Run one playback session: repeat the committed clip through the
    /// shaper into `sink`.
    ///
    /// A controller with no committed clip performs nothing: the
    /// endpoint is never opened and no transform runs. The source cursor
    /// advances by the raw chunk length; decimation only reduces what is
    /// written. A short but non-zero write is logged and not retried.
    ///
    /// # Errors
    ///
    /// [`ClipError::SessionBusy`] when the controller is not idle;
    /// [`ClipError::TransferExhausted`] when the sink accepts nothing;
    /// store and endpoint errors pass through.
    #[track_caller]
    #[instrument(skip(self, sink))]
    pub fn play<K>(&mut self, sink: &mut K) -> CoreResult<PlaybackReport>
    where
        K: FrameSink,
    {
        if self.state != SessionState::Idle {
            return Err(ClipError::SessionBusy {
                state: self.state,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !self.store.exists() {
            info!("No clip recorded, playback skipped");
            return Ok(PlaybackReport {
                samples_written: 0,
                repeats: 0,
            });
        }

        self.state = SessionState::Playing;
        let result = self.play_session(sink);
        self.state = SessionState::Idle;

        if let Ok(report) = &result {
            info!(
                samples_written = report.samples_written,
                repeats = report.repeats,
                "Playback session complete"
            );
        }
        result
    }

    fn play_session<K>(&mut self, sink: &mut K) -> CoreResult<PlaybackReport>
    where
        K: FrameSink,
    {
        sink.configure(&TransportConfig::render(self.cfg.sample_rate))?;

        let outcome = self.render_passes(sink);

        if let Err(e) = sink.shutdown() {
            warn!(error = %e, "Render endpoint shutdown failed");
        }
        if let Err(e) = self.store.close() {
            warn!(error = %e, "Clip store close failed");
        }

        outcome
    }

    fn render_passes<K>(&mut self, sink: &mut K) -> CoreResult<PlaybackReport>
    where
        K: FrameSink,
    {
        self.store.open_for_read()?;

        let mut written_total = 0usize;
        for pass in 1..=self.cfg.repeats {
            info!(repeat = pass, of = self.cfg.repeats, "Playback repeat");
            self.store.rewind()?;

            loop {
                let read = self.store.read(&mut self.read_scratch)?;
                if read == 0 {
                    break;
                }

                let shaped = self
                    .shaper
                    .shape_chunk(&self.read_scratch[..read], &mut self.shaped_scratch)?;
                let written = sink.write(shaped)?;
                if written == 0 {
                    return Err(ClipError::TransferExhausted {
                        transferred: written_total,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                if written < shaped.len() {
                    warn!(
                        requested = shaped.len(),
                        written = written,
                        "Short render write, not retried"
                    );
                }
                written_total += written;

                debug!(
                    chunk_samples = read,
                    shaped_samples = shaped.len(),
                    "Playback chunk rendered"
                );
            }
        }

        Ok(PlaybackReport {
            samples_written: written_total,
            repeats: self.cfg.repeats,
        })
    }
}
