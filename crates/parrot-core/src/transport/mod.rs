pub(crate) mod device;

pub use device::{CaptureEndpoint, RenderEndpoint};

use crate::CoreResult;

/// Sample width of every frame moved through the transport. Not a knob.
pub const BIT_DEPTH: u16 = 16;

/// All clips are mono.
pub const MONO_CHANNELS: u16 = 1;

/// Direction a transport endpoint moves samples in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    /// Endpoint produces samples (microphone side).
    Capture,
    /// Endpoint consumes samples (speaker side).
    Render,
}

/// Per-session endpoint configuration.
///
/// The sample rate is requested verbatim; there is no negotiation. Bit
/// depth and channel count are fixed ([`BIT_DEPTH`], [`MONO_CHANNELS`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Samples per second moved through the endpoint.
    pub sample_rate: u32,
    /// Interleaved channel count, always [`MONO_CHANNELS`].
    pub channels: u16,
    /// Direction of the endpoint.
    pub role: PortRole,
}

impl TransportConfig {
    /// Configuration for a microphone-side endpoint.
    pub fn capture(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: MONO_CHANNELS,
            role: PortRole::Capture,
        }
    }

    /// Configuration for a speaker-side endpoint.
    pub fn render(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: MONO_CHANNELS,
            role: PortRole::Render,
        }
    }
}

/// Blocking producer of PCM frames.
///
/// `read` suspends the caller until it has moved the requested samples or
/// the underlying endpoint has gone away. A return of `Ok(0)` means the
/// endpoint is exhausted and the enclosing loop must terminate; there is
/// no timeout variant, callers bound transfers by sample count.
pub trait FrameSource {
    /// Open the endpoint for a session.
    fn configure(&mut self, config: &TransportConfig) -> CoreResult<()>;

    /// Block until `frame` is filled, returning the samples read.
    fn read(&mut self, frame: &mut [i16]) -> CoreResult<usize>;

    /// Tear the endpoint down after a session.
    fn shutdown(&mut self) -> CoreResult<()>;
}

/// Blocking consumer of PCM frames.
///
/// Same contract as [`FrameSource`] mirrored: `write` suspends until the
/// endpoint has accepted the frame, and `Ok(0)` signals exhaustion.
pub trait FrameSink {
    /// Open the endpoint for a session.
    fn configure(&mut self, config: &TransportConfig) -> CoreResult<()>;

    /// Block until `frame` is accepted, returning the samples written.
    fn write(&mut self, frame: &[i16]) -> CoreResult<usize>;

    /// Tear the endpoint down after a session, draining queued samples.
    fn shutdown(&mut self) -> CoreResult<()>;
}
