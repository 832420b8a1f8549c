use crate::{
    ClipError, CoreResult,
    transport::{FrameSink, FrameSource, PortRole, TransportConfig},
};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use cpal::{
    BufferSize, Device, SampleFormat, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Maximum samples the capture queue may hold (1 minute at 16kHz mono).
/// Bounds memory if a caller configures the endpoint but stops reading;
/// oldest samples are dropped first.
pub(crate) const CAPTURE_QUEUE_SAMPLES: usize = 16_000 * 60;

/// Samples the render queue may hold before `write` applies backpressure.
/// Matches the depth of an 8 x 1024-frame hardware DMA ring.
const RENDER_QUEUE_SAMPLES: usize = 8 * 1024;

/// Poll interval while a blocking transfer waits on the callback thread.
const TRANSFER_POLL: Duration = Duration::from_millis(1);

/// Bound on draining queued render samples at shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn lock_queue(queue: &Mutex<VecDeque<i16>>) -> MutexGuard<'_, VecDeque<i16>> {
    // Recover from lock poison rather than dropping audio. A poisoned
    // mutex means a previous holder panicked, but the VecDeque data is
    // still valid and usable.
    queue.lock().unwrap_or_else(|e| {
        error!("Sample queue lock poisoned, recovering: {}", e);
        e.into_inner()
    })
}

pub(crate) fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

pub(crate) fn sample_from_i16(sample: i16) -> f32 {
    f32::from(sample) / 32768.0
}

#[track_caller]
fn resolve_input_device(host: &cpal::Host, preferred: Option<&str>) -> CoreResult<Device> {
    match preferred {
        Some(wanted) => {
            let mut devices = host.input_devices().map_err(|e| ClipError::DeviceError {
                reason: format!("Failed to enumerate input devices: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            devices
                .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
                .ok_or_else(|| ClipError::DeviceError {
                    reason: format!("Input device {:?} not found", wanted),
                    location: ErrorLocation::from(Location::caller()),
                })
        }
        None => host.default_input_device().ok_or(ClipError::NoInputDevice {
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[track_caller]
fn resolve_output_device(host: &cpal::Host, preferred: Option<&str>) -> CoreResult<Device> {
    match preferred {
        Some(wanted) => {
            let mut devices = host.output_devices().map_err(|e| ClipError::DeviceError {
                reason: format!("Failed to enumerate output devices: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            devices
                .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
                .ok_or_else(|| ClipError::DeviceError {
                    reason: format!("Output device {:?} not found", wanted),
                    location: ErrorLocation::from(Location::caller()),
                })
        }
        None => host
            .default_output_device()
            .ok_or(ClipError::NoOutputDevice {
                location: ErrorLocation::from(Location::caller()),
            }),
    }
}

/// Microphone-side [`FrameSource`] over a cpal input stream.
///
/// The callback thread feeds a shared queue; `read` blocks the caller
/// until the requested frame can be handed back in full. Once the stream
/// dies, `read` drains what remains and then reports zero progress.
pub struct CaptureEndpoint {
    device: Device,
    sample_format: SampleFormat,
    stream: Option<Stream>,
    queue: Arc<Mutex<VecDeque<i16>>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes after teardown.
    shutdown: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
}

impl CaptureEndpoint {
    /// Resolve the input device (named, or the host default).
    #[track_caller]
    #[instrument]
    pub fn new(preferred: Option<&str>) -> CoreResult<Self> {
        let host = cpal::default_host();
        let device = resolve_input_device(&host, preferred)?;

        let default_config =
            device
                .default_input_config()
                .map_err(|e| ClipError::DeviceError {
                    reason: format!("Failed to get input config: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        let sample_format = default_config.sample_format();

        info!(
            device_id = ?device.id(),
            sample_format = ?sample_format,
            "Capture endpoint initialized"
        );

        Ok(Self {
            device,
            sample_format,
            stream: None,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
            failed: Arc::new(AtomicBool::new(false)),
        })
    }

    fn build_stream(&self, config: &StreamConfig) -> CoreResult<Stream> {
        let queue = Arc::clone(&self.queue);
        let shutdown = Arc::clone(&self.shutdown);
        let failed = Arc::clone(&self.failed);
        let err_fn = move |err| {
            error!("Capture stream error: {}", err);
            failed.store(true, Ordering::Release);
        };

        let built = match self.sample_format {
            SampleFormat::I16 => self.device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    let mut buf = lock_queue(&queue);
                    buf.extend(data.iter().copied());
                    while buf.len() > CAPTURE_QUEUE_SAMPLES {
                        buf.pop_front();
                    }
                },
                err_fn,
                None,
            ),
            SampleFormat::F32 => self.device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    let mut buf = lock_queue(&queue);
                    buf.extend(data.iter().copied().map(sample_to_i16));
                    while buf.len() > CAPTURE_QUEUE_SAMPLES {
                        buf.pop_front();
                    }
                },
                err_fn,
                None,
            ),
            other => {
                return Err(ClipError::DeviceError {
                    reason: format!("Unsupported input sample format: {:?}", other),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        built.map_err(|e| ClipError::DeviceError {
            reason: format!("Failed to build input stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl FrameSource for CaptureEndpoint {
    #[track_caller]
    fn configure(&mut self, config: &TransportConfig) -> CoreResult<()> {
        if config.role != PortRole::Capture {
            return Err(ClipError::DeviceError {
                reason: format!("Capture endpoint configured with role {:?}", config.role),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.shutdown.store(false, Ordering::Release);
        self.failed.store(false, Ordering::Release);
        lock_queue(&self.queue).clear();

        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: BufferSize::Default,
        };
        let stream = self.build_stream(&stream_config)?;

        stream.play().map_err(|e| ClipError::DeviceError {
            reason: format!("Failed to start input stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!(sample_rate = config.sample_rate, "Capture stream started");

        Ok(())
    }

    fn read(&mut self, frame: &mut [i16]) -> CoreResult<usize> {
        let wanted = frame.len();
        loop {
            {
                let mut buf = lock_queue(&self.queue);
                if buf.len() >= wanted {
                    for (slot, sample) in frame.iter_mut().zip(buf.drain(..wanted)) {
                        *slot = sample;
                    }
                    return Ok(wanted);
                }
                if self.failed.load(Ordering::Acquire) || self.stream.is_none() {
                    // Stream is gone: hand back what remains, then zero.
                    let available = buf.len().min(wanted);
                    for (slot, sample) in frame.iter_mut().zip(buf.drain(..available)) {
                        *slot = sample;
                    }
                    return Ok(available);
                }
            }
            thread::sleep(TRANSFER_POLL);
        }
    }

    #[instrument(skip(self))]
    fn shutdown(&mut self) -> CoreResult<()> {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield so an in-flight callback observes the shutdown
            // flag before the queue is cleared.
            thread::sleep(Duration::from_millis(5));
            info!("Capture stream stopped");
        }

        let mut buf = lock_queue(&self.queue);
        let discarded = buf.len();
        buf.clear();
        if discarded > 0 {
            debug!(discarded_samples = discarded, "Capture queue discarded");
        }

        Ok(())
    }
}

/// Speaker-side [`FrameSink`] over a cpal output stream.
///
/// `write` queues samples for the callback thread, blocking while the
/// backlog exceeds [`RENDER_QUEUE_SAMPLES`]. The callback emits silence
/// on underrun. `shutdown` drains the queue before dropping the stream
/// so the clip tail is not cut off.
pub struct RenderEndpoint {
    device: Device,
    sample_format: SampleFormat,
    stream: Option<Stream>,
    queue: Arc<Mutex<VecDeque<i16>>>,
    shutdown: Arc<AtomicBool>,
    failed: Arc<AtomicBool>,
}

impl RenderEndpoint {
    /// Resolve the output device (named, or the host default).
    #[track_caller]
    #[instrument]
    pub fn new(preferred: Option<&str>) -> CoreResult<Self> {
        let host = cpal::default_host();
        let device = resolve_output_device(&host, preferred)?;

        let default_config =
            device
                .default_output_config()
                .map_err(|e| ClipError::DeviceError {
                    reason: format!("Failed to get output config: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        let sample_format = default_config.sample_format();

        info!(
            device_id = ?device.id(),
            sample_format = ?sample_format,
            "Render endpoint initialized"
        );

        Ok(Self {
            device,
            sample_format,
            stream: None,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
            failed: Arc::new(AtomicBool::new(false)),
        })
    }

    fn build_stream(&self, config: &StreamConfig) -> CoreResult<Stream> {
        let queue = Arc::clone(&self.queue);
        let shutdown = Arc::clone(&self.shutdown);
        let failed = Arc::clone(&self.failed);
        let err_fn = move |err| {
            error!("Render stream error: {}", err);
            failed.store(true, Ordering::Release);
        };

        let built = match self.sample_format {
            SampleFormat::I16 => self.device.build_output_stream(
                config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    let mut buf = lock_queue(&queue);
                    for slot in data.iter_mut() {
                        *slot = if shutdown.load(Ordering::Acquire) {
                            0
                        } else {
                            buf.pop_front().unwrap_or(0)
                        };
                    }
                },
                err_fn,
                None,
            ),
            SampleFormat::F32 => self.device.build_output_stream(
                config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut buf = lock_queue(&queue);
                    for slot in data.iter_mut() {
                        *slot = if shutdown.load(Ordering::Acquire) {
                            0.0
                        } else {
                            buf.pop_front().map(sample_from_i16).unwrap_or(0.0)
                        };
                    }
                },
                err_fn,
                None,
            ),
            other => {
                return Err(ClipError::DeviceError {
                    reason: format!("Unsupported output sample format: {:?}", other),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        built.map_err(|e| ClipError::DeviceError {
            reason: format!("Failed to build output stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl FrameSink for RenderEndpoint {
    #[track_caller]
    fn configure(&mut self, config: &TransportConfig) -> CoreResult<()> {
        if config.role != PortRole::Render {
            return Err(ClipError::DeviceError {
                reason: format!("Render endpoint configured with role {:?}", config.role),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.shutdown.store(false, Ordering::Release);
        self.failed.store(false, Ordering::Release);
        lock_queue(&self.queue).clear();

        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: BufferSize::Default,
        };
        let stream = self.build_stream(&stream_config)?;

        stream.play().map_err(|e| ClipError::DeviceError {
            reason: format!("Failed to start output stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!(sample_rate = config.sample_rate, "Render stream started");

        Ok(())
    }

    fn write(&mut self, frame: &[i16]) -> CoreResult<usize> {
        loop {
            if self.failed.load(Ordering::Acquire) || self.stream.is_none() {
                return Ok(0);
            }
            {
                let mut buf = lock_queue(&self.queue);
                // Frames larger than the high-water mark are accepted
                // whenever the queue is empty, otherwise write would
                // never make progress.
                if buf.len() + frame.len() <= RENDER_QUEUE_SAMPLES || buf.is_empty() {
                    buf.extend(frame.iter().copied());
                    return Ok(frame.len());
                }
            }
            thread::sleep(TRANSFER_POLL);
        }
    }

    #[instrument(skip(self))]
    fn shutdown(&mut self) -> CoreResult<()> {
        if self.stream.is_some() {
            // Let the callback play out queued samples before teardown.
            let drain_start = Instant::now();
            loop {
                let pending = lock_queue(&self.queue).len();
                if pending == 0 || self.failed.load(Ordering::Acquire) {
                    break;
                }
                if drain_start.elapsed() > DRAIN_TIMEOUT {
                    warn!(pending_samples = pending, "Render queue drain timed out");
                    break;
                }
                thread::sleep(TRANSFER_POLL);
            }
        }

        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            thread::sleep(Duration::from_millis(5));
            info!("Render stream stopped");
        }

        lock_queue(&self.queue).clear();

        Ok(())
    }
}
