use crate::{ClipError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Per-chunk gain and speed-up transform.
///
/// Each chunk is decimated by keeping every Nth sample (N = speed
/// factor) and boosted by a scalar gain, saturating to the signed
/// 16-bit range instead of wrapping. The decimation phase resets at the
/// start of every chunk; the shaper never looks across a chunk
/// boundary.
pub struct PlaybackShaper {
    gain: f32,
    stride: usize,
}

impl PlaybackShaper {
    /// Build a shaper from a gain and a speed factor.
    ///
    /// # Errors
    ///
    /// Returns [`ClipError::InvalidConfig`] unless the gain is finite
    /// and positive and the speed factor is at least 1.
    #[track_caller]
    #[instrument]
    pub fn new(gain: f32, speed_factor: usize) -> CoreResult<Self> {
        if !gain.is_finite() || gain <= 0.0 {
            return Err(ClipError::InvalidConfig {
                reason: format!("gain must be finite and positive, got {}", gain),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if speed_factor == 0 {
            return Err(ClipError::InvalidConfig {
                reason: "speed factor must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(gain = gain, speed_factor = speed_factor, "Playback shaper initialized");

        Ok(Self {
            gain,
            stride: speed_factor,
        })
    }

    /// Samples a shaped chunk of `input_len` raw samples occupies.
    pub fn output_len(&self, input_len: usize) -> usize {
        input_len.div_ceil(self.stride)
    }

    /// Shape one chunk into the caller-provided scratch, returning the
    /// shaped prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ClipError::ScratchTooSmall`] when `scratch` cannot hold
    /// [`output_len`](Self::output_len) samples.
    #[track_caller]
    pub fn shape_chunk<'a>(&self, input: &[i16], scratch: &'a mut [i16]) -> CoreResult<&'a [i16]> {
        let required = self.output_len(input.len());
        if scratch.len() < required {
            return Err(ClipError::ScratchTooSmall {
                required,
                provided: scratch.len(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut written = 0;
        for index in (0..input.len()).step_by(self.stride) {
            scratch[written] = self.shape_sample(input[index]);
            written += 1;
        }

        // A non-empty chunk never shapes to silence: fall back to the
        // last valid sample if the stride selected nothing.
        if written == 0 && !input.is_empty() {
            scratch[written] = self.shape_sample(input[input.len() - 1]);
            written += 1;
        }

        Ok(&scratch[..written])
    }

    fn shape_sample(&self, sample: i16) -> i16 {
        let boosted = (f32::from(sample) * self.gain) as i32;
        boosted.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
    }
}
