use crate::{ClipError, CoreResult, storage::ClipStore};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Allocate a zeroed sample region, surfacing allocation failure instead
/// of aborting.
pub(crate) fn alloc_samples(len: usize) -> CoreResult<Vec<i16>> {
    let mut samples = Vec::new();
    samples.try_reserve_exact(len)?;
    samples.resize(len, 0);
    Ok(samples)
}

/// Bounded in-memory sample store for one captured clip.
///
/// Holds up to `capacity` samples. The recorded count, not the storage,
/// determines what is valid audio: anything at or beyond `recorded()` is
/// undefined. Clearing is a no-op at the data level, new sessions simply
/// overwrite from offset zero.
pub struct CaptureBuffer {
    samples: Vec<i16>,
    recorded: usize,
    cursor: usize,
}

impl CaptureBuffer {
    /// Allocate a buffer for `capacity` samples.
    ///
    /// # Errors
    ///
    /// Returns [`ClipError::AllocationFailure`] when the backing memory
    /// cannot be reserved.
    #[track_caller]
    #[instrument]
    pub fn with_capacity(capacity: usize) -> CoreResult<Self> {
        let samples = alloc_samples(capacity)?;

        debug!(capacity_samples = capacity, "Capture buffer allocated");

        Ok(Self {
            samples,
            recorded: 0,
            cursor: 0,
        })
    }

    /// Append one chunk at the current fill offset.
    ///
    /// Callers clamp the chunk to `remaining()` first; there is no
    /// implicit truncation here.
    ///
    /// # Errors
    ///
    /// Returns [`ClipError::CapacityExceeded`] when the chunk does not fit.
    #[track_caller]
    pub fn append_chunk(&mut self, frame: &[i16]) -> CoreResult<()> {
        let remaining = self.remaining();
        if frame.len() > remaining {
            return Err(ClipError::CapacityExceeded {
                requested: frame.len(),
                remaining,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.samples[self.recorded..self.recorded + frame.len()].copy_from_slice(frame);
        self.recorded += frame.len();

        Ok(())
    }

    /// Invalidate the clip. The storage is untouched.
    pub fn reset(&mut self) {
        self.recorded = 0;
        self.cursor = 0;
    }

    /// Samples committed by the last capture session.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Total sample capacity.
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Capacity left before the buffer is full.
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.recorded
    }

    /// The valid prefix of the clip.
    pub fn samples(&self) -> &[i16] {
        &self.samples[..self.recorded]
    }
}

impl ClipStore for CaptureBuffer {
    fn open_for_write(&mut self) -> CoreResult<()> {
        self.reset();
        Ok(())
    }

    fn open_for_read(&mut self) -> CoreResult<()> {
        self.cursor = 0;
        Ok(())
    }

    fn rewind(&mut self) -> CoreResult<()> {
        self.cursor = 0;
        Ok(())
    }

    #[track_caller]
    fn write(&mut self, frame: &[i16]) -> CoreResult<()> {
        self.append_chunk(frame)
    }

    fn read(&mut self, frame: &mut [i16]) -> CoreResult<usize> {
        let available = self.recorded - self.cursor;
        let count = available.min(frame.len());
        frame[..count].copy_from_slice(&self.samples[self.cursor..self.cursor + count]);
        self.cursor += count;
        Ok(count)
    }

    fn available(&self) -> usize {
        self.recorded - self.cursor
    }

    fn exists(&self) -> bool {
        self.recorded > 0
    }

    fn remaining_capacity(&self) -> Option<usize> {
        Some(self.remaining())
    }

    fn close(&mut self) -> CoreResult<()> {
        Ok(())
    }
}
