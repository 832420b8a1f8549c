use crate::{ClipError, CoreResult, storage::ClipStore};

use std::{
    fs::{self, File},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

const BYTES_PER_SAMPLE: usize = 2;

enum Handle {
    Closed,
    Writing(File),
    Reading(File),
}

/// Persisted [`ClipStore`] over a raw little-endian PCM file.
///
/// The committed sample count survives process restarts: it is derived
/// from the file length at mount time. Closing after a write session
/// truncates anything a failed chunk left beyond the committed boundary
/// and syncs the file.
pub struct ClipFile {
    path: PathBuf,
    capacity: usize,
    committed: usize,
    cursor: usize,
    handle: Handle,
}

impl ClipFile {
    /// Mount a clip file, creating its parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClipError::StorageUnavailable`] when the backing
    /// directory or file cannot be provided.
    #[track_caller]
    #[instrument(skip(path))]
    pub fn new<P: AsRef<Path>>(path: P, capacity: usize) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| ClipError::StorageUnavailable {
                reason: format!("Failed to create clip directory {:?}: {}", parent, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        // A clip recorded by a previous run stays playable.
        let committed = match fs::metadata(&path) {
            Ok(meta) => ((meta.len() as usize) / BYTES_PER_SAMPLE).min(capacity),
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => {
                return Err(ClipError::StorageUnavailable {
                    reason: format!("Failed to stat clip file {:?}: {}", path, e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        info!(
            path = ?path,
            capacity_samples = capacity,
            committed_samples = committed,
            "Clip file mounted"
        );

        Ok(Self {
            path,
            capacity,
            committed,
            cursor: 0,
            handle: Handle::Closed,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Samples durably committed to the file.
    pub fn committed(&self) -> usize {
        self.committed
    }
}

impl ClipStore for ClipFile {
    fn open_for_write(&mut self) -> CoreResult<()> {
        let file = File::create(&self.path)?;
        self.committed = 0;
        self.cursor = 0;
        self.handle = Handle::Writing(file);

        debug!(path = ?self.path, "Clip file opened for write");

        Ok(())
    }

    fn open_for_read(&mut self) -> CoreResult<()> {
        let file = File::open(&self.path)?;
        self.cursor = 0;
        self.handle = Handle::Reading(file);

        Ok(())
    }

    fn rewind(&mut self) -> CoreResult<()> {
        let Handle::Reading(file) = &mut self.handle else {
            return Err(std::io::Error::other("clip file is not open for reading").into());
        };

        file.seek(SeekFrom::Start(0))?;
        self.cursor = 0;

        Ok(())
    }

    #[track_caller]
    fn write(&mut self, frame: &[i16]) -> CoreResult<()> {
        let Handle::Writing(file) = &mut self.handle else {
            return Err(std::io::Error::other("clip file is not open for writing").into());
        };

        let remaining = self.capacity - self.committed;
        if frame.len() > remaining {
            return Err(ClipError::CapacityExceeded {
                requested: frame.len(),
                remaining,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut bytes = Vec::with_capacity(frame.len() * BYTES_PER_SAMPLE);
        for sample in frame {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }

        // The committed count only advances on a full write; stray bytes
        // from a failed chunk are cut off at close.
        match file.write_all(&bytes) {
            Ok(()) => {
                self.committed += frame.len();
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::WriteZero => Err(ClipError::ShortWrite {
                requested: frame.len(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&mut self, frame: &mut [i16]) -> CoreResult<usize> {
        let Handle::Reading(file) = &mut self.handle else {
            return Err(std::io::Error::other("clip file is not open for reading").into());
        };

        let available = self.committed - self.cursor;
        let count = available.min(frame.len());
        if count == 0 {
            return Ok(0);
        }

        let mut bytes = vec![0u8; count * BYTES_PER_SAMPLE];
        file.read_exact(&mut bytes)?;

        for (slot, pair) in frame.iter_mut().zip(bytes.chunks_exact(BYTES_PER_SAMPLE)) {
            *slot = i16::from_le_bytes([pair[0], pair[1]]);
        }
        self.cursor += count;

        Ok(count)
    }

    fn available(&self) -> usize {
        self.committed - self.cursor
    }

    fn exists(&self) -> bool {
        self.committed > 0
    }

    fn remaining_capacity(&self) -> Option<usize> {
        Some(self.capacity - self.committed)
    }

    fn close(&mut self) -> CoreResult<()> {
        match std::mem::replace(&mut self.handle, Handle::Closed) {
            Handle::Writing(file) => {
                file.set_len((self.committed * BYTES_PER_SAMPLE) as u64)?;
                file.sync_all()?;

                debug!(
                    path = ?self.path,
                    committed_samples = self.committed,
                    "Clip file committed"
                );

                Ok(())
            }
            Handle::Reading(_) | Handle::Closed => Ok(()),
        }
    }
}
