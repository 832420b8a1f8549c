mod file;

pub use file::ClipFile;

use crate::CoreResult;

/// Backing store for one captured clip.
///
/// The session controller drives every implementation through the same
/// chunked-transfer contract, whether the clip lives in memory or in a
/// persisted file. A capture session brackets writes with
/// `open_for_write` (which discards any prior clip) and `close`; a
/// playback pass brackets reads with `open_for_read`, rewinding once per
/// repeat.
pub trait ClipStore {
    /// Begin a new clip, truncating prior content.
    fn open_for_write(&mut self) -> CoreResult<()>;

    /// Open the committed clip for reading from the start.
    fn open_for_read(&mut self) -> CoreResult<()>;

    /// Move the read cursor back to the start of the clip.
    fn rewind(&mut self) -> CoreResult<()>;

    /// Durably commit one chunk at the current fill offset.
    ///
    /// All or nothing: a failed write must leave the committed count
    /// untouched.
    fn write(&mut self, frame: &[i16]) -> CoreResult<()>;

    /// Read up to `frame.len()` samples at the cursor, returning the
    /// count. Zero means the clip is exhausted.
    fn read(&mut self, frame: &mut [i16]) -> CoreResult<usize>;

    /// Committed samples left between the read cursor and end of clip.
    fn available(&self) -> usize;

    /// Whether a committed clip is present.
    fn exists(&self) -> bool;

    /// Capacity left for writes, or `None` when unbounded.
    fn remaining_capacity(&self) -> Option<usize>;

    /// Release any open handle, truncating uncommitted tail data.
    fn close(&mut self) -> CoreResult<()>;
}
