//! Scripted endpoints, controls, and stores shared by the session and
//! panel tests.

use crate::{
    CaptureBuffer, ClipError, ClipStore, CoreResult, FrameSink, FrameSource, InputLine, PortRole,
    StatusLine, TransportConfig,
};

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    panic::Location,
    rc::Rc,
    thread,
    time::Duration,
};

use error_location::ErrorLocation;

/// Frame source producing a deterministic sample ramp.
pub(crate) struct ScriptedSource {
    remaining: Option<usize>,
    delay: Option<Duration>,
    next_value: i16,
    pub(crate) configured: usize,
    pub(crate) shutdowns: usize,
    pub(crate) last_role: Option<PortRole>,
}

impl ScriptedSource {
    fn build(remaining: Option<usize>, delay: Option<Duration>) -> Self {
        Self {
            remaining,
            delay,
            next_value: 0,
            configured: 0,
            shutdowns: 0,
            last_role: None,
        }
    }

    /// Fills every request completely, forever.
    pub(crate) fn endless() -> Self {
        Self::build(None, None)
    }

    /// Produces exactly `total` samples, then reports exhaustion.
    pub(crate) fn limited(total: usize) -> Self {
        Self::build(Some(total), None)
    }

    /// Endless source that stalls on every read.
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self::build(None, Some(delay))
    }
}

impl FrameSource for ScriptedSource {
    fn configure(&mut self, config: &TransportConfig) -> CoreResult<()> {
        self.configured += 1;
        self.last_role = Some(config.role);
        Ok(())
    }

    fn read(&mut self, frame: &mut [i16]) -> CoreResult<usize> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        let count = match self.remaining {
            None => frame.len(),
            Some(left) => left.min(frame.len()),
        };
        for slot in frame.iter_mut().take(count) {
            *slot = self.next_value;
            self.next_value = self.next_value.wrapping_add(1);
        }
        if let Some(left) = self.remaining.as_mut() {
            *left -= count;
        }
        Ok(count)
    }

    fn shutdown(&mut self) -> CoreResult<()> {
        self.shutdowns += 1;
        Ok(())
    }
}

/// Frame sink that records everything written to it. Per-call acceptance
/// caps can be scripted; a cap of zero makes that write report exhaustion.
pub(crate) struct CollectingSink {
    pub(crate) written: Vec<i16>,
    pub(crate) configured: usize,
    pub(crate) shutdowns: usize,
    pub(crate) last_role: Option<PortRole>,
    accepts: VecDeque<usize>,
}

impl CollectingSink {
    pub(crate) fn new() -> Self {
        Self::with_accepts(Vec::new())
    }

    pub(crate) fn with_accepts(accepts: Vec<usize>) -> Self {
        Self {
            written: Vec::new(),
            configured: 0,
            shutdowns: 0,
            last_role: None,
            accepts: accepts.into(),
        }
    }
}

impl FrameSink for CollectingSink {
    fn configure(&mut self, config: &TransportConfig) -> CoreResult<()> {
        self.configured += 1;
        self.last_role = Some(config.role);
        Ok(())
    }

    fn write(&mut self, frame: &[i16]) -> CoreResult<usize> {
        let cap = self.accepts.pop_front().unwrap_or(frame.len());
        let count = cap.min(frame.len());
        self.written.extend_from_slice(&frame[..count]);
        Ok(count)
    }

    fn shutdown(&mut self) -> CoreResult<()> {
        self.shutdowns += 1;
        Ok(())
    }
}

/// Input line whose level the test flips through a shared handle.
#[derive(Clone)]
pub(crate) struct TestLine {
    level: Rc<Cell<bool>>,
}

impl TestLine {
    pub(crate) fn new(active: bool) -> Self {
        Self {
            level: Rc::new(Cell::new(active)),
        }
    }

    pub(crate) fn set(&self, active: bool) {
        self.level.set(active);
    }
}

impl InputLine for TestLine {
    fn is_active(&self) -> bool {
        self.level.get()
    }
}

/// Status line that logs every transition it is driven through.
#[derive(Clone)]
pub(crate) struct TestIndicator {
    log: Rc<RefCell<Vec<bool>>>,
}

impl TestIndicator {
    pub(crate) fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn transitions(&self) -> Vec<bool> {
        self.log.borrow().clone()
    }
}

impl StatusLine for TestIndicator {
    fn set_active(&mut self, active: bool) {
        self.log.borrow_mut().push(active);
    }
}

/// Clip store that fails one scripted write call, counting from one.
pub(crate) struct FlakyStore {
    inner: CaptureBuffer,
    fail_on_write: usize,
    writes: usize,
}

impl FlakyStore {
    pub(crate) fn new(capacity: usize, fail_on_write: usize) -> CoreResult<Self> {
        Ok(Self {
            inner: CaptureBuffer::with_capacity(capacity)?,
            fail_on_write,
            writes: 0,
        })
    }
}

impl ClipStore for FlakyStore {
    fn open_for_write(&mut self) -> CoreResult<()> {
        self.inner.open_for_write()
    }

    fn open_for_read(&mut self) -> CoreResult<()> {
        self.inner.open_for_read()
    }

    fn rewind(&mut self) -> CoreResult<()> {
        self.inner.rewind()
    }

    fn write(&mut self, frame: &[i16]) -> CoreResult<()> {
        self.writes += 1;
        if self.writes == self.fail_on_write {
            return Err(ClipError::ShortWrite {
                requested: frame.len(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.inner.write(frame)
    }

    fn read(&mut self, frame: &mut [i16]) -> CoreResult<usize> {
        self.inner.read(frame)
    }

    fn available(&self) -> usize {
        self.inner.available()
    }

    fn exists(&self) -> bool {
        self.inner.exists()
    }

    fn remaining_capacity(&self) -> Option<usize> {
        self.inner.remaining_capacity()
    }

    fn close(&mut self) -> CoreResult<()> {
        self.inner.close()
    }
}
