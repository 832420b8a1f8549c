use crate::{CaptureBuffer, ClipError, ClipStore};

// Test constants
const CAPACITY_SAMPLES: usize = 4096;
const SMALL_CAPACITY: usize = 8;
const ABSURD_CAPACITY: usize = usize::MAX / 2;

/// WHAT: A fresh buffer is empty with the requested capacity
/// WHY: Capacity is fixed at allocation time and never grows afterwards
#[test]
#[allow(clippy::unwrap_used)]
fn given_new_buffer_when_inspected_then_empty_with_full_capacity() {
    // Given/When: Buffer allocated for the clip bound
    let buffer = CaptureBuffer::with_capacity(CAPACITY_SAMPLES).unwrap();

    // Then: No samples recorded, full capacity remaining
    assert_eq!(buffer.recorded(), 0);
    assert_eq!(buffer.capacity(), CAPACITY_SAMPLES);
    assert_eq!(buffer.remaining(), CAPACITY_SAMPLES);
    assert!(!buffer.exists());
}

/// WHAT: Appended chunks accumulate in arrival order
/// WHY: The clip is a contiguous recording, not a ring
#[test]
#[allow(clippy::unwrap_used)]
fn given_chunks_when_appended_then_samples_accumulate_in_order() {
    // Given: An empty buffer
    let mut buffer = CaptureBuffer::with_capacity(CAPACITY_SAMPLES).unwrap();

    // When: Two chunks arrive
    buffer.append_chunk(&[1, 2, 3]).unwrap();
    buffer.append_chunk(&[4, 5]).unwrap();

    // Then: Recorded region holds both chunks back to back
    assert_eq!(buffer.recorded(), 5);
    assert_eq!(buffer.samples(), &[1, 2, 3, 4, 5]);
    assert_eq!(buffer.remaining(), CAPACITY_SAMPLES - 5);
}

/// WHAT: A chunk larger than the remaining space is rejected whole
/// WHY: Partial appends would silently drop the tail of a chunk
#[test]
#[allow(clippy::unwrap_used)]
fn given_nearly_full_buffer_when_oversized_chunk_appended_then_capacity_exceeded() {
    // Given: Three samples of space left
    let mut buffer = CaptureBuffer::with_capacity(SMALL_CAPACITY).unwrap();
    buffer.append_chunk(&[0; 5]).unwrap();

    // When: A four-sample chunk arrives
    let result = buffer.append_chunk(&[0; 4]);

    // Then: Rejected with both sizes, nothing written
    assert!(matches!(
        result,
        Err(ClipError::CapacityExceeded {
            requested: 4,
            remaining: 3,
            ..
        })
    ));
    assert_eq!(buffer.recorded(), 5);
}

/// WHAT: Filling to exactly the capacity succeeds, one more sample fails
/// WHY: The boundary itself is valid clip space
#[test]
#[allow(clippy::unwrap_used)]
fn given_exact_fill_when_one_more_sample_appended_then_rejected() {
    // Given: A buffer filled to the last sample
    let mut buffer = CaptureBuffer::with_capacity(SMALL_CAPACITY).unwrap();
    buffer.append_chunk(&[7; SMALL_CAPACITY]).unwrap();
    assert_eq!(buffer.remaining(), 0);

    // When/Then: Any further append is rejected
    assert!(matches!(
        buffer.append_chunk(&[7]),
        Err(ClipError::CapacityExceeded { .. })
    ));
}

/// WHAT: Reset discards the clip but keeps the allocation
/// WHY: Each capture session starts from an empty clip without reallocating
#[test]
#[allow(clippy::unwrap_used)]
fn given_recorded_clip_when_reset_then_empty_with_same_capacity() {
    // Given: A buffer holding a clip
    let mut buffer = CaptureBuffer::with_capacity(CAPACITY_SAMPLES).unwrap();
    buffer.append_chunk(&[1; 100]).unwrap();

    // When: Reset
    buffer.reset();

    // Then: Empty again, capacity untouched
    assert_eq!(buffer.recorded(), 0);
    assert!(!buffer.exists());
    assert_eq!(buffer.capacity(), CAPACITY_SAMPLES);
}

/// WHAT: Reads walk the clip in chunks and report exhaustion with zero
/// WHY: Playback pulls the clip through the same frame contract as capture
#[test]
#[allow(clippy::unwrap_used)]
fn given_committed_clip_when_read_in_frames_then_cursor_walks_to_exhaustion() {
    // Given: Five samples committed through the store interface
    let mut buffer = CaptureBuffer::with_capacity(CAPACITY_SAMPLES).unwrap();
    buffer.open_for_write().unwrap();
    buffer.write(&[10, 20, 30, 40, 50]).unwrap();
    buffer.close().unwrap();
    buffer.open_for_read().unwrap();

    // When/Then: Two-sample frames drain the clip, final frame is short
    let mut frame = [0i16; 2];
    assert_eq!(buffer.read(&mut frame).unwrap(), 2);
    assert_eq!(frame, [10, 20]);
    assert_eq!(buffer.available(), 3);
    assert_eq!(buffer.read(&mut frame).unwrap(), 2);
    assert_eq!(frame, [30, 40]);
    assert_eq!(buffer.read(&mut frame).unwrap(), 1);
    assert_eq!(frame[0], 50);
    assert_eq!(buffer.read(&mut frame).unwrap(), 0);

    // Then: Rewind makes the whole clip readable again
    buffer.rewind().unwrap();
    assert_eq!(buffer.available(), 5);
    assert_eq!(buffer.read(&mut frame).unwrap(), 2);
    assert_eq!(frame, [10, 20]);
}

/// WHAT: Opening for write discards the previous clip
/// WHY: A new capture session replaces the old recording entirely
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_clip_when_reopened_for_write_then_previous_clip_gone() {
    // Given: A committed clip
    let mut buffer = CaptureBuffer::with_capacity(CAPACITY_SAMPLES).unwrap();
    buffer.open_for_write().unwrap();
    buffer.write(&[1, 2, 3]).unwrap();
    buffer.close().unwrap();
    assert!(buffer.exists());

    // When: Reopened for writing
    buffer.open_for_write().unwrap();

    // Then: Empty, and the next write starts a fresh clip
    assert!(!buffer.exists());
    buffer.write(&[9]).unwrap();
    assert_eq!(buffer.samples(), &[9]);
}

/// WHAT: Remaining capacity shrinks with every committed chunk
/// WHY: The capture loop clamps chunk requests to this value
#[test]
#[allow(clippy::unwrap_used)]
fn given_writes_when_capacity_queried_then_reflects_committed_samples() {
    // Given: An empty buffer behind the store interface
    let mut buffer = CaptureBuffer::with_capacity(SMALL_CAPACITY).unwrap();
    buffer.open_for_write().unwrap();
    assert_eq!(buffer.remaining_capacity(), Some(SMALL_CAPACITY));

    // When: Three samples land
    buffer.write(&[0; 3]).unwrap();

    // Then: Five remain
    assert_eq!(buffer.remaining_capacity(), Some(SMALL_CAPACITY - 3));
}

/// WHAT: An impossible capacity reports allocation failure instead of aborting
/// WHY: Clip memory is reserved fallibly so startup can fail cleanly
#[test]
fn given_absurd_capacity_when_allocating_then_allocation_failure() {
    // Given/When: A capacity no allocator can satisfy
    let result = CaptureBuffer::with_capacity(ABSURD_CAPACITY);

    // Then: Reported as an error, not a panic
    assert!(matches!(result, Err(ClipError::AllocationFailure { .. })));
}
