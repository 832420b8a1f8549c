use crate::{ClipError, PlaybackShaper};

// Test constants
const GAIN: f32 = 5.0;
const SPEED_FACTOR: usize = 3;
const LOUD_POSITIVE: i16 = 20_000;
const LOUD_NEGATIVE: i16 = -20_000;
const SCRATCH_SAMPLES: usize = 64;

/// WHAT: Gain products beyond the sample range saturate at the rails
/// WHY: Loud clips must distort instead of wrapping around
#[test]
#[allow(clippy::unwrap_used)]
fn given_loud_samples_when_shaped_then_saturated_at_rails() {
    // Given: Gain that pushes both polarities out of range
    let shaper = PlaybackShaper::new(GAIN, 1).unwrap();
    let mut scratch = [0i16; SCRATCH_SAMPLES];

    // When: Shaping samples that overflow i16 after the gain
    let shaped = shaper
        .shape_chunk(&[LOUD_POSITIVE, LOUD_NEGATIVE, 100], &mut scratch)
        .unwrap();

    // Then: Clamped to the rails, small values scaled exactly
    assert_eq!(shaped, &[i16::MAX, i16::MIN, 500]);
}

/// WHAT: Output length is the ceiling of input length over the stride
/// WHY: The final partial stride still contributes one sample
#[test]
#[allow(clippy::unwrap_used)]
fn given_various_lengths_when_decimated_then_output_length_is_ceiling() {
    let shaper = PlaybackShaper::new(1.0, SPEED_FACTOR).unwrap();

    assert_eq!(shaper.output_len(10), 4);
    assert_eq!(shaper.output_len(9), 3);
    assert_eq!(shaper.output_len(1), 1);
    assert_eq!(shaper.output_len(0), 0);
}

/// WHAT: Decimation keeps every Nth sample starting at the chunk head
/// WHY: The stride phase is anchored to the front of each chunk
#[test]
#[allow(clippy::unwrap_used)]
fn given_ramp_when_decimated_then_every_nth_sample_kept() {
    // Given: Unity gain, keep every third sample
    let shaper = PlaybackShaper::new(1.0, SPEED_FACTOR).unwrap();
    let input: Vec<i16> = (0..10).collect();
    let mut scratch = [0i16; SCRATCH_SAMPLES];

    // When: Shaping one chunk
    let shaped = shaper.shape_chunk(&input, &mut scratch).unwrap();

    // Then: Indices 0, 3, 6, 9 survive
    assert_eq!(shaped, &[0, 3, 6, 9]);
}

/// WHAT: The stride phase restarts with every chunk
/// WHY: Chunks are shaped independently, with no phase carried between them
#[test]
#[allow(clippy::unwrap_used)]
fn given_consecutive_chunks_when_shaped_then_phase_restarts_per_chunk() {
    // Given: A chunk length that is not a stride multiple
    let shaper = PlaybackShaper::new(1.0, SPEED_FACTOR).unwrap();
    let mut scratch = [0i16; SCRATCH_SAMPLES];

    // When: Two four-sample chunks pass through the same shaper
    let first = shaper.shape_chunk(&[0, 1, 2, 3], &mut scratch).unwrap().to_vec();
    let second = shaper.shape_chunk(&[4, 5, 6, 7], &mut scratch).unwrap().to_vec();

    // Then: Both chunks select indices 0 and 3 from their own start
    assert_eq!(first, &[0, 3]);
    assert_eq!(second, &[4, 7]);
}

/// WHAT: A single sample survives any stride
/// WHY: A non-empty chunk must never shape to silence
#[test]
#[allow(clippy::unwrap_used)]
fn given_one_sample_when_decimated_by_large_stride_then_sample_kept() {
    let shaper = PlaybackShaper::new(2.0, 5).unwrap();
    let mut scratch = [0i16; 1];

    let shaped = shaper.shape_chunk(&[21], &mut scratch).unwrap();

    assert_eq!(shaped, &[42]);
}

/// WHAT: Empty input shapes to empty output
/// WHY: Zero-length chunks are a valid no-op, not an error
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_input_when_shaped_then_empty_output() {
    let shaper = PlaybackShaper::new(GAIN, SPEED_FACTOR).unwrap();
    let mut scratch = [0i16; SCRATCH_SAMPLES];

    let shaped = shaper.shape_chunk(&[], &mut scratch).unwrap();

    assert!(shaped.is_empty());
}

/// WHAT: Unity gain at stride one reproduces the input
/// WHY: The neutral configuration must be lossless
#[test]
#[allow(clippy::unwrap_used)]
fn given_neutral_shaper_when_shaping_then_output_equals_input() {
    let shaper = PlaybackShaper::new(1.0, 1).unwrap();
    let input: Vec<i16> = vec![-5, 0, 5, i16::MAX, i16::MIN];
    let mut scratch = [0i16; SCRATCH_SAMPLES];

    let shaped = shaper.shape_chunk(&input, &mut scratch).unwrap();

    assert_eq!(shaped, input.as_slice());
}

/// WHAT: A scratch buffer smaller than the shaped length is rejected up front
/// WHY: Shaping must never write past the caller's buffer
#[test]
#[allow(clippy::unwrap_used)]
fn given_undersized_scratch_when_shaping_then_scratch_too_small() {
    // Given: Ten input samples need four slots at stride three
    let shaper = PlaybackShaper::new(1.0, SPEED_FACTOR).unwrap();
    let input: Vec<i16> = (0..10).collect();
    let mut scratch = [0i16; 3];

    // When: Shaping into three slots
    let result = shaper.shape_chunk(&input, &mut scratch);

    // Then: Rejected with both sizes
    assert!(matches!(
        result,
        Err(ClipError::ScratchTooSmall {
            required: 4,
            provided: 3,
            ..
        })
    ));
}

/// WHAT: Non-positive or non-finite gain and a zero stride are rejected
/// WHY: Those parameters cannot produce meaningful playback
#[test]
fn given_invalid_parameters_when_building_shaper_then_invalid_config() {
    assert!(matches!(
        PlaybackShaper::new(0.0, 1),
        Err(ClipError::InvalidConfig { .. })
    ));
    assert!(matches!(
        PlaybackShaper::new(-1.0, 1),
        Err(ClipError::InvalidConfig { .. })
    ));
    assert!(matches!(
        PlaybackShaper::new(f32::NAN, 1),
        Err(ClipError::InvalidConfig { .. })
    ));
    assert!(matches!(
        PlaybackShaper::new(1.0, 0),
        Err(ClipError::InvalidConfig { .. })
    ));
}
