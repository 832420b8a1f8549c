use crate::session::SessionState;

use std::{collections::TryReserveError, panic::Location};

use error_location::ErrorLocation;
use thiserror::Error;

/// Clip pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum ClipError {
    /// Backing memory for captured audio could not be obtained.
    #[error("Clip buffer allocation failed: {source} {location}")]
    AllocationFailure {
        /// Underlying reservation failure.
        #[source]
        source: TryReserveError,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A chunked transfer returned zero progress; the endpoint is gone.
    #[error("Transport exhausted after {transferred} samples {location}")]
    TransferExhausted {
        /// Samples moved before the transport went silent.
        transferred: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An append was asked to exceed the clip capacity. Callers clamp
    /// before writing; reaching capacity through the capture loop is a
    /// normal stop, not this error.
    #[error("Clip capacity exceeded: {requested} samples requested, {remaining} remaining {location}")]
    CapacityExceeded {
        /// Samples the caller tried to append.
        requested: usize,
        /// Samples of capacity left before the append.
        remaining: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Persisted clip backend could not be created or mounted.
    #[error("Clip storage unavailable: {reason} {location}")]
    StorageUnavailable {
        /// Description of the storage failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A clip store failed to durably commit a full chunk.
    #[error("Short clip write: {requested} samples could not be committed {location}")]
    ShortWrite {
        /// Samples the session asked the store to commit.
        requested: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A session was requested while another is active.
    #[error("Session busy: controller is {state:?} {location}")]
    SessionBusy {
        /// State the controller was in when the request arrived.
        state: SessionState,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Caller-provided scratch cannot hold the shaped chunk.
    #[error("Scratch too small: {required} samples required, {provided} provided {location}")]
    ScratchTooSmall {
        /// Samples the shaped chunk needs.
        required: usize,
        /// Samples the caller provided.
        provided: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio endpoint operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio input device found.
    #[error("No input device found {location}")]
    NoInputDevice {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio output device found.
    #[error("No output device found {location}")]
    NoOutputDevice {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// I/O failure inside an open clip file.
    #[error("Clip storage error: {source} {location}")]
    StorageError {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Rejected session or transform parameters.
    #[error("Invalid configuration: {reason} {location}")]
    InvalidConfig {
        /// Description of the rejected parameter.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

// Manual From impls with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<TryReserveError> for ClipError {
    #[track_caller]
    fn from(source: TryReserveError) -> Self {
        ClipError::AllocationFailure {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for ClipError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        ClipError::StorageError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`ClipError`].
pub type Result<T> = std::result::Result<T, ClipError>;
