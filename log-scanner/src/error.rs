//! Error types for log scanning operations.

use thiserror::Error;

/// Errors that can occur while constructing or driving a [`crate::LogScanner`].
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Log buffer capacity was not a positive multiple of the required
    /// partition size.
    #[error(
        "invalid log buffer capacity: {capacity} is not a positive multiple of partition size {partition_size}"
    )]
    InvalidBufferCapacity {
        /// Capacity that was rejected.
        capacity: u32,
        /// Required partition size (the aligned header length).
        partition_size: u32,
    },

    /// Header length was negative, or not aligned as the frame
    /// descriptor requires.
    #[error("invalid frame header length: {header_length}")]
    InvalidHeaderLength {
        /// Header length that was rejected.
        header_length: i32,
    },

    /// State buffer was too small to hold the tail counter at its
    /// configured offset.
    #[error("state buffer too small: need at least {required} bytes, got {actual}")]
    StateBufferTooSmall {
        /// Minimum required size.
        required: usize,
        /// Actual buffer size.
        actual: usize,
    },

    /// `seek` was called with an offset that is negative, or ahead of
    /// the currently observed tail.
    #[error("invalid seek to {requested}: observed tail is {tail}")]
    InvalidSeek {
        /// Offset that was requested.
        requested: i64,
        /// Tail counter observed at the time of the call.
        tail: u32,
    },

    /// Underlying memory mapping failed.
    #[error("memory mapping error: {source}")]
    Io {
        /// Source IO error.
        #[from]
        source: std::io::Error,
    },
}

/// Result type for log scanning operations.
pub type ScannerResult<T> = Result<T, ScannerError>;
