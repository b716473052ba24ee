//! Error types for timer wheel construction.

use thiserror::Error;

/// Errors that can occur while constructing a [`crate::TimerWheel`].
#[derive(Error, Debug)]
pub enum WheelError {
    /// `ticksPerWheel` was not a power of two, or was less than 2.
    #[error("ticks_per_wheel must be a power of two >= 2, got {ticks_per_wheel}")]
    TicksPerWheelNotPowerOfTwo {
        /// The rejected value.
        ticks_per_wheel: u64,
    },

    /// `tickDurationNanos × ticksPerWheel` would overflow a signed
    /// 64-bit nanosecond range.
    #[error(
        "tick_duration_nanos ({tick_duration_nanos}) * ticks_per_wheel ({ticks_per_wheel}) overflows i64"
    )]
    DurationOverflow {
        /// Tick duration that was rejected.
        tick_duration_nanos: i64,
        /// Ticks-per-wheel that was rejected.
        ticks_per_wheel: u64,
    },
}

/// Result type for timer wheel operations.
pub type WheelResult<T> = Result<T, WheelError>;
