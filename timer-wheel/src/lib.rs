//! # timer-wheel
//!
//! A single-threaded hashed timing wheel: O(1) scheduling and
//! cancellation for deadline-driven callbacks, at the tick resolution
//! the owner configures. All scheduling, cancellation, and expiration
//! must happen on the owning thread — there is no internal
//! synchronization, by design.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use timer_wheel::TimerWheel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut wheel = TimerWheel::new(1_000_000, 512)?; // 1ms ticks, 512 slots
//!
//! let timer = wheel.new_timeout(Duration::from_millis(50), || {
//!     // heartbeat fired
//! });
//!
//! // Driven on the owner thread, typically once per tick:
//! std::thread::sleep(Duration::from_millis(wheel.calculate_delay_in_msec().max(0) as u64));
//! wheel.expire_timers();
//!
//! timer.cancel(); // idempotent even after it has already fired
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod config;
pub mod error;
pub mod timer;
pub mod wheel;

pub use clock::{Clock, MonotonicClock};
pub use config::WheelConfig;
pub use error::{WheelError, WheelResult};
pub use timer::{Timer, TimerState};
pub use wheel::TimerWheel;

/// Initialize tracing for wheel diagnostics.
///
/// Not called automatically; the host process decides its own logging
/// setup. Installs an `EnvFilter`-driven subscriber reading
/// `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
