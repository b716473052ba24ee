//! # log-scanner
//!
//! A lock-free, single-reader scanner over an append-only framed log
//! buffer. One external producer appends length-prefixed frames and
//! advances a tail counter; one reader thread drives a [`LogScanner`]
//! forward, observing both through acquire/release memory ordering
//! with no locks and no condition variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use log_scanner::{FrameDescriptor, LogBuffer, LogScanner, StateBuffer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let log = LogBuffer::create_anonymous(1 << 20)?;
//! let state = StateBuffer::create_anonymous(0)?;
//! let descriptor = FrameDescriptor::default();
//!
//! let mut scanner = LogScanner::new(log, state, descriptor)?;
//! let limit = scanner.fragment_limit_hint().max(4096);
//! while !scanner.is_complete() {
//!     let delivered = scanner.scan_next(limit, |offset, length| {
//!         let _ = (offset, length); // parse the frames in [offset, offset+length)
//!     });
//!     if delivered == 0 {
//!         break; // nothing new yet; caller decides whether to retry or exit
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread safety
//!
//! [`LogScanner`] is single-reader: one scanner per reader thread, one
//! external producer per log. Nothing in this crate writes to the log
//! or state buffers outside of [`test_support`], which exists only to
//! build fixtures for this crate's own tests.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod scanner;
pub mod test_support;

pub use buffer::{LogBuffer, SpinWait, StateBuffer};
pub use config::FrameDescriptor;
pub use error::{ScannerError, ScannerResult};
pub use scanner::{AvailabilityHandler, LogScanner};

/// Initialize tracing for scanner diagnostics.
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
