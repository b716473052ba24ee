//! Shared primitives for the log-scanner and timer-wheel crates.
//!
//! Single source of truth for the alignment arithmetic and cache-line
//! constants both crates need so that padding/stride calculations can
//! never drift apart between them.

pub mod bit;
pub mod consts;
