//! Test-only helpers for writing frames and publishing the tail
//! counter directly into a mapping.
//!
//! Not part of the scanner's API contract — the real producer lives
//! outside this crate as a separate collaborator. `#[doc(hidden)]` so
//! it does not show up as intended
//! public surface, but left unconditionally compiled so both this
//! crate's own unit tests and the black-box `tests/` suite can build
//! fixtures without duplicating unsafe pointer code.
#![doc(hidden)]

use std::sync::atomic::{AtomicI32, AtomicU32, Ordering, fence};

use crate::buffer::{LogBuffer, StateBuffer};

/// Write one frame's header at `offset`: payload/header bytes are left
/// as whatever the buffer already contained (usually zeroed), and the
/// `length` field is published last with `Release` ordering, exactly
/// as a real producer must.
pub fn write_frame_header(
    log: &mut LogBuffer,
    offset: u32,
    type_field_offset: u32,
    length: i32,
    frame_type: u16,
) {
    unsafe {
        let type_ptr = log.mmap.as_mut_ptr().add((offset + type_field_offset) as usize);
        std::ptr::copy_nonoverlapping(frame_type.to_le_bytes().as_ptr(), type_ptr, 2);

        fence(Ordering::Release);

        let length_ptr = log.mmap.as_mut_ptr().add(offset as usize) as *mut AtomicI32;
        (*length_ptr).store(length, Ordering::Release);
    }
}

/// Publish a new tail value with `Release` ordering.
pub fn publish_tail(state: &mut StateBuffer, tail: u32) {
    unsafe {
        let ptr = state.mmap.as_mut_ptr().add(state.tail_offset as usize) as *mut AtomicU32;
        (*ptr).store(tail, Ordering::Release);
    }
}

/// Raw pointer to the start of a log buffer's mapping, for tests that
/// need to share it with a producer thread as if it were a second
/// process's mapping of the same file.
pub fn raw_log_ptr(log: &mut LogBuffer) -> *mut u8 {
    log.mmap.as_mut_ptr()
}

/// Byte offset of the tail counter within its state buffer's mapping.
pub fn tail_offset(state: &StateBuffer) -> u32 {
    state.tail_offset
}

/// Raw pointer to the start of a state buffer's mapping.
pub fn raw_state_ptr(state: &mut StateBuffer) -> *mut u8 {
    state.mmap.as_mut_ptr()
}
