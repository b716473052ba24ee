//! The log-buffer scanner.

use tracing::{debug, trace};
use transport_common::bit::align;

use crate::buffer::{LogBuffer, SpinWait, StateBuffer, acquire_fence};
use crate::config::FrameDescriptor;
use crate::error::{ScannerError, ScannerResult};

/// Receives one contiguous byte range of fully-published, non-padding
/// content per `scan_next` call.
pub trait AvailabilityHandler: FnMut(u32, u32) {}
impl<F: FnMut(u32, u32)> AvailabilityHandler for F {}

/// A single-reader cursor over an append-only framed log buffer.
///
/// One scanner instance must not be shared between reader threads: it
/// carries no internal synchronization of its own.
pub struct LogScanner {
    log: LogBuffer,
    state: StateBuffer,
    descriptor: FrameDescriptor,
    aligned_header: u32,
    capacity: u32,
    offset: u32,
}

impl LogScanner {
    /// Construct a scanner over `log`/`state` using the layout in
    /// `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerError::InvalidHeaderLength`] if the descriptor
    /// itself is invalid, or
    /// [`ScannerError::InvalidBufferCapacity`] if the log buffer's
    /// capacity is not a positive multiple of the aligned header
    /// length (the required partition size).
    pub fn new(
        log: LogBuffer,
        state: StateBuffer,
        descriptor: FrameDescriptor,
    ) -> ScannerResult<Self> {
        descriptor.validate()?;

        let aligned_header = align(descriptor.header_length as u32, descriptor.frame_alignment);
        let capacity = log.capacity();

        if capacity == 0 || capacity % aligned_header != 0 {
            return Err(ScannerError::InvalidBufferCapacity {
                capacity,
                partition_size: aligned_header,
            });
        }

        debug!(capacity, aligned_header, "log scanner constructed");

        Ok(Self {
            log,
            state,
            descriptor,
            aligned_header,
            capacity,
            offset: 0,
        })
    }

    /// Total byte capacity of the underlying log buffer.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Next frame boundary the scanner will examine.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// True once the scanner has reached the end of the log buffer.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.offset >= self.capacity
    }

    /// The aligned header length, handy for sizing `scan_next`'s
    /// `limit` correctly: a limit smaller than this can never admit a
    /// single frame and stalls the caller forever, so callers should
    /// treat this as the floor.
    #[inline]
    #[must_use]
    pub fn fragment_limit_hint(&self) -> u32 {
        self.aligned_header
    }

    /// Move the cursor to `new_offset`.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerError::InvalidSeek`] if `new_offset` is
    /// negative or beyond the currently observed tail. The caller is
    /// responsible for alignment; this does not validate it.
    pub fn seek(&mut self, new_offset: i64) -> ScannerResult<()> {
        let tail = self.state.load_tail_acquire();
        if new_offset < 0 || new_offset > i64::from(tail) {
            return Err(ScannerError::InvalidSeek {
                requested: new_offset,
                tail,
            });
        }
        self.offset = new_offset as u32;
        Ok(())
    }

    /// Scan for newly published frames, delivering at most one batch
    /// to `handler`.
    ///
    /// Returns the number of whole frames included in the batch (0 if
    /// nothing new was available, or if the first pending frame alone
    /// exceeds `limit`).
    pub fn scan_next(&mut self, limit: u32, mut handler: impl AvailabilityHandler) -> u32 {
        if self.is_complete() {
            return 0;
        }

        let tail = self.state.load_tail_acquire();
        if tail <= self.offset {
            return 0;
        }

        let base = self.offset;
        let mut length: u32 = 0;
        let mut padding: u32 = 0;
        let mut frame_count: u32 = 0;

        loop {
            let frame_offset = base + length + padding;
            let published_length = self.wait_for_published_length(frame_offset);
            let aligned = align(published_length as u32, self.descriptor.frame_alignment);

            let type_offset = frame_offset + self.descriptor.type_field_offset;
            if self.log.load_type(type_offset) == self.descriptor.padding_frame_type {
                // A padding frame's entire aligned span is tail slack: none
                // of it ever enters `length`, and it always ends the batch
                // (a producer only pads up to the tail it has published).
                padding += aligned;
                break;
            }

            if length + aligned > limit {
                break;
            }

            length += aligned;
            frame_count += 1;

            if base + length + padding >= tail {
                break;
            }
        }

        if length > 0 || padding > 0 {
            self.offset = base + length + padding;
        }
        if length > 0 {
            trace!(base, length, padding, frame_count, "scan_next delivering batch");
            handler(base, length);
        }

        frame_count
    }

    /// Spin until the frame's `length` header is published
    /// (non-zero), then return it. Backs off rather than busy-spinning
    /// the CPU flat out.
    fn wait_for_published_length(&self, frame_offset: u32) -> i32 {
        let length_offset = frame_offset + self.descriptor.length_field_offset;
        let mut spin = SpinWait::new();
        loop {
            let value = self.log.load_length_acquire(length_offset);
            if value != 0 {
                acquire_fence();
                return value;
            }
            spin.spin_once();
        }
    }
}
