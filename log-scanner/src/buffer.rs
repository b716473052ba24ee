//! Memory-mapped log and state buffers with volatile field access.
//!
//! Both buffers are backed by a `MAP_SHARED` mapping so that writes an
//! external producer makes in its own process (or another mapping of
//! the same file, in the same process for tests) become visible here
//! without any syscall on the read side. The scanner only ever reads
//! through these types; nothing here exposes a write path.

use memmap2::MmapMut;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering, fence};

use crate::error::{ScannerError, ScannerResult};

/// An append-only framed log buffer.
pub struct LogBuffer {
    pub(crate) mmap: MmapMut,
}

impl LogBuffer {
    /// Wrap an existing shared mapping as a log buffer.
    #[must_use]
    pub fn from_mmap(mmap: MmapMut) -> Self {
        Self { mmap }
    }

    /// Create a fresh anonymous `MAP_SHARED` mapping of `capacity`
    /// bytes, zero-filled. Convenient for tests and for a producer and
    /// scanner that live in the same process.
    pub fn create_anonymous(capacity: u32) -> ScannerResult<Self> {
        let mmap = MmapMut::map_anon(capacity as usize).map_err(|source| ScannerError::Io {
            source,
        })?;
        Ok(Self { mmap })
    }

    /// Total byte capacity of the log region.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.mmap.len() as u32
    }

    #[inline]
    fn ptr_at(&self, offset: u32) -> *const u8 {
        // Safety: callers (the scanner) only ever pass offsets that are
        // within `capacity()`, checked before this is called.
        unsafe { self.mmap.as_ptr().add(offset as usize) }
    }

    /// Acquire-ordered load of the 32-bit signed `length` field at
    /// `offset`. Spinning on a zero result is the caller's
    /// responsibility; this is a single observation.
    #[inline]
    pub fn load_length_acquire(&self, offset: u32) -> i32 {
        let ptr = self.ptr_at(offset) as *const AtomicI32;
        // Safety: `AtomicI32` has the same layout as `i32`, and the
        // offset is frame-aligned so the access is naturally aligned.
        unsafe { &*ptr }.load(Ordering::Acquire)
    }

    /// Plain load of the 16-bit `type` field at `offset`, within an
    /// already-published frame. The wire format fixes the field as
    /// little-endian regardless of host byte order.
    #[inline]
    pub fn load_type(&self, offset: u32) -> u16 {
        let ptr = self.ptr_at(offset);
        // Safety: offset is within a published frame whose header is
        // fully written by the time `length` was observed non-zero.
        let bytes = unsafe { [*ptr, *ptr.add(1)] };
        u16::from_le_bytes(bytes)
    }
}

/// A small companion region holding the producer-maintained tail
/// counter.
pub struct StateBuffer {
    pub(crate) mmap: MmapMut,
    pub(crate) tail_offset: u32,
}

impl StateBuffer {
    /// Wrap an existing shared mapping as a state buffer. `tail_offset`
    /// is the byte offset of the tail counter within it.
    pub fn from_mmap(mmap: MmapMut, tail_offset: u32) -> ScannerResult<Self> {
        let required = tail_offset as usize + std::mem::size_of::<u32>();
        if mmap.len() < required {
            return Err(ScannerError::StateBufferTooSmall {
                required,
                actual: mmap.len(),
            });
        }
        Ok(Self { mmap, tail_offset })
    }

    /// Create a fresh anonymous mapping large enough to hold a tail
    /// counter at `tail_offset`, for tests and same-process use.
    pub fn create_anonymous(tail_offset: u32) -> ScannerResult<Self> {
        let size = (tail_offset as usize + std::mem::size_of::<u32>()).max(64);
        let mmap = MmapMut::map_anon(size).map_err(|source| ScannerError::Io { source })?;
        Self::from_mmap(mmap, tail_offset)
    }

    /// Acquire-ordered load of the tail counter.
    #[inline]
    pub fn load_tail_acquire(&self) -> u32 {
        let ptr = unsafe { self.mmap.as_ptr().add(self.tail_offset as usize) } as *const AtomicU32;
        unsafe { &*ptr }.load(Ordering::Acquire)
    }
}

/// Bounded busy-wait with a backoff, used while spinning for a
/// not-yet-published frame length. Backs off but never blocks on a
/// condvar or mutex.
pub struct SpinWait {
    spins: u32,
}

impl SpinWait {
    const SPIN_THRESHOLD: u32 = 64;

    /// Create a fresh spin-wait counter.
    #[must_use]
    pub fn new() -> Self {
        Self { spins: 0 }
    }

    /// Back off once: a CPU pause hint while under the spin threshold,
    /// then a thread yield once the caller has been spinning a while.
    pub fn spin_once(&mut self) {
        if self.spins < Self::SPIN_THRESHOLD {
            std::hint::spin_loop();
            self.spins += 1;
        } else {
            std::thread::yield_now();
        }
    }
}

impl Default for SpinWait {
    fn default() -> Self {
        Self::new()
    }
}

/// Memory fence used after a batch of volatile reads to ensure the
/// header observation happens-before any payload the caller goes on
/// to parse. Exposed so the scanner's `scan_next` can make this
/// explicit at the call site.
#[inline]
pub fn acquire_fence() {
    fence(Ordering::Acquire);
}
