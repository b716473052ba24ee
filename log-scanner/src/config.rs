//! Frame layout descriptor.
//!
//! A [`FrameDescriptor`] tells the scanner where the `length` and
//! `type` fields live relative to a frame's start, what alignment the
//! producer pads to, and which 16-bit type value marks padding. This
//! crate never reads a descriptor from a file or environment variable
//! itself — constructing and validating one is the host process's job.

use serde::{Deserialize, Serialize};
use transport_common::bit::is_power_of_two;
use transport_common::consts::{DEFAULT_FRAME_ALIGNMENT, PADDING_FRAME_TYPE};

use crate::error::{ScannerError, ScannerResult};

/// Describes the bit-exact layout of frames in a log buffer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameDescriptor {
    /// Header length `H`, in bytes, before alignment.
    pub header_length: i32,
    /// Alignment boundary frames are padded to. Must be a power of two.
    pub frame_alignment: u32,
    /// 16-bit type value marking a padding/filler frame.
    #[serde(default = "default_padding_frame_type")]
    pub padding_frame_type: u16,
    /// Byte offset of the `length` field within a frame header.
    #[serde(default)]
    pub length_field_offset: u32,
    /// Byte offset of the `type` field within a frame header.
    #[serde(default = "default_type_field_offset")]
    pub type_field_offset: u32,
}

fn default_padding_frame_type() -> u16 {
    PADDING_FRAME_TYPE
}

fn default_type_field_offset() -> u32 {
    4
}

impl FrameDescriptor {
    /// Build a descriptor with the conventional field offsets: `length`
    /// at offset 0, `type` at offset 4, `PADDING_FRAME_TYPE` as the
    /// reserved padding marker.
    #[must_use]
    pub fn new(header_length: i32, frame_alignment: u32) -> Self {
        Self {
            header_length,
            frame_alignment,
            padding_frame_type: PADDING_FRAME_TYPE,
            length_field_offset: 0,
            type_field_offset: default_type_field_offset(),
        }
    }

    /// Validate the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ScannerError::InvalidHeaderLength`] if `header_length`
    /// is negative, or if `frame_alignment` is not a power of two, or
    /// if the `type` field would not fit before the header ends.
    pub fn validate(&self) -> ScannerResult<()> {
        if self.header_length < 0 {
            return Err(ScannerError::InvalidHeaderLength {
                header_length: self.header_length,
            });
        }
        if !is_power_of_two(u64::from(self.frame_alignment)) {
            return Err(ScannerError::InvalidHeaderLength {
                header_length: self.header_length,
            });
        }
        if self.type_field_offset + 2 > self.header_length as u32 {
            return Err(ScannerError::InvalidHeaderLength {
                header_length: self.header_length,
            });
        }
        Ok(())
    }
}

impl Default for FrameDescriptor {
    /// 32-byte aligned frames with an 8-byte header: `length` (i32) at
    /// offset 0, `type` (u16) at offset 4 — the layout typical of this
    /// kind of framed log.
    fn default() -> Self {
        Self::new(8, DEFAULT_FRAME_ALIGNMENT)
    }
}
