//! Roland S-330 parameter data handling
//!
//! Unlike the Akai program files in [`akp`](crate::akp), S-330 records
//! carry no framing at all: system, patch and tone parameters are flat
//! byte blocks whose fields live at fixed offsets ([`offsets`]). Values
//! use the machine's own encodings (see [`value`]): signed bytes offset
//! around a center, two incompatible 3-byte address packings, interleaved
//! envelope points.
//!
//! Decoding is deliberately forgiving: missing bytes and out-of-range
//! enum values fall back to documented defaults, because truncated or
//! lightly damaged dumps are the norm for 40-year-old media. Encoding is
//! strict; it only fails when the output buffer cannot hold a record.

pub mod enums;
pub mod envelope;
pub mod offsets;
pub mod patch;
pub mod system;
pub mod tone;
pub mod value;

pub use enums::{EgPolarity, KeyMode, LfoMode, LoopMode, SampleRate};
pub use envelope::Envelope;
pub use patch::PatchCommon;
pub use system::SystemParams;
pub use tone::Tone;

use thiserror::Error;

/// Errors that might occur encoding an S-330 record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum S330Error {
    /// The output buffer cannot hold the record
    #[error("The output buffer holds {actual} byte(s) where {needed} are required")]
    BufferTooSmall { needed: usize, actual: usize },
}

/// Read a byte at an offset, falling back to a default past the buffer end
pub(crate) fn byte_or(data: &[u8], offset: usize, default: u8) -> u8 {
    data.get(offset).copied().unwrap_or(default)
}

/// Read 3 bytes at an offset, zero-filled past the buffer end
pub(crate) fn triple_or_zero(data: &[u8], offset: usize) -> [u8; 3] {
    [
        byte_or(data, offset, 0),
        byte_or(data, offset + 1, 0),
        byte_or(data, offset + 2, 0),
    ]
}
