//! Chunk framing for Akai program files
//!
//! Every section of a program file is framed the same way: a 4-byte ASCII
//! tag, a little-endian 32-bit length, then exactly that many field bytes.
//! [`ChunkReader`] and [`ChunkWriter`] track an absolute position inside a
//! flat buffer so that errors can always say *where* a structure fell
//! apart, and so that nested chunks (program → keygroup → zone) can be
//! walked without any intermediate copies.

use std::fmt;
use thiserror::Error;

/// The number of bytes taken up by a chunk's tag + length framing
pub const HEADER_LEN: usize = 8;

/// A 4-character ASCII chunk tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Access the raw tag bytes
    pub fn bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for byte in self.0 {
            if (0x20..0x7F).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\x{byte:02X}")?;
            }
        }

        Ok(())
    }
}

/// Bookkeeping for one chunk currently being read or written
///
/// Returned by [`ChunkReader::begin()`]/[`ChunkWriter::begin()`] and handed
/// back to the matching `end()`, which enforces the declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    tag: Tag,
    length: u32,
    start: usize,
}

impl Frame {
    /// The chunk's tag
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The length declared in the chunk header (field bytes, excluding the
    /// 8 framing bytes)
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Total bytes the chunk spans, framing included
    pub fn total_len(&self) -> usize {
        HEADER_LEN + self.length as usize
    }

    fn body_start(&self) -> usize {
        self.start + HEADER_LEN
    }

    fn end(&self) -> usize {
        self.start + self.total_len()
    }
}

/// A position-tracked reader over a flat program buffer
pub struct ChunkReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ChunkReader<'a> {
    /// Start reading at the beginning of a buffer
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::at(bytes, 0)
    }

    /// Start reading at an arbitrary offset into a buffer
    pub fn at(bytes: &'a [u8], position: usize) -> Self {
        Self { bytes, position }
    }

    /// The current absolute offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Read a single unsigned byte
    pub fn u8(&mut self) -> Result<u8, ChunkError> {
        let byte = *self
            .bytes
            .get(self.position)
            .ok_or(ChunkError::UnexpectedEnd {
                offset: self.position,
                needed: 1,
            })?;
        self.position += 1;

        Ok(byte)
    }

    /// Read a single signed byte (the native field type of every chunk)
    pub fn i8(&mut self) -> Result<i8, ChunkError> {
        Ok(self.u8()? as i8)
    }

    /// Read a little-endian 32-bit length
    pub fn u32_le(&mut self) -> Result<u32, ChunkError> {
        let mut bytes = [0; 4];
        for byte in &mut bytes {
            *byte = self.u8()?;
        }

        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a chunk header and verify its tag byte-for-byte
    ///
    /// A mismatch is fatal; the file is structurally broken and nothing
    /// after this point can be trusted.
    pub fn begin(&mut self, expected: Tag) -> Result<Frame, ChunkError> {
        let start = self.position;

        let mut actual = [0; 4];
        for byte in &mut actual {
            *byte = self.u8()?;
        }

        if actual != *expected.bytes() {
            return Err(ChunkError::TagMismatch {
                offset: start,
                expected,
                actual: Tag(actual),
            });
        }

        let length = self.u32_le()?;

        Ok(Frame {
            tag: expected,
            length,
            start,
        })
    }

    /// Finish reading a chunk's fields
    ///
    /// Verifies that the fields stayed within the declared length, then
    /// skips ahead to the chunk's end so that trailing bytes a newer
    /// firmware may have appended are tolerated.
    pub fn end(&mut self, frame: &Frame) -> Result<(), ChunkError> {
        let consumed = self.position - frame.body_start();
        if consumed > frame.length() as usize {
            return Err(ChunkError::LengthExceeded {
                tag: frame.tag(),
                declared: frame.length(),
                actual: consumed,
            });
        }

        let end = frame.end();
        if end > self.bytes.len() {
            return Err(ChunkError::UnexpectedEnd {
                offset: self.bytes.len(),
                needed: end - self.bytes.len(),
            });
        }
        self.position = end;

        Ok(())
    }
}

/// A position-tracked writer over a flat program buffer
///
/// The writer only ever touches the buffer it is given. If any write fails,
/// the buffer contents are unspecified and must not be persisted.
pub struct ChunkWriter<'a> {
    bytes: &'a mut [u8],
    position: usize,
}

impl<'a> ChunkWriter<'a> {
    /// Start writing at the beginning of a buffer
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self::at(bytes, 0)
    }

    /// Start writing at an arbitrary offset into a buffer
    pub fn at(bytes: &'a mut [u8], position: usize) -> Self {
        Self { bytes, position }
    }

    /// The current absolute offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Write a single unsigned byte
    pub fn u8(&mut self, value: u8) -> Result<(), ChunkError> {
        let dest = self
            .bytes
            .get_mut(self.position)
            .ok_or(ChunkError::UnexpectedEnd {
                offset: self.position,
                needed: 1,
            })?;
        *dest = value;
        self.position += 1;

        Ok(())
    }

    /// Write a single signed byte
    pub fn i8(&mut self, value: i8) -> Result<(), ChunkError> {
        self.u8(value as u8)
    }

    /// Write a little-endian 32-bit length
    pub fn u32_le(&mut self, value: u32) -> Result<(), ChunkError> {
        for byte in value.to_le_bytes() {
            self.u8(byte)?;
        }

        Ok(())
    }

    /// Write a chunk header (tag + declared length)
    pub fn begin(&mut self, tag: Tag, length: u32) -> Result<Frame, ChunkError> {
        let start = self.position;

        for byte in *tag.bytes() {
            self.u8(byte)?;
        }
        self.u32_le(length)?;

        Ok(Frame { tag, length, start })
    }

    /// Finish writing a chunk's fields
    ///
    /// Writing more field bytes than the header declared is a structure
    /// definition bug, never a data problem, and always fatal. Writing
    /// fewer leaves the remainder zeroed (the caller hands us zero-filled
    /// buffers) and skips to the chunk's end.
    pub fn end(&mut self, frame: &Frame) -> Result<(), ChunkError> {
        let written = self.position - frame.body_start();
        if written > frame.length() as usize {
            return Err(ChunkError::LengthExceeded {
                tag: frame.tag(),
                declared: frame.length(),
                actual: written,
            });
        }

        let end = frame.end();
        if end > self.bytes.len() {
            return Err(ChunkError::UnexpectedEnd {
                offset: self.bytes.len(),
                needed: end - self.bytes.len(),
            });
        }
        self.position = end;

        Ok(())
    }
}

/// Errors that might occur walking the chunk structure of a program buffer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    /// The 4 tag bytes at a chunk boundary did not match the expected
    /// constant. Not recoverable; the buffer cannot be a valid program.
    #[error("Expected chunk tag '{expected}' at offset {offset}, found '{actual}'")]
    TagMismatch {
        /// Offset of the first tag byte
        offset: usize,
        /// The tag that should be here
        expected: Tag,
        /// The tag that actually is
        actual: Tag,
    },

    /// The buffer ended in the middle of a structure
    #[error("Unexpected end of buffer at offset {offset}, {needed} more byte(s) required")]
    UnexpectedEnd {
        /// Offset at which bytes ran out
        offset: usize,
        /// How many further bytes the structure required
        needed: usize,
    },

    /// A chunk's fields spanned more bytes than its header declared.
    /// Indicates a bug in a structure definition, not bad input data.
    #[error("Chunk '{tag}' declares {declared} byte(s) but its fields span {actual}")]
    LengthExceeded {
        /// Tag of the offending chunk
        tag: Tag,
        /// The length stored in the chunk header
        declared: u32,
        /// The bytes the fields actually covered
        actual: usize,
    },
}
