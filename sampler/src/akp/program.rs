//! The program file as a whole: header, global chunks, keygroups
//!
//! A program buffer is a fixed parade of chunks: the RIFF/APRG header, then
//! `prg `, `out `, `tune`, two `lfo `s and `mods`, then one `kgrp` per
//! keygroup. The order is a hardware contract; the S5000/S6000 reader walks
//! it positionally and rejects anything reordered.

use super::{
    chunk::{ChunkError, ChunkReader, ChunkWriter, Tag},
    global::{Lfo, Mods, Output, Tune},
    keygroup::Keygroup,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
};
use thiserror::Error;

/// The 12-byte file header: `RIFF`, a 32-bit length, `APRG`
///
/// Original hardware writes the RIFF length field as zero instead of the
/// actual payload size. That inaccuracy is part of the format now; files
/// with a "fixed" length field are fine to read, but we always write zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header;

impl Header {
    pub const RIFF: Tag = Tag(*b"RIFF");
    pub const APRG: Tag = Tag(*b"APRG");

    /// Bytes the header spans
    pub const LEN: usize = 12;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::RIFF)?;
        debug!("RIFF header declares {} byte(s)", frame.length());

        let offset = reader.position();
        let mut aprg = [0; 4];
        for byte in &mut aprg {
            *byte = reader.u8()?;
        }

        if aprg != *Self::APRG.bytes() {
            return Err(ChunkError::TagMismatch {
                offset,
                expected: Self::APRG,
                actual: Tag(aprg),
            });
        }

        Ok(Self)
    }

    pub fn write(writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        // The zero length is deliberate, see the type docs
        writer.begin(Self::RIFF, 0)?;
        for byte in *Self::APRG.bytes() {
            writer.u8(byte)?;
        }

        Ok(())
    }
}

/// The `prg ` chunk: program number and how many keygroups follow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramChunk {
    pub pad0: i8,
    pub program_number: i8,
    pub keygroup_count: i8,
    pub pad1: i8,
    pub pad2: i8,
    pub pad3: i8,
}

impl ProgramChunk {
    pub const TAG: Tag = Tag(*b"prg ");
    pub const LENGTH: u32 = 6;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        let program = Self {
            pad0: reader.i8()?,
            program_number: reader.i8()?,
            keygroup_count: reader.i8()?,
            pad1: reader.i8()?,
            pad2: reader.i8()?,
            pad3: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(program)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.program_number)?;
        writer.i8(self.keygroup_count)?;
        writer.i8(self.pad1)?;
        writer.i8(self.pad2)?;
        writer.i8(self.pad3)?;

        writer.end(&frame)
    }
}

/// The byte buffer a [`Program`] was parsed from, retained so that growing
/// the keygroup list can re-read keygroup records at their original
/// positions
#[derive(Debug, Clone)]
pub(crate) struct Source {
    pub(crate) bytes: Vec<u8>,
    pub(crate) first_keygroup_offset: usize,
}

/// A full in-memory representation of a sampler program
///
/// ```no_run
/// # use sampler::akp::Program;
/// // Load a program from a path on disk
/// let program = Program::from_path("BASS.AKP")?;
///
/// // ...and write it back out, byte-exact
/// program.to_path("BASS.AKP")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub program: ProgramChunk,
    pub output: Output,
    pub tune: Tune,
    pub lfo1: Lfo,
    pub lfo2: Lfo,
    pub mods: Mods,
    pub keygroups: Vec<Keygroup>,

    #[serde(skip)]
    pub(crate) source: Option<Source>,
}

impl Program {
    /// Bytes spanned by the header and the program-level chunks; the first
    /// keygroup always starts here
    pub const FIRST_KEYGROUP_OFFSET: usize = Header::LEN
        + (8 + ProgramChunk::LENGTH as usize)
        + (8 + Output::LENGTH as usize)
        + (8 + Tune::LENGTH as usize)
        + 2 * (8 + Lfo::LENGTH as usize)
        + (8 + Mods::LENGTH as usize);

    /// Construct a fresh single-keygroup program with factory defaults
    pub fn new() -> Self {
        Self {
            program: ProgramChunk {
                keygroup_count: 1,
                ..ProgramChunk::default()
            },
            output: Output::default(),
            tune: Tune::default(),
            lfo1: Lfo::default(),
            lfo2: Lfo::default(),
            mods: Mods::default(),
            keygroups: vec![Keygroup::default()],
            source: None,
        }
    }

    /// Parse a program from a fully-read byte buffer
    ///
    /// On any failure no partial program is returned; the buffer is either
    /// a valid program or it is nothing.
    pub fn parse(bytes: &[u8]) -> Result<Self, ProgramReadError> {
        let mut reader = ChunkReader::new(bytes);

        Header::parse(&mut reader)?;
        let program = ProgramChunk::parse(&mut reader)?;
        let output = Output::parse(&mut reader)?;
        let tune = Tune::parse(&mut reader)?;
        let lfo1 = Lfo::parse(&mut reader)?;
        let lfo2 = Lfo::parse(&mut reader)?;
        let mods = Mods::parse(&mut reader)?;

        let first_keygroup_offset = reader.position();
        let count = program.keygroup_count.max(0) as usize;
        debug!("program {} declares {count} keygroup(s)", program.program_number);

        let mut keygroups = Vec::with_capacity(count);
        for index in 0..count {
            let offset = reader.position();
            let keygroup =
                Keygroup::parse(&mut reader).map_err(|source| ProgramReadError::Keygroup {
                    index,
                    count,
                    offset,
                    source,
                })?;
            keygroups.push(keygroup);
        }

        Ok(Self {
            program,
            output,
            tune,
            lfo1,
            lfo2,
            mods,
            keygroups,
            source: Some(Source {
                bytes: bytes.to_vec(),
                first_keygroup_offset,
            }),
        })
    }

    /// Deserialize a program from an arbitrary I/O reader
    pub fn from_reader<R>(mut reader: R) -> Result<Self, FromReaderError>
    where
        R: Read,
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        Ok(Self::parse(&bytes)?)
    }

    /// Deserialize a program from a path on disk (.akp)
    pub fn from_path<P>(path: P) -> Result<Self, FromReaderError>
    where
        P: AsRef<Path>,
    {
        Self::from_reader(File::open(path)?)
    }

    /// The MIDI program number
    pub fn program_number(&self) -> i8 {
        self.program.program_number
    }

    /// The number of keygroups
    pub fn keygroup_count(&self) -> usize {
        self.keygroups.len()
    }

    /// Bytes a serialized form of this program spans
    pub fn byte_len(&self) -> usize {
        Self::FIRST_KEYGROUP_OFFSET + Keygroup::STRIDE * self.keygroups.len()
    }

    /// Serialize the program into a buffer at the given offset
    ///
    /// Chunks go out in fixed declaration order; the keygroup count byte is
    /// rewritten from the actual keygroup list, whatever the parsed count
    /// byte said. Returns the number of bytes written. If this fails, the
    /// buffer contents must not be trusted or persisted.
    pub fn write(&self, bytes: &mut [u8], offset: usize) -> Result<usize, ChunkError> {
        let mut writer = ChunkWriter::at(bytes, offset);

        Header::write(&mut writer)?;

        let program = ProgramChunk {
            keygroup_count: self.keygroups.len() as i8,
            ..self.program.clone()
        };
        program.write(&mut writer)?;

        self.output.write(&mut writer)?;
        self.tune.write(&mut writer)?;
        self.lfo1.write(&mut writer)?;
        self.lfo2.write(&mut writer)?;
        self.mods.write(&mut writer)?;

        for keygroup in &self.keygroups {
            keygroup.write(&mut writer)?;
        }

        Ok(writer.position() - offset)
    }

    /// Serialize the program to a fresh byte buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, ChunkError> {
        let mut bytes = vec![0; self.byte_len()];
        self.write(&mut bytes, 0)?;

        Ok(bytes)
    }

    /// Serialize the program to an arbitrary I/O writer
    pub fn to_writer<W>(&self, mut writer: W) -> Result<(), ToWriterError>
    where
        W: Write,
    {
        writer.write_all(&self.to_bytes()?)?;

        Ok(())
    }

    /// Serialize the program to a path on disk (.akp)
    pub fn to_path<P>(&self, path: P) -> Result<(), ToWriterError>
    where
        P: AsRef<Path>,
    {
        self.to_writer(File::create(path)?)
    }

    /// The JSON interchange form of the program
    ///
    /// Field names mirror the in-memory record fields directly; there is no
    /// separate interchange schema to keep in sync.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Build a program from its JSON interchange form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut program: Self = serde_json::from_str(json)?;
        program.program.keygroup_count = program.keygroups.len() as i8;

        Ok(program)
    }

    /// Overwrite this program's records from a JSON interchange document
    ///
    /// A direct field-for-field structural copy. The retained source buffer
    /// (used for keygroup growth) is kept as-is.
    pub fn copy_from_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let parsed = Self::from_json(json)?;

        self.program = parsed.program;
        self.output = parsed.output;
        self.tune = parsed.tune;
        self.lfo1 = parsed.lfo1;
        self.lfo2 = parsed.lfo2;
        self.mods = parsed.mods;
        self.keygroups = parsed.keygroups;

        Ok(())
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that might be returned from [`Program::parse()`]
#[derive(Debug, Error)]
pub enum ProgramReadError {
    /// One of the header or program-level chunks is broken
    #[error("Failed to parse the program-level chunks")]
    Chunk(#[from] ChunkError),

    /// A keygroup chunk is broken; carries which one, of how many, and
    /// where, so that a corrupt multi-keygroup file pinpoints itself
    #[error("Failed to parse keygroup {index} of {count} at offset {offset}: {source}")]
    Keygroup {
        index: usize,
        count: usize,
        offset: usize,
        source: ChunkError,
    },
}

/// Errors that might be returned from [`Program::from_reader()`]
#[derive(Debug, Error)]
pub enum FromReaderError {
    /// Any failure that has to do with I/O
    #[error("Something failed with I/O")]
    Io(#[from] io::Error),

    /// The bytes do not form a valid program
    #[error("Reading the program failed")]
    Read(#[from] ProgramReadError),
}

/// Errors that might be returned from [`Program::to_writer()`]
#[derive(Debug, Error)]
pub enum ToWriterError {
    /// Any failure that has to do with I/O
    #[error("Something failed with I/O")]
    Io(#[from] io::Error),

    /// The program could not be encoded
    #[error("Writing the program failed")]
    Write(#[from] ChunkError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::akp::keygroup::Zone;

    /// Build the byte image of a known-good factory bass program: one
    /// keygroup, zone 1 playing sample "WV 2"
    pub(crate) fn bass_fixture() -> Vec<u8> {
        let mut program = Program::new();
        program.keygroups[0].zones[0] = Zone {
            sample_name: "WV 2".to_string(),
            high_velocity: 127,
            level: 0,
            ..Zone::default()
        };

        program.to_bytes().unwrap()
    }

    #[test]
    fn header_round_trip() {
        let mut bytes = [0_u8; Header::LEN];
        Header::write(&mut ChunkWriter::new(&mut bytes)).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
        assert_eq!(&bytes[8..12], b"APRG");

        let mut reader = ChunkReader::new(&bytes);
        Header::parse(&mut reader).unwrap();
        assert_eq!(reader.position(), Header::LEN);
    }

    #[test]
    fn header_tolerates_nonzero_riff_length() {
        let mut bytes = [0_u8; Header::LEN];
        Header::write(&mut ChunkWriter::new(&mut bytes)).unwrap();
        bytes[4..8].copy_from_slice(&500_u32.to_le_bytes());

        assert!(Header::parse(&mut ChunkReader::new(&bytes)).is_ok());
    }

    #[test]
    fn header_rejects_wrong_aprg() {
        let mut bytes = [0_u8; Header::LEN];
        Header::write(&mut ChunkWriter::new(&mut bytes)).unwrap();
        bytes[8..12].copy_from_slice(b"APRX");

        assert!(matches!(
            Header::parse(&mut ChunkReader::new(&bytes)),
            Err(ChunkError::TagMismatch { offset: 8, .. })
        ));
    }

    #[test]
    fn bass_fixture_parses() {
        let bytes = bass_fixture();
        assert_eq!(bytes.len(), Program::FIRST_KEYGROUP_OFFSET + Keygroup::STRIDE);

        let program = Program::parse(&bytes).unwrap();
        assert_eq!(program.program_number(), 0);
        assert_eq!(program.keygroup_count(), 1);
        assert_eq!(program.output.loudness, 80);
        assert_eq!(program.tune.pitch_bend_up, 2);
        assert_eq!(program.keygroups[0].zones[0].sample_name, "WV 2");
    }

    #[test]
    fn bass_fixture_round_trips_byte_exact() {
        let bytes = bass_fixture();
        let program = Program::parse(&bytes).unwrap();

        let encoded = program.to_bytes().unwrap();
        assert_eq!(encoded, bytes);

        let again = Program::parse(&encoded).unwrap();
        assert_eq!(again.output, program.output);
        assert_eq!(again.tune, program.tune);
        assert_eq!(again.keygroups, program.keygroups);
    }

    #[test]
    fn keygroup_error_carries_context() {
        let mut bytes = bass_fixture();

        // Corrupt the kgrp tag of keygroup 0
        bytes[Program::FIRST_KEYGROUP_OFFSET] = b'!';

        let error = Program::parse(&bytes).unwrap_err();
        match &error {
            ProgramReadError::Keygroup {
                index,
                count,
                offset,
                source,
            } => {
                assert_eq!(*index, 0);
                assert_eq!(*count, 1);
                assert_eq!(*offset, Program::FIRST_KEYGROUP_OFFSET);
                assert!(matches!(source, ChunkError::TagMismatch { .. }));
            }
            other => panic!("expected a keygroup error, got {other:?}"),
        }

        let message = format!("{error}");
        assert!(message.starts_with("Failed to parse keygroup 0 of 1 at offset 164"));
    }

    #[test]
    fn truncated_file_fails() {
        let bytes = bass_fixture();
        assert!(Program::parse(&bytes[..bytes.len() - 10]).is_err());
    }

    #[test]
    fn write_rewrites_keygroup_count() {
        let bytes = bass_fixture();
        let mut program = Program::parse(&bytes).unwrap();

        // Make the stored count byte lie; the keygroup list wins on write
        program.program.keygroup_count = 17;
        let encoded = program.to_bytes().unwrap();

        let back = Program::parse(&encoded).unwrap();
        assert_eq!(back.keygroup_count(), 1);
    }

    #[test]
    fn json_round_trip() {
        let bytes = bass_fixture();
        let program = Program::parse(&bytes).unwrap();

        let json = program.to_json().unwrap();
        let back = Program::from_json(&json).unwrap();

        assert_eq!(back.output, program.output);
        assert_eq!(back.tune, program.tune);
        assert_eq!(back.mods, program.mods);
        assert_eq!(back.keygroups, program.keygroups);
        assert_eq!(back.to_bytes().unwrap(), program.to_bytes().unwrap());
    }

    #[test]
    fn copy_from_json_replaces_records() {
        let bytes = bass_fixture();
        let mut program = Program::parse(&bytes).unwrap();

        let mut other = Program::new();
        other.output.loudness = 60;
        other.keygroups[0].zones[1].sample_name = "SNARE".to_string();
        let json = other.to_json().unwrap();

        program.copy_from_json(&json).unwrap();
        assert_eq!(program.output.loudness, 60);
        assert_eq!(program.keygroups[0].zones[1].sample_name, "SNARE");

        // The retained source buffer survives the copy
        assert!(program.source.is_some());
    }
}
