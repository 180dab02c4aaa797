//! Akai S5000/S6000 program file (.akp) handling
//!
//! This module contains functionality for reading, writing and editing
//! sampler program files. A program is a chunk-framed binary structure
//! (see [`chunk`]); the records here mirror the wire layout field for
//! field so that a parse → write cycle reproduces the input byte-exactly,
//! which is what the hardware's own reader demands.

pub mod chunk;
pub mod global;
pub mod keygroup;
pub mod program;
pub mod update;

pub use chunk::{ChunkError, ChunkReader, ChunkWriter, Tag};
pub use global::{Lfo, Mods, Output, Tune};
pub use keygroup::{AmpEnvelope, AuxEnvelope, Filter, FilterEnvelope, Keygroup, Kloc, Zone};
pub use program::{Header, Program, ProgramChunk, ProgramReadError};
pub use update::{ApplyError, KeygroupUpdate, ProgramUpdate, ZoneUpdate};
