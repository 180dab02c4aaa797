//! Program-level chunks: output, tuning, LFOs and the modulation matrix
//!
//! These sit between the file header and the first keygroup, always in the
//! same order. Every field is one signed byte; `padN` fields are byte
//! positions the hardware reserves but does not document. Pads are kept
//! from the last parse and written back untouched, so unknown firmware data
//! survives a round-trip.

use super::chunk::{ChunkError, ChunkReader, ChunkWriter, Tag};
use serde::{Deserialize, Serialize};

/// The `out ` chunk: master loudness and its modulation inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub pad0: i8,
    pub loudness: i8,
    pub amp_mod1: i8,
    pub amp_mod2: i8,
    pub pan_mod1: i8,
    pub pan_mod2: i8,
    pub pan_mod3: i8,
    pub velocity_sensitivity: i8,
}

impl Output {
    pub const TAG: Tag = Tag(*b"out ");
    pub const LENGTH: u32 = 8;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        let output = Self {
            pad0: reader.i8()?,
            loudness: reader.i8()?,
            amp_mod1: reader.i8()?,
            amp_mod2: reader.i8()?,
            pan_mod1: reader.i8()?,
            pan_mod2: reader.i8()?,
            pan_mod3: reader.i8()?,
            velocity_sensitivity: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(output)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.loudness)?;
        writer.i8(self.amp_mod1)?;
        writer.i8(self.amp_mod2)?;
        writer.i8(self.pan_mod1)?;
        writer.i8(self.pan_mod2)?;
        writer.i8(self.pan_mod3)?;
        writer.i8(self.velocity_sensitivity)?;

        writer.end(&frame)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self {
            pad0: 0,
            loudness: 80,
            amp_mod1: 0,
            amp_mod2: 0,
            pan_mod1: 0,
            pan_mod2: 0,
            pan_mod3: 0,
            velocity_sensitivity: 25,
        }
    }
}

/// The `tune` chunk: master and per-semitone tuning, pitch bend behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tune {
    pub pad0: i8,
    pub semitone_tune: i8,
    pub fine_tune: i8,
    /// Per-note detune, C through B
    pub detune: [i8; 12],
    pub pitch_bend_up: i8,
    pub pitch_bend_down: i8,
    pub bend_mode: i8,
    pub aftertouch: i8,
    pub pad1: i8,
    pub pad2: i8,
    pub pad3: i8,
    pub pad4: i8,
    pub pad5: i8,
}

impl Tune {
    pub const TAG: Tag = Tag(*b"tune");
    pub const LENGTH: u32 = 24;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        let pad0 = reader.i8()?;
        let semitone_tune = reader.i8()?;
        let fine_tune = reader.i8()?;

        let mut detune = [0; 12];
        for note in &mut detune {
            *note = reader.i8()?;
        }

        let tune = Self {
            pad0,
            semitone_tune,
            fine_tune,
            detune,
            pitch_bend_up: reader.i8()?,
            pitch_bend_down: reader.i8()?,
            bend_mode: reader.i8()?,
            aftertouch: reader.i8()?,
            pad1: reader.i8()?,
            pad2: reader.i8()?,
            pad3: reader.i8()?,
            pad4: reader.i8()?,
            pad5: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(tune)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.semitone_tune)?;
        writer.i8(self.fine_tune)?;
        for note in self.detune {
            writer.i8(note)?;
        }
        writer.i8(self.pitch_bend_up)?;
        writer.i8(self.pitch_bend_down)?;
        writer.i8(self.bend_mode)?;
        writer.i8(self.aftertouch)?;
        writer.i8(self.pad1)?;
        writer.i8(self.pad2)?;
        writer.i8(self.pad3)?;
        writer.i8(self.pad4)?;
        writer.i8(self.pad5)?;

        writer.end(&frame)
    }
}

impl Default for Tune {
    fn default() -> Self {
        Self {
            pad0: 0,
            semitone_tune: 0,
            fine_tune: 0,
            detune: [0; 12],
            pitch_bend_up: 2,
            pitch_bend_down: 2,
            bend_mode: 0,
            aftertouch: 0,
            pad1: 0,
            pad2: 0,
            pad3: 0,
            pad4: 0,
            pad5: 0,
        }
    }
}

/// An `lfo ` chunk; programs carry two, with the same wire layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lfo {
    pub pad0: i8,
    pub waveform: i8,
    pub rate: i8,
    pub delay: i8,
    pub depth: i8,
    /// MIDI-clock sync on LFO 1, retrigger on LFO 2
    pub sync: i8,
    pub pad1: i8,
    pub modwheel: i8,
    pub aftertouch: i8,
    pub rate_mod: i8,
    pub delay_mod: i8,
    pub depth_mod: i8,
    pub pad2: i8,
    pub pad3: i8,
}

impl Lfo {
    pub const TAG: Tag = Tag(*b"lfo ");
    pub const LENGTH: u32 = 14;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        let lfo = Self {
            pad0: reader.i8()?,
            waveform: reader.i8()?,
            rate: reader.i8()?,
            delay: reader.i8()?,
            depth: reader.i8()?,
            sync: reader.i8()?,
            pad1: reader.i8()?,
            modwheel: reader.i8()?,
            aftertouch: reader.i8()?,
            rate_mod: reader.i8()?,
            delay_mod: reader.i8()?,
            depth_mod: reader.i8()?,
            pad2: reader.i8()?,
            pad3: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(lfo)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.waveform)?;
        writer.i8(self.rate)?;
        writer.i8(self.delay)?;
        writer.i8(self.depth)?;
        writer.i8(self.sync)?;
        writer.i8(self.pad1)?;
        writer.i8(self.modwheel)?;
        writer.i8(self.aftertouch)?;
        writer.i8(self.rate_mod)?;
        writer.i8(self.delay_mod)?;
        writer.i8(self.depth_mod)?;
        writer.i8(self.pad2)?;
        writer.i8(self.pad3)?;

        writer.end(&frame)
    }
}

/// The `mods` chunk: source assignments for the modulation matrix
///
/// Eighteen destination slots, each stored as a pad byte followed by the
/// source selector. The slot order is the hardware's, not ours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mods {
    pub pad0: i8,
    pub pad1: i8,
    pub amp_mod1_source: i8,
    pub amp_mod2_source: i8,
    pub pan_mod1_source: i8,
    pub pan_mod2_source: i8,
    pub pan_mod3_source: i8,
    pub lfo1_rate_mod_source: i8,
    pub lfo1_delay_mod_source: i8,
    pub lfo1_depth_mod_source: i8,
    pub lfo2_rate_mod_source: i8,
    pub lfo2_delay_mod_source: i8,
    pub lfo2_depth_mod_source: i8,
    pub pitch_mod1_source: i8,
    pub pitch_mod2_source: i8,
    pub amp_mod_source: i8,
    pub filter_input1_source: i8,
    pub filter_input2_source: i8,
    pub filter_input3_source: i8,
    pub aux_env_depth_mod_source: i8,
    /// The pad byte preceding each slot, in slot order
    pub slot_pads: [i8; 18],
}

impl Mods {
    pub const TAG: Tag = Tag(*b"mods");
    pub const LENGTH: u32 = 38;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        let pad0 = reader.i8()?;
        let pad1 = reader.i8()?;

        let mut slot_pads = [0; 18];
        let mut sources = [0; 18];
        for slot in 0..18 {
            slot_pads[slot] = reader.i8()?;
            sources[slot] = reader.i8()?;
        }

        let mods = Self {
            pad0,
            pad1,
            amp_mod1_source: sources[0],
            amp_mod2_source: sources[1],
            pan_mod1_source: sources[2],
            pan_mod2_source: sources[3],
            pan_mod3_source: sources[4],
            lfo1_rate_mod_source: sources[5],
            lfo1_delay_mod_source: sources[6],
            lfo1_depth_mod_source: sources[7],
            lfo2_rate_mod_source: sources[8],
            lfo2_delay_mod_source: sources[9],
            lfo2_depth_mod_source: sources[10],
            pitch_mod1_source: sources[11],
            pitch_mod2_source: sources[12],
            amp_mod_source: sources[13],
            filter_input1_source: sources[14],
            filter_input2_source: sources[15],
            filter_input3_source: sources[16],
            aux_env_depth_mod_source: sources[17],
            slot_pads,
        };

        reader.end(&frame)?;
        Ok(mods)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.pad1)?;

        let sources = [
            self.amp_mod1_source,
            self.amp_mod2_source,
            self.pan_mod1_source,
            self.pan_mod2_source,
            self.pan_mod3_source,
            self.lfo1_rate_mod_source,
            self.lfo1_delay_mod_source,
            self.lfo1_depth_mod_source,
            self.lfo2_rate_mod_source,
            self.lfo2_delay_mod_source,
            self.lfo2_depth_mod_source,
            self.pitch_mod1_source,
            self.pitch_mod2_source,
            self.amp_mod_source,
            self.filter_input1_source,
            self.filter_input2_source,
            self.filter_input3_source,
            self.aux_env_depth_mod_source,
        ];
        for (pad, source) in self.slot_pads.iter().zip(sources) {
            writer.i8(*pad)?;
            writer.i8(source)?;
        }

        writer.end(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T, W, P>(value: &T, length: usize, write: W, parse: P) -> T
    where
        W: Fn(&T, &mut ChunkWriter) -> Result<(), ChunkError>,
        P: Fn(&mut ChunkReader) -> Result<T, ChunkError>,
    {
        let mut bytes = vec![0; length];
        let mut writer = ChunkWriter::new(&mut bytes);
        write(value, &mut writer).unwrap();
        assert_eq!(writer.position(), length);

        let mut reader = ChunkReader::new(&bytes);
        let back = parse(&mut reader).unwrap();
        assert_eq!(reader.position(), length);

        back
    }

    #[test]
    fn output_round_trip() {
        let output = Output {
            pad0: 3,
            loudness: 85,
            amp_mod1: -10,
            amp_mod2: 5,
            pan_mod1: 0,
            pan_mod2: -1,
            pan_mod3: 50,
            velocity_sensitivity: 32,
        };

        let back = round_trip(&output, 16, Output::write, Output::parse);
        assert_eq!(back, output);
    }

    #[test]
    fn tune_round_trip() {
        let tune = Tune {
            semitone_tune: -12,
            fine_tune: 30,
            detune: [1, -1, 2, -2, 3, -3, 4, -4, 5, -5, 6, -6],
            pitch_bend_up: 7,
            pitch_bend_down: 12,
            bend_mode: 1,
            aftertouch: -25,
            ..Tune::default()
        };

        let back = round_trip(&tune, 32, Tune::write, Tune::parse);
        assert_eq!(back, tune);
    }

    #[test]
    fn lfo_round_trip() {
        let lfo = Lfo {
            waveform: 2,
            rate: 43,
            delay: 12,
            depth: 100,
            sync: 1,
            modwheel: 15,
            aftertouch: -3,
            rate_mod: 9,
            delay_mod: -9,
            depth_mod: 1,
            ..Lfo::default()
        };

        let back = round_trip(&lfo, 22, Lfo::write, Lfo::parse);
        assert_eq!(back, lfo);
    }

    #[test]
    fn mods_round_trip() {
        let mods = Mods {
            amp_mod1_source: 6,
            pan_mod3_source: -2,
            pitch_mod1_source: 11,
            aux_env_depth_mod_source: 4,
            slot_pads: [7; 18],
            ..Mods::default()
        };

        let back = round_trip(&mods, 46, Mods::write, Mods::parse);
        assert_eq!(back, mods);
    }

    #[test]
    fn wrong_tag_aborts() {
        let mut bytes = vec![0; 16];
        let mut writer = ChunkWriter::new(&mut bytes);
        Output::default().write(&mut writer).unwrap();
        bytes[0] = b'X';

        let mut reader = ChunkReader::new(&bytes);
        assert!(matches!(
            Output::parse(&mut reader),
            Err(ChunkError::TagMismatch { offset: 0, .. })
        ));
    }

    #[test]
    fn defaults_match_factory_values() {
        assert_eq!(Output::default().loudness, 80);
        assert_eq!(Tune::default().pitch_bend_up, 2);
    }
}
