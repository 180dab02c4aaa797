//! Keygroup chunks: key location, envelopes, filter and the four zones
//!
//! A `kgrp` chunk is a fixed-size container: one `kloc`, three `env `
//! chunks (amplitude, filter and auxiliary, sharing a tag but not a
//! layout), one `filt` and exactly four `zone` chunks. Every keygroup in a
//! program spans the same number of bytes, which is what makes synthesizing
//! extra keygroups by re-reading the source buffer at a fixed stride
//! possible at all.

use super::chunk::{ChunkError, ChunkReader, ChunkWriter, Tag, HEADER_LEN};
use serde::{Deserialize, Serialize};

/// The `kloc` chunk: where a keygroup sits on the keyboard and how it
/// routes into the effects section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kloc {
    pub pad0: i8,
    pub pad1: i8,
    pub pad2: i8,
    pub pad3: i8,
    pub low_note: i8,
    pub high_note: i8,
    pub semitone_tune: i8,
    pub fine_tune: i8,
    pub override_fx: i8,
    pub fx_send_level: i8,
    pub pitch_mod1: i8,
    pub pitch_mod2: i8,
    pub amp_mod: i8,
    pub zone_xfade: i8,
    pub mute_group: i8,
    pub pad4: i8,
}

impl Kloc {
    pub const TAG: Tag = Tag(*b"kloc");
    pub const LENGTH: u32 = 16;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        let kloc = Self {
            pad0: reader.i8()?,
            pad1: reader.i8()?,
            pad2: reader.i8()?,
            pad3: reader.i8()?,
            low_note: reader.i8()?,
            high_note: reader.i8()?,
            semitone_tune: reader.i8()?,
            fine_tune: reader.i8()?,
            override_fx: reader.i8()?,
            fx_send_level: reader.i8()?,
            pitch_mod1: reader.i8()?,
            pitch_mod2: reader.i8()?,
            amp_mod: reader.i8()?,
            zone_xfade: reader.i8()?,
            mute_group: reader.i8()?,
            pad4: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(kloc)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.pad1)?;
        writer.i8(self.pad2)?;
        writer.i8(self.pad3)?;
        writer.i8(self.low_note)?;
        writer.i8(self.high_note)?;
        writer.i8(self.semitone_tune)?;
        writer.i8(self.fine_tune)?;
        writer.i8(self.override_fx)?;
        writer.i8(self.fx_send_level)?;
        writer.i8(self.pitch_mod1)?;
        writer.i8(self.pitch_mod2)?;
        writer.i8(self.amp_mod)?;
        writer.i8(self.zone_xfade)?;
        writer.i8(self.mute_group)?;
        writer.i8(self.pad4)?;

        writer.end(&frame)
    }
}

impl Default for Kloc {
    fn default() -> Self {
        Self {
            pad0: 0,
            pad1: 0,
            pad2: 0,
            pad3: 0,
            low_note: 21,
            high_note: 127,
            semitone_tune: 0,
            fine_tune: 0,
            override_fx: 0,
            fx_send_level: 0,
            pitch_mod1: 0,
            pitch_mod2: 0,
            amp_mod: 0,
            zone_xfade: 0,
            mute_group: 0,
            pad4: 0,
        }
    }
}

/// The amplitude `env ` chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmpEnvelope {
    pub pad0: i8,
    pub attack: i8,
    pub pad1: i8,
    pub decay: i8,
    pub release: i8,
    pub pad2: i8,
    pub pad3: i8,
    pub sustain: i8,
    pub pad4: i8,
    pub velocity_to_attack: i8,
    pub pad5: i8,
    pub keyscale: i8,
    pub pad6: i8,
    pub on_velocity_to_release: i8,
    pub off_velocity_to_release: i8,
    pub pad7: i8,
    pub pad8: i8,
    pub pad9: i8,
}

/// All three envelope flavours share the `env ` tag and byte budget; only
/// the field layout inside differs.
pub const ENVELOPE_TAG: Tag = Tag(*b"env ");
pub const ENVELOPE_LENGTH: u32 = 18;

impl AmpEnvelope {
    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(ENVELOPE_TAG)?;

        let envelope = Self {
            pad0: reader.i8()?,
            attack: reader.i8()?,
            pad1: reader.i8()?,
            decay: reader.i8()?,
            release: reader.i8()?,
            pad2: reader.i8()?,
            pad3: reader.i8()?,
            sustain: reader.i8()?,
            pad4: reader.i8()?,
            velocity_to_attack: reader.i8()?,
            pad5: reader.i8()?,
            keyscale: reader.i8()?,
            pad6: reader.i8()?,
            on_velocity_to_release: reader.i8()?,
            off_velocity_to_release: reader.i8()?,
            pad7: reader.i8()?,
            pad8: reader.i8()?,
            pad9: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(envelope)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(ENVELOPE_TAG, ENVELOPE_LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.attack)?;
        writer.i8(self.pad1)?;
        writer.i8(self.decay)?;
        writer.i8(self.release)?;
        writer.i8(self.pad2)?;
        writer.i8(self.pad3)?;
        writer.i8(self.sustain)?;
        writer.i8(self.pad4)?;
        writer.i8(self.velocity_to_attack)?;
        writer.i8(self.pad5)?;
        writer.i8(self.keyscale)?;
        writer.i8(self.pad6)?;
        writer.i8(self.on_velocity_to_release)?;
        writer.i8(self.off_velocity_to_release)?;
        writer.i8(self.pad7)?;
        writer.i8(self.pad8)?;
        writer.i8(self.pad9)?;

        writer.end(&frame)
    }
}

impl Default for AmpEnvelope {
    fn default() -> Self {
        Self {
            pad0: 0,
            attack: 0,
            pad1: 0,
            decay: 50,
            release: 15,
            pad2: 0,
            pad3: 0,
            sustain: 100,
            pad4: 0,
            velocity_to_attack: 0,
            pad5: 0,
            keyscale: 0,
            pad6: 0,
            on_velocity_to_release: 0,
            off_velocity_to_release: 0,
            pad7: 0,
            pad8: 0,
            pad9: 0,
        }
    }
}

/// The filter `env ` chunk; same tag as [`AmpEnvelope`], different layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEnvelope {
    pub pad0: i8,
    pub attack: i8,
    pub pad1: i8,
    pub decay: i8,
    pub release: i8,
    pub pad2: i8,
    pub pad3: i8,
    pub sustain: i8,
    pub pad4: i8,
    pub depth: i8,
    pub pad5: i8,
    pub velocity_to_attack: i8,
    pub keyscale: i8,
    pub pad6: i8,
    pub on_velocity_to_release: i8,
    pub off_velocity_to_release: i8,
    pub pad7: i8,
    pub pad8: i8,
}

impl FilterEnvelope {
    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(ENVELOPE_TAG)?;

        let envelope = Self {
            pad0: reader.i8()?,
            attack: reader.i8()?,
            pad1: reader.i8()?,
            decay: reader.i8()?,
            release: reader.i8()?,
            pad2: reader.i8()?,
            pad3: reader.i8()?,
            sustain: reader.i8()?,
            pad4: reader.i8()?,
            depth: reader.i8()?,
            pad5: reader.i8()?,
            velocity_to_attack: reader.i8()?,
            keyscale: reader.i8()?,
            pad6: reader.i8()?,
            on_velocity_to_release: reader.i8()?,
            off_velocity_to_release: reader.i8()?,
            pad7: reader.i8()?,
            pad8: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(envelope)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(ENVELOPE_TAG, ENVELOPE_LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.attack)?;
        writer.i8(self.pad1)?;
        writer.i8(self.decay)?;
        writer.i8(self.release)?;
        writer.i8(self.pad2)?;
        writer.i8(self.pad3)?;
        writer.i8(self.sustain)?;
        writer.i8(self.pad4)?;
        writer.i8(self.depth)?;
        writer.i8(self.pad5)?;
        writer.i8(self.velocity_to_attack)?;
        writer.i8(self.keyscale)?;
        writer.i8(self.pad6)?;
        writer.i8(self.on_velocity_to_release)?;
        writer.i8(self.off_velocity_to_release)?;
        writer.i8(self.pad7)?;
        writer.i8(self.pad8)?;

        writer.end(&frame)
    }
}

impl Default for FilterEnvelope {
    fn default() -> Self {
        Self {
            pad0: 0,
            attack: 0,
            pad1: 0,
            decay: 50,
            release: 15,
            pad2: 0,
            pad3: 0,
            sustain: 100,
            pad4: 0,
            depth: 0,
            pad5: 0,
            velocity_to_attack: 0,
            keyscale: 0,
            pad6: 0,
            on_velocity_to_release: 0,
            off_velocity_to_release: 0,
            pad7: 0,
            pad8: 0,
        }
    }
}

/// The auxiliary `env ` chunk, a four-rate/four-level general purpose
/// envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxEnvelope {
    pub pad0: i8,
    pub rate1: i8,
    pub pad1: i8,
    pub rate2: i8,
    pub rate3: i8,
    pub pad2: i8,
    pub rate4: i8,
    pub pad3: i8,
    pub level1: i8,
    pub level2: i8,
    pub pad4: i8,
    pub level3: i8,
    pub level4: i8,
    pub pad5: i8,
    pub pad6: i8,
    pub pad7: i8,
    pub pad8: i8,
    pub pad9: i8,
}

impl AuxEnvelope {
    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(ENVELOPE_TAG)?;

        let envelope = Self {
            pad0: reader.i8()?,
            rate1: reader.i8()?,
            pad1: reader.i8()?,
            rate2: reader.i8()?,
            rate3: reader.i8()?,
            pad2: reader.i8()?,
            rate4: reader.i8()?,
            pad3: reader.i8()?,
            level1: reader.i8()?,
            level2: reader.i8()?,
            pad4: reader.i8()?,
            level3: reader.i8()?,
            level4: reader.i8()?,
            pad5: reader.i8()?,
            pad6: reader.i8()?,
            pad7: reader.i8()?,
            pad8: reader.i8()?,
            pad9: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(envelope)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(ENVELOPE_TAG, ENVELOPE_LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.rate1)?;
        writer.i8(self.pad1)?;
        writer.i8(self.rate2)?;
        writer.i8(self.rate3)?;
        writer.i8(self.pad2)?;
        writer.i8(self.rate4)?;
        writer.i8(self.pad3)?;
        writer.i8(self.level1)?;
        writer.i8(self.level2)?;
        writer.i8(self.pad4)?;
        writer.i8(self.level3)?;
        writer.i8(self.level4)?;
        writer.i8(self.pad5)?;
        writer.i8(self.pad6)?;
        writer.i8(self.pad7)?;
        writer.i8(self.pad8)?;
        writer.i8(self.pad9)?;

        writer.end(&frame)
    }
}

impl Default for AuxEnvelope {
    fn default() -> Self {
        Self {
            pad0: 0,
            rate1: 0,
            pad1: 0,
            rate2: 50,
            rate3: 50,
            pad2: 0,
            rate4: 15,
            pad3: 0,
            level1: 100,
            level2: 100,
            pad4: 0,
            level3: 100,
            level4: 0,
            pad5: 0,
            pad6: 0,
            pad7: 0,
            pad8: 0,
            pad9: 0,
        }
    }
}

/// The `filt` chunk: per-keygroup filter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub pad0: i8,
    pub mode: i8,
    pub cutoff: i8,
    pub resonance: i8,
    pub keyboard_track: i8,
    pub mod_input1: i8,
    pub mod_input2: i8,
    pub mod_input3: i8,
    pub headroom: i8,
    pub pad1: i8,
}

impl Filter {
    pub const TAG: Tag = Tag(*b"filt");
    pub const LENGTH: u32 = 10;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        let filter = Self {
            pad0: reader.i8()?,
            mode: reader.i8()?,
            cutoff: reader.i8()?,
            resonance: reader.i8()?,
            keyboard_track: reader.i8()?,
            mod_input1: reader.i8()?,
            mod_input2: reader.i8()?,
            mod_input3: reader.i8()?,
            headroom: reader.i8()?,
            pad1: reader.i8()?,
        };

        reader.end(&frame)?;
        Ok(filter)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        writer.i8(self.pad0)?;
        writer.i8(self.mode)?;
        writer.i8(self.cutoff)?;
        writer.i8(self.resonance)?;
        writer.i8(self.keyboard_track)?;
        writer.i8(self.mod_input1)?;
        writer.i8(self.mod_input2)?;
        writer.i8(self.mod_input3)?;
        writer.i8(self.headroom)?;
        writer.i8(self.pad1)?;

        writer.end(&frame)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            pad0: 0,
            mode: 0,
            cutoff: 100,
            resonance: 0,
            keyboard_track: 0,
            mod_input1: 0,
            mod_input2: 0,
            mod_input3: 0,
            headroom: 0,
            pad1: 0,
        }
    }
}

/// A `zone` chunk: one of the four velocity/round-robin sample layers of a
/// keygroup
///
/// The sample name occupies 20 single-byte character slots plus a length
/// byte. The zone's pad bytes are the one place where stale parse data must
/// NOT round-trip: the hardware requires its undocumented zone positions to
/// read zero, so they are dropped on parse and written as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub sample_name: String,
    pub low_velocity: i8,
    pub high_velocity: i8,
    pub fine_tune: i8,
    pub semitone_tune: i8,
    pub filter: i8,
    pub pan_balance: i8,
    pub playback: i8,
    pub output: i8,
    pub level: i8,
    pub keyboard_track: i8,
    pub velocity_to_start_lsb: i8,
    pub velocity_to_start_msb: i8,
}

impl Zone {
    pub const TAG: Tag = Tag(*b"zone");
    pub const LENGTH: u32 = 48;

    /// Character slots reserved for the sample name
    pub const NAME_LEN: usize = 20;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        reader.i8()?; // pad0
        let name_length = reader.u8()? as usize;

        let mut name_bytes = [0_u8; Self::NAME_LEN];
        for byte in &mut name_bytes {
            *byte = reader.u8()?;
        }
        let sample_name = name_bytes
            .iter()
            .take(name_length.min(Self::NAME_LEN))
            .map(|byte| (byte & 0x7F) as char)
            .collect();

        for _ in 0..12 {
            reader.i8()?; // pad1..pad12
        }

        let zone = Self {
            sample_name,
            low_velocity: reader.i8()?,
            high_velocity: reader.i8()?,
            fine_tune: reader.i8()?,
            semitone_tune: reader.i8()?,
            filter: reader.i8()?,
            pan_balance: reader.i8()?,
            playback: reader.i8()?,
            output: reader.i8()?,
            level: reader.i8()?,
            keyboard_track: reader.i8()?,
            velocity_to_start_lsb: reader.i8()?,
            velocity_to_start_msb: reader.i8()?,
        };

        reader.i8()?; // pad13
        reader.i8()?; // pad14

        reader.end(&frame)?;
        Ok(zone)
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        writer.u8(0)?; // pad0

        let name_bytes: Vec<u8> = self
            .sample_name
            .chars()
            .take(Self::NAME_LEN)
            .map(|char| if char.is_ascii() { char as u8 } else { b'?' })
            .collect();
        writer.u8(name_bytes.len() as u8)?;
        for slot in 0..Self::NAME_LEN {
            writer.u8(name_bytes.get(slot).copied().unwrap_or(0))?;
        }

        for _ in 0..12 {
            writer.u8(0)?; // pad1..pad12
        }

        writer.i8(self.low_velocity)?;
        writer.i8(self.high_velocity)?;
        writer.i8(self.fine_tune)?;
        writer.i8(self.semitone_tune)?;
        writer.i8(self.filter)?;
        writer.i8(self.pan_balance)?;
        writer.i8(self.playback)?;
        writer.i8(self.output)?;
        writer.i8(self.level)?;
        writer.i8(self.keyboard_track)?;
        writer.i8(self.velocity_to_start_lsb)?;
        writer.i8(self.velocity_to_start_msb)?;

        writer.u8(0)?; // pad13
        writer.u8(0)?; // pad14

        writer.end(&frame)
    }
}

/// A `kgrp` chunk: the complete per-keygroup record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keygroup {
    pub kloc: Kloc,
    pub amp_envelope: AmpEnvelope,
    pub filter_envelope: FilterEnvelope,
    pub aux_envelope: AuxEnvelope,
    pub filter: Filter,
    pub zones: [Zone; 4],
}

impl Keygroup {
    pub const TAG: Tag = Tag(*b"kgrp");
    pub const LENGTH: u32 = 344;

    /// Bytes one keygroup spans in a program file, framing included.
    /// Every keygroup has exactly this stride.
    pub const STRIDE: usize = HEADER_LEN + Self::LENGTH as usize;

    pub fn parse(reader: &mut ChunkReader) -> Result<Self, ChunkError> {
        let frame = reader.begin(Self::TAG)?;

        let kloc = Kloc::parse(reader)?;
        let amp_envelope = AmpEnvelope::parse(reader)?;
        let filter_envelope = FilterEnvelope::parse(reader)?;
        let aux_envelope = AuxEnvelope::parse(reader)?;
        let filter = Filter::parse(reader)?;

        let zones = [
            Zone::parse(reader)?,
            Zone::parse(reader)?,
            Zone::parse(reader)?,
            Zone::parse(reader)?,
        ];

        reader.end(&frame)?;

        Ok(Self {
            kloc,
            amp_envelope,
            filter_envelope,
            aux_envelope,
            filter,
            zones,
        })
    }

    pub fn write(&self, writer: &mut ChunkWriter) -> Result<(), ChunkError> {
        let frame = writer.begin(Self::TAG, Self::LENGTH)?;

        self.kloc.write(writer)?;
        self.amp_envelope.write(writer)?;
        self.filter_envelope.write(writer)?;
        self.aux_envelope.write(writer)?;
        self.filter.write(writer)?;
        for zone in &self.zones {
            zone.write(writer)?;
        }

        writer.end(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kloc_round_trip() {
        let kloc = Kloc {
            pad1: 9,
            low_note: 36,
            high_note: 60,
            semitone_tune: -2,
            fine_tune: 14,
            override_fx: 1,
            fx_send_level: 90,
            zone_xfade: 1,
            mute_group: 3,
            ..Kloc::default()
        };

        let mut bytes = [0_u8; 24];
        let mut writer = ChunkWriter::new(&mut bytes);
        kloc.write(&mut writer).unwrap();

        let mut reader = ChunkReader::new(&bytes);
        assert_eq!(Kloc::parse(&mut reader).unwrap(), kloc);
    }

    #[test]
    fn envelope_round_trips() {
        let mut bytes = [0_u8; 26];

        let amp = AmpEnvelope {
            attack: 12,
            decay: 34,
            release: 56,
            sustain: 78,
            pad7: -1,
            ..AmpEnvelope::default()
        };
        amp.write(&mut ChunkWriter::new(&mut bytes)).unwrap();
        assert_eq!(AmpEnvelope::parse(&mut ChunkReader::new(&bytes)).unwrap(), amp);

        let filter = FilterEnvelope {
            attack: 1,
            depth: -30,
            keyscale: 11,
            ..FilterEnvelope::default()
        };
        filter.write(&mut ChunkWriter::new(&mut bytes)).unwrap();
        assert_eq!(
            FilterEnvelope::parse(&mut ChunkReader::new(&bytes)).unwrap(),
            filter
        );

        let aux = AuxEnvelope {
            rate1: 5,
            rate4: 99,
            level1: -128,
            level4: 127,
            ..AuxEnvelope::default()
        };
        aux.write(&mut ChunkWriter::new(&mut bytes)).unwrap();
        assert_eq!(AuxEnvelope::parse(&mut ChunkReader::new(&bytes)).unwrap(), aux);
    }

    #[test]
    fn filter_round_trip() {
        let filter = Filter {
            mode: 2,
            cutoff: 64,
            resonance: 12,
            keyboard_track: 1,
            headroom: 3,
            ..Filter::default()
        };

        let mut bytes = [0_u8; 18];
        filter.write(&mut ChunkWriter::new(&mut bytes)).unwrap();
        assert_eq!(Filter::parse(&mut ChunkReader::new(&bytes)).unwrap(), filter);
    }

    #[test]
    fn zone_round_trip() {
        let zone = Zone {
            sample_name: "WV 2".to_string(),
            low_velocity: 0,
            high_velocity: 127,
            fine_tune: -5,
            semitone_tune: 12,
            pan_balance: -20,
            playback: 1,
            level: 100,
            ..Zone::default()
        };

        let mut bytes = [0_u8; 56];
        zone.write(&mut ChunkWriter::new(&mut bytes)).unwrap();
        assert_eq!(Zone::parse(&mut ChunkReader::new(&bytes)).unwrap(), zone);
    }

    #[test]
    fn zone_pads_are_zeroed_on_write() {
        let zone = Zone {
            sample_name: "PAD".to_string(),
            ..Zone::default()
        };

        let mut bytes = [0xEE_u8; 56];
        zone.write(&mut ChunkWriter::new(&mut bytes)).unwrap();

        // pad0, the 12 mid pads and the 2 trailing pads must all be zero
        assert_eq!(bytes[8], 0);
        assert!(bytes[30..42].iter().all(|byte| *byte == 0));
        assert!(bytes[54..56].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn zone_name_truncates_to_twenty_chars() {
        let zone = Zone {
            sample_name: "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
            ..Zone::default()
        };

        let mut bytes = [0_u8; 56];
        zone.write(&mut ChunkWriter::new(&mut bytes)).unwrap();

        let back = Zone::parse(&mut ChunkReader::new(&bytes)).unwrap();
        assert_eq!(back.sample_name, "ABCDEFGHIJKLMNOPQRST");
    }

    #[test]
    fn keygroup_round_trip() {
        let mut keygroup = Keygroup::default();
        keygroup.kloc.low_note = 48;
        keygroup.kloc.high_note = 72;
        keygroup.amp_envelope.attack = 7;
        keygroup.filter.cutoff = 42;
        keygroup.zones[0].sample_name = "KICK".to_string();
        keygroup.zones[3].high_velocity = 127;

        let mut bytes = vec![0_u8; Keygroup::STRIDE];
        let mut writer = ChunkWriter::new(&mut bytes);
        keygroup.write(&mut writer).unwrap();
        assert_eq!(writer.position(), Keygroup::STRIDE);

        let mut reader = ChunkReader::new(&bytes);
        assert_eq!(Keygroup::parse(&mut reader).unwrap(), keygroup);
        assert_eq!(reader.position(), Keygroup::STRIDE);
    }

    #[test]
    fn corrupt_inner_tag_reports_offset() {
        let mut bytes = vec![0_u8; Keygroup::STRIDE];
        Keygroup::default()
            .write(&mut ChunkWriter::new(&mut bytes))
            .unwrap();

        // Corrupt the kloc tag, which sits just past the kgrp framing
        bytes[HEADER_LEN] = b'Q';

        let mut reader = ChunkReader::new(&bytes);
        assert!(matches!(
            Keygroup::parse(&mut reader),
            Err(ChunkError::TagMismatch {
                offset: HEADER_LEN,
                ..
            })
        ));
    }
}
