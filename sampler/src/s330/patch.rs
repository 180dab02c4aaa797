//! The patch common block

use super::{
    byte_or,
    enums::KeyMode,
    offsets::patch as offsets,
    value::{encode_signed, parse_signed, SIGNED_CENTER},
    S330Error,
};
use crate::name::Name;
use serde::{Deserialize, Serialize};

/// Settings shared by both layers of a patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchCommon {
    pub name: Name<{ offsets::NAME_LEN }>,
    pub bender_range: u8,
    pub aftertouch_sense: u8,
    pub key_mode: KeyMode,
    pub velocity_sw_threshold: u8,
    pub tone_number_1: u8,
    pub tone_number_2: u8,
    /// Keyboard shift in octaves, signed
    pub octave_shift: i8,
    pub output_level: u8,
    /// Layer detune, signed
    pub detune: i8,
    pub velocity_mix_ratio: u8,
    pub aftertouch_assign: u8,
    pub key_assign: u8,
    pub output_assign: u8,
}

impl PatchCommon {
    /// Bytes the block spans in parameter memory
    pub const SIZE: usize = offsets::SIZE;

    /// Parse the block from a flat buffer; missing bytes read as defaults
    pub fn parse(data: &[u8]) -> Self {
        let name_end = (offsets::NAME + offsets::NAME_LEN).min(data.len());
        let name_bytes = data.get(offsets::NAME..name_end).unwrap_or(&[]);

        Self {
            name: Name::from_bytes(name_bytes),
            bender_range: byte_or(data, offsets::BENDER_RANGE, 2),
            aftertouch_sense: byte_or(data, offsets::AFTERTOUCH_SENSE, 0),
            key_mode: KeyMode::from_byte(byte_or(data, offsets::KEY_MODE, 0)),
            velocity_sw_threshold: byte_or(data, offsets::VELOCITY_SW_THRESHOLD, 0),
            tone_number_1: byte_or(data, offsets::TONE_NUMBER_1, 0),
            tone_number_2: byte_or(data, offsets::TONE_NUMBER_2, 0),
            octave_shift: parse_signed(
                byte_or(data, offsets::OCTAVE_SHIFT, SIGNED_CENTER),
                SIGNED_CENTER,
            ),
            output_level: byte_or(data, offsets::OUTPUT_LEVEL, 100),
            detune: parse_signed(byte_or(data, offsets::DETUNE, SIGNED_CENTER), SIGNED_CENTER),
            velocity_mix_ratio: byte_or(data, offsets::VELOCITY_MIX_RATIO, 0),
            aftertouch_assign: byte_or(data, offsets::AFTERTOUCH_ASSIGN, 0),
            key_assign: byte_or(data, offsets::KEY_ASSIGN, 0),
            output_assign: byte_or(data, offsets::OUTPUT_ASSIGN, 0),
        }
    }

    /// Write the block into a flat buffer
    pub fn write(&self, data: &mut [u8]) -> Result<(), S330Error> {
        if data.len() < Self::SIZE {
            return Err(S330Error::BufferTooSmall {
                needed: Self::SIZE,
                actual: data.len(),
            });
        }

        data[offsets::NAME..offsets::NAME + offsets::NAME_LEN]
            .copy_from_slice(self.name.bytes());
        data[offsets::BENDER_RANGE] = self.bender_range;
        data[offsets::AFTERTOUCH_SENSE] = self.aftertouch_sense;
        data[offsets::KEY_MODE] = self.key_mode.as_byte();
        data[offsets::VELOCITY_SW_THRESHOLD] = self.velocity_sw_threshold;
        data[offsets::TONE_NUMBER_1] = self.tone_number_1;
        data[offsets::TONE_NUMBER_2] = self.tone_number_2;
        data[offsets::OCTAVE_SHIFT] = encode_signed(self.octave_shift, SIGNED_CENTER);
        data[offsets::OUTPUT_LEVEL] = self.output_level;
        data[offsets::DETUNE] = encode_signed(self.detune, SIGNED_CENTER);
        data[offsets::VELOCITY_MIX_RATIO] = self.velocity_mix_ratio;
        data[offsets::AFTERTOUCH_ASSIGN] = self.aftertouch_assign;
        data[offsets::KEY_ASSIGN] = self.key_assign;
        data[offsets::OUTPUT_ASSIGN] = self.output_assign;

        Ok(())
    }
}

impl Default for PatchCommon {
    /// The machine's power-on patch values
    fn default() -> Self {
        Self {
            name: Name::default(),
            bender_range: 2,
            aftertouch_sense: 0,
            key_mode: KeyMode::Normal,
            velocity_sw_threshold: 0,
            tone_number_1: 0,
            tone_number_2: 0,
            octave_shift: 0,
            output_level: 100,
            detune: 0,
            velocity_mix_ratio: 0,
            aftertouch_assign: 0,
            key_assign: 0,
            output_assign: 0,
        }
    }
}
