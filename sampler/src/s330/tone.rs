//! The tone parameter block
//!
//! A tone is the S-330's playable unit: a pointer into wave memory plus
//! everything needed to voice it (TVA/TVF envelopes, LFO, filter). Wave
//! pointers are 21-bit values packed 7 bits per byte; the raw RAM origin
//! is a separate 24-bit full-width address. Keep the two apart.

use super::{
    byte_or,
    enums::{EgPolarity, LfoMode, LoopMode, SampleRate},
    envelope::Envelope,
    offsets::tone as offsets,
    triple_or_zero,
    value::{
        encode_21bit, encode_24bit, encode_signed, parse_21bit, parse_24bit, parse_level_curve,
        parse_signed, SIGNED_CENTER,
    },
    S330Error,
};
use crate::name::Name;
use serde::{Deserialize, Serialize};

/// One playable tone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub name: Name<{ offsets::NAME_LEN }>,
    pub output_assign: u8,
    pub source_tone: u8,
    pub orig_sub_tone: u8,
    pub sample_rate: SampleRate,
    pub orig_key_number: u8,
    pub wave_bank: u8,
    pub wave_segment_top: u8,
    pub wave_segment_length: u8,

    /// Wave pointers into the tone's segment, 21-bit
    pub start_point: u32,
    pub end_point: u32,
    pub loop_point: u32,

    /// Raw RAM origin of the wave data, 24-bit
    pub wave_address: u32,

    pub loop_mode: LoopMode,
    pub tva_lfo_depth: u8,
    pub lfo_rate: u8,
    pub lfo_sync: u8,
    pub lfo_delay: u8,
    pub lfo_mode: LfoMode,
    pub osc_lfo_depth: u8,
    pub pitch_follow: u8,
    pub bender_switch: u8,

    pub tva_env: Envelope,
    pub level: u8,
    /// Amplitude curve selector, 0..=5
    pub level_curve: u8,

    pub tvf_cutoff: u8,
    pub tvf_resonance: u8,
    pub tvf_key_follow: u8,
    pub tvf_lfo_depth: u8,
    pub tvf_eg_depth: u8,
    pub tvf_eg_polarity: EgPolarity,
    /// Filter curve selector, 0..=5
    pub tvf_level_curve: u8,
    pub tvf_key_rate_follow: u8,
    pub tvf_switch: u8,
    pub tvf_env: Envelope,

    /// Loop-region tuning in cents, signed
    pub loop_tune: i8,
    /// Fine tuning in cents, signed
    pub fine_tune: i8,
    pub recording_threshold: u8,
}

impl Tone {
    /// Bytes the block spans in parameter memory
    pub const SIZE: usize = offsets::SIZE;

    /// Parse the block from a flat buffer; missing bytes read as defaults
    pub fn parse(data: &[u8]) -> Self {
        let name_end = (offsets::NAME + offsets::NAME_LEN).min(data.len());
        let name_bytes = data.get(offsets::NAME..name_end).unwrap_or(&[]);

        Self {
            name: Name::from_bytes(name_bytes),
            output_assign: byte_or(data, offsets::OUTPUT_ASSIGN, 0),
            source_tone: byte_or(data, offsets::SOURCE_TONE, 0),
            orig_sub_tone: byte_or(data, offsets::ORIG_SUB_TONE, 0),
            sample_rate: SampleRate::from_byte(byte_or(data, offsets::SAMPLE_RATE, 0)),
            orig_key_number: byte_or(data, offsets::ORIG_KEY_NUMBER, 60),
            wave_bank: byte_or(data, offsets::WAVE_BANK, 0),
            wave_segment_top: byte_or(data, offsets::WAVE_SEGMENT_TOP, 0),
            wave_segment_length: byte_or(data, offsets::WAVE_SEGMENT_LENGTH, 0),
            start_point: parse_21bit(triple_or_zero(data, offsets::START_POINT)),
            end_point: parse_21bit(triple_or_zero(data, offsets::END_POINT)),
            loop_point: parse_21bit(triple_or_zero(data, offsets::LOOP_POINT)),
            wave_address: parse_24bit(triple_or_zero(data, offsets::WAVE_ADDRESS)),
            loop_mode: LoopMode::from_byte(byte_or(data, offsets::LOOP_MODE, 0)),
            tva_lfo_depth: byte_or(data, offsets::TVA_LFO_DEPTH, 0),
            lfo_rate: byte_or(data, offsets::LFO_RATE, 0),
            lfo_sync: byte_or(data, offsets::LFO_SYNC, 0),
            lfo_delay: byte_or(data, offsets::LFO_DELAY, 0),
            lfo_mode: LfoMode::from_byte(byte_or(data, offsets::LFO_MODE, 0)),
            osc_lfo_depth: byte_or(data, offsets::OSC_LFO_DEPTH, 0),
            pitch_follow: byte_or(data, offsets::PITCH_FOLLOW, 1),
            bender_switch: byte_or(data, offsets::BENDER_SWITCH, 1),
            tva_env: Envelope::parse(
                data,
                offsets::TVA_ENV,
                offsets::TVA_ENV_SUSTAIN_POINT,
                offsets::TVA_ENV_END_POINT,
            ),
            level: byte_or(data, offsets::LEVEL, 127),
            level_curve: parse_level_curve(byte_or(data, offsets::LEVEL_CURVE, 0) as i16),
            tvf_cutoff: byte_or(data, offsets::TVF_CUTOFF, 127),
            tvf_resonance: byte_or(data, offsets::TVF_RESONANCE, 0),
            tvf_key_follow: byte_or(data, offsets::TVF_KEY_FOLLOW, 0),
            tvf_lfo_depth: byte_or(data, offsets::TVF_LFO_DEPTH, 0),
            tvf_eg_depth: byte_or(data, offsets::TVF_EG_DEPTH, 0),
            tvf_eg_polarity: EgPolarity::from_byte(byte_or(data, offsets::TVF_EG_POLARITY, 0)),
            tvf_level_curve: parse_level_curve(byte_or(data, offsets::TVF_LEVEL_CURVE, 0) as i16),
            tvf_key_rate_follow: byte_or(data, offsets::TVF_KEY_RATE_FOLLOW, 0),
            tvf_switch: byte_or(data, offsets::TVF_SWITCH, 0),
            tvf_env: Envelope::parse(
                data,
                offsets::TVF_ENV,
                offsets::TVF_ENV_SUSTAIN_POINT,
                offsets::TVF_ENV_END_POINT,
            ),
            loop_tune: parse_signed(
                byte_or(data, offsets::LOOP_TUNE, SIGNED_CENTER),
                SIGNED_CENTER,
            ),
            fine_tune: parse_signed(
                byte_or(data, offsets::FINE_TUNE, SIGNED_CENTER),
                SIGNED_CENTER,
            ),
            recording_threshold: byte_or(data, offsets::RECORDING_THRESHOLD, 0),
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

        data[offsets::NAME..offsets::NAME + offsets::NAME_LEN].copy_from_slice(self.name.bytes());
        data[offsets::OUTPUT_ASSIGN] = self.output_assign;
        data[offsets::SOURCE_TONE] = self.source_tone;
        data[offsets::ORIG_SUB_TONE] = self.orig_sub_tone;
        data[offsets::SAMPLE_RATE] = self.sample_rate.as_byte();
        data[offsets::ORIG_KEY_NUMBER] = self.orig_key_number;
        data[offsets::WAVE_BANK] = self.wave_bank;
        data[offsets::WAVE_SEGMENT_TOP] = self.wave_segment_top;
        data[offsets::WAVE_SEGMENT_LENGTH] = self.wave_segment_length;

        data[offsets::START_POINT..offsets::START_POINT + 3]
            .copy_from_slice(&encode_21bit(self.start_point));
        data[offsets::END_POINT..offsets::END_POINT + 3]
            .copy_from_slice(&encode_21bit(self.end_point));
        data[offsets::LOOP_POINT..offsets::LOOP_POINT + 3]
            .copy_from_slice(&encode_21bit(self.loop_point));
        data[offsets::WAVE_ADDRESS..offsets::WAVE_ADDRESS + 3]
            .copy_from_slice(&encode_24bit(self.wave_address));

        data[offsets::LOOP_MODE] = self.loop_mode.as_byte();
        data[offsets::TVA_LFO_DEPTH] = self.tva_lfo_depth;
        data[offsets::LFO_RATE] = self.lfo_rate;
        data[offsets::LFO_SYNC] = self.lfo_sync;
        data[offsets::LFO_DELAY] = self.lfo_delay;
        data[offsets::LFO_MODE] = self.lfo_mode.as_byte();
        data[offsets::OSC_LFO_DEPTH] = self.osc_lfo_depth;
        data[offsets::PITCH_FOLLOW] = self.pitch_follow;
        data[offsets::BENDER_SWITCH] = self.bender_switch;

        self.tva_env.write(
            data,
            offsets::TVA_ENV,
            offsets::TVA_ENV_SUSTAIN_POINT,
            offsets::TVA_ENV_END_POINT,
        )?;
        data[offsets::LEVEL] = self.level;
        data[offsets::LEVEL_CURVE] = self.level_curve.min(5);

        data[offsets::TVF_CUTOFF] = self.tvf_cutoff;
        data[offsets::TVF_RESONANCE] = self.tvf_resonance;
        data[offsets::TVF_KEY_FOLLOW] = self.tvf_key_follow;
        data[offsets::TVF_LFO_DEPTH] = self.tvf_lfo_depth;
        data[offsets::TVF_EG_DEPTH] = self.tvf_eg_depth;
        data[offsets::TVF_EG_POLARITY] = self.tvf_eg_polarity.as_byte();
        data[offsets::TVF_LEVEL_CURVE] = self.tvf_level_curve.min(5);
        data[offsets::TVF_KEY_RATE_FOLLOW] = self.tvf_key_rate_follow;
        data[offsets::TVF_SWITCH] = self.tvf_switch;
        self.tvf_env.write(
            data,
            offsets::TVF_ENV,
            offsets::TVF_ENV_SUSTAIN_POINT,
            offsets::TVF_ENV_END_POINT,
        )?;

        data[offsets::LOOP_TUNE] = encode_signed(self.loop_tune, SIGNED_CENTER);
        data[offsets::FINE_TUNE] = encode_signed(self.fine_tune, SIGNED_CENTER);
        data[offsets::RECORDING_THRESHOLD] = self.recording_threshold;

        Ok(())
    }
}

impl Default for Tone {
    /// The machine's values for a freshly initialized tone
    fn default() -> Self {
        Self {
            name: Name::default(),
            output_assign: 0,
            source_tone: 0,
            orig_sub_tone: 0,
            sample_rate: SampleRate::Khz30,
            orig_key_number: 60,
            wave_bank: 0,
            wave_segment_top: 0,
            wave_segment_length: 0,
            start_point: 0,
            end_point: 0,
            loop_point: 0,
            wave_address: 0,
            loop_mode: LoopMode::Forward,
            tva_lfo_depth: 0,
            lfo_rate: 0,
            lfo_sync: 0,
            lfo_delay: 0,
            lfo_mode: LfoMode::Triangle,
            osc_lfo_depth: 0,
            pitch_follow: 1,
            bender_switch: 1,
            tva_env: Envelope::default(),
            level: 127,
            level_curve: 0,
            tvf_cutoff: 127,
            tvf_resonance: 0,
            tvf_key_follow: 0,
            tvf_lfo_depth: 0,
            tvf_eg_depth: 0,
            tvf_eg_polarity: EgPolarity::Normal,
            tvf_level_curve: 0,
            tvf_key_rate_follow: 0,
            tvf_switch: 0,
            tvf_env: Envelope::default(),
            loop_tune: 0,
            fine_tune: 0,
            recording_threshold: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_tone() -> Tone {
        Tone {
            name: Name::from_str("CELLO 2"),
            output_assign: 3,
            sample_rate: SampleRate::Khz15,
            orig_key_number: 48,
            wave_bank: 1,
            wave_segment_top: 4,
            wave_segment_length: 2,
            start_point: 0x1F_FFFF,
            end_point: 0x10_2030,
            loop_point: 0x00_4021,
            wave_address: 0xAB_CDEF,
            loop_mode: LoopMode::Alternate,
            lfo_rate: 80,
            lfo_mode: LfoMode::Random,
            tva_env: Envelope {
                levels: [0, 127, 110, 100, 90, 80, 70, 0],
                rates: [90, 70, 50, 40, 30, 20, 10, 5],
                sustain_point: 4,
                end_point: 7,
            },
            level: 115,
            level_curve: 3,
            tvf_cutoff: 90,
            tvf_resonance: 30,
            tvf_eg_polarity: EgPolarity::Reverse,
            tvf_level_curve: 5,
            tvf_env: Envelope {
                levels: [127; 8],
                rates: [1; 8],
                sustain_point: 1,
                end_point: 2,
            },
            loop_tune: -20,
            fine_tune: 33,
            recording_threshold: 12,
            ..Tone::default()
        }
    }

    #[test]
    fn round_trip() {
        let tone = busy_tone();

        let mut data = [0_u8; Tone::SIZE];
        tone.write(&mut data).unwrap();

        assert_eq!(Tone::parse(&data), tone);
    }

    #[test]
    fn wave_pointers_are_seven_bit_on_the_wire() {
        let tone = busy_tone();

        let mut data = [0_u8; Tone::SIZE];
        tone.write(&mut data).unwrap();

        for offset in [offsets::START_POINT, offsets::END_POINT, offsets::LOOP_POINT] {
            assert!(data[offset..offset + 3].iter().all(|byte| byte & 0x80 == 0));
        }

        // The RAM origin is full-width and may use bit 7
        assert_eq!(data[offsets::WAVE_ADDRESS], 0xAB);
    }

    #[test]
    fn empty_input_yields_defaults() {
        let tone = Tone::parse(&[]);

        assert_eq!(tone, Tone::default());
        assert_eq!(tone.level, 127);
        assert_eq!(tone.orig_key_number, 60);
        assert_eq!(tone.tva_env.rates, [1; 8]);
    }

    #[test]
    fn garbage_enum_bytes_fall_back() {
        let mut data = [0_u8; Tone::SIZE];
        busy_tone().write(&mut data).unwrap();

        data[offsets::LOOP_MODE] = 200;
        data[offsets::LFO_MODE] = 99;
        data[offsets::LEVEL_CURVE] = 44;

        let tone = Tone::parse(&data);
        assert_eq!(tone.loop_mode, LoopMode::Forward);
        assert_eq!(tone.lfo_mode, LfoMode::Triangle);
        assert_eq!(tone.level_curve, 5);
    }

    #[test]
    fn short_buffer_write_fails() {
        let mut data = [0_u8; 16];
        assert_eq!(
            Tone::default().write(&mut data),
            Err(S330Error::BufferTooSmall {
                needed: Tone::SIZE,
                actual: 16
            })
        );
    }

    #[test]
    fn envelope_rate_floor_applies_inside_a_tone() {
        let tone = Tone {
            tva_env: Envelope {
                rates: [0; 8],
                ..Envelope::default()
            },
            ..Tone::default()
        };

        let mut data = [0_u8; Tone::SIZE];
        tone.write(&mut data).unwrap();

        let back = Tone::parse(&data);
        assert!(back.tva_env.rates.iter().all(|rate| *rate >= 1));
    }
}
