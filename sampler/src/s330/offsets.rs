//! Structure-relative byte offsets of the S-330 parameter records
//!
//! These mirror the machine's parameter memory map. They are the single
//! source of truth for where a field lives; the record codecs never use a
//! bare numeric offset.

/// System parameter block
pub mod system {
    pub const MASTER_TUNE: usize = 0x00; // signed, center 64
    pub const MIDI_RX_CHANNEL: usize = 0x01;
    pub const MIDI_TX_CHANNEL: usize = 0x02;
    pub const FUNCTION_SELECT: usize = 0x03;
    pub const VOICE_ASSIGN: usize = 0x04;
    pub const OUTPUT_MODE: usize = 0x05;

    /// Bytes the block spans, reserved tail included
    pub const SIZE: usize = 0x10;
}

/// Patch common block
pub mod patch {
    pub const NAME: usize = 0x00;
    pub const NAME_LEN: usize = 12;
    pub const BENDER_RANGE: usize = 0x0C;
    pub const AFTERTOUCH_SENSE: usize = 0x0D;
    pub const KEY_MODE: usize = 0x0E;
    pub const VELOCITY_SW_THRESHOLD: usize = 0x0F;
    pub const TONE_NUMBER_1: usize = 0x10;
    pub const TONE_NUMBER_2: usize = 0x11;
    pub const OCTAVE_SHIFT: usize = 0x12; // signed, center 64
    pub const OUTPUT_LEVEL: usize = 0x13;
    pub const DETUNE: usize = 0x14; // signed, center 64
    pub const VELOCITY_MIX_RATIO: usize = 0x15;
    pub const AFTERTOUCH_ASSIGN: usize = 0x16;
    pub const KEY_ASSIGN: usize = 0x17;
    pub const OUTPUT_ASSIGN: usize = 0x18;

    pub const SIZE: usize = 0x20;
}

/// Tone parameter block
pub mod tone {
    pub const NAME: usize = 0x00;
    pub const NAME_LEN: usize = 8;
    pub const OUTPUT_ASSIGN: usize = 0x08;
    pub const SOURCE_TONE: usize = 0x09;
    pub const ORIG_SUB_TONE: usize = 0x0A;
    pub const SAMPLE_RATE: usize = 0x0B;
    pub const ORIG_KEY_NUMBER: usize = 0x0C;
    pub const WAVE_BANK: usize = 0x0D;
    pub const WAVE_SEGMENT_TOP: usize = 0x0E;
    pub const WAVE_SEGMENT_LENGTH: usize = 0x0F;

    // Wave pointers, 21-bit (7 bits per byte)
    pub const START_POINT: usize = 0x10;
    pub const END_POINT: usize = 0x13;
    pub const LOOP_POINT: usize = 0x16;

    // Raw RAM origin, 24-bit (full-width bytes)
    pub const WAVE_ADDRESS: usize = 0x19;

    pub const LOOP_MODE: usize = 0x1C;
    pub const TVA_LFO_DEPTH: usize = 0x1D;
    pub const LFO_RATE: usize = 0x1E;
    pub const LFO_SYNC: usize = 0x1F;
    pub const LFO_DELAY: usize = 0x20;
    pub const LFO_MODE: usize = 0x21;
    pub const OSC_LFO_DEPTH: usize = 0x22;
    pub const PITCH_FOLLOW: usize = 0x23;
    pub const BENDER_SWITCH: usize = 0x24;

    pub const TVA_ENV: usize = 0x25;
    pub const TVA_ENV_SUSTAIN_POINT: usize = 0x35;
    pub const TVA_ENV_END_POINT: usize = 0x36;

    pub const LEVEL: usize = 0x37;
    pub const LEVEL_CURVE: usize = 0x38;

    pub const TVF_CUTOFF: usize = 0x39;
    pub const TVF_RESONANCE: usize = 0x3A;
    pub const TVF_KEY_FOLLOW: usize = 0x3B;
    pub const TVF_LFO_DEPTH: usize = 0x3C;
    pub const TVF_EG_DEPTH: usize = 0x3D;
    pub const TVF_EG_POLARITY: usize = 0x3E;
    pub const TVF_LEVEL_CURVE: usize = 0x3F;
    pub const TVF_KEY_RATE_FOLLOW: usize = 0x40;
    pub const TVF_SWITCH: usize = 0x41;

    pub const TVF_ENV: usize = 0x42;
    pub const TVF_ENV_SUSTAIN_POINT: usize = 0x52;
    pub const TVF_ENV_END_POINT: usize = 0x53;

    pub const LOOP_TUNE: usize = 0x54; // signed, center 64
    pub const FINE_TUNE: usize = 0x55; // signed, center 64
    pub const RECORDING_THRESHOLD: usize = 0x56;

    pub const SIZE: usize = 0x80;
}
