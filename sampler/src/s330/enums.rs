//! Enumerated S-330 parameters
//!
//! Decoding is total: a byte outside an enum's closed set decodes to that
//! enum's documented default rather than failing. Legacy dumps carry
//! garbage in reserved values often enough that a strict decoder would
//! reject working patches; only structural damage aborts a parse.

use log::warn;
use serde::{Deserialize, Serialize};

/// How the two patch layers respond to the keyboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    #[default]
    Normal,
    VelocitySwitch,
    VelocityMix,
    Unison,
}

impl KeyMode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Normal,
            1 => Self::VelocitySwitch,
            2 => Self::VelocityMix,
            3 => Self::Unison,
            other => {
                warn!("unknown key mode byte {other}, using normal");
                Self::Normal
            }
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::VelocitySwitch => 1,
            Self::VelocityMix => 2,
            Self::Unison => 3,
        }
    }
}

/// What the voice does when playback reaches the loop point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    #[default]
    Forward,
    Alternate,
    OneShot,
    Reverse,
}

impl LoopMode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Forward,
            1 => Self::Alternate,
            2 => Self::OneShot,
            3 => Self::Reverse,
            other => {
                warn!("unknown loop mode byte {other}, using forward");
                Self::Forward
            }
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Forward => 0,
            Self::Alternate => 1,
            Self::OneShot => 2,
            Self::Reverse => 3,
        }
    }
}

/// Whether the TVF envelope opens or closes the filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EgPolarity {
    #[default]
    Normal,
    Reverse,
}

impl EgPolarity {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Normal,
            1 => Self::Reverse,
            other => {
                warn!("unknown EG polarity byte {other}, using normal");
                Self::Normal
            }
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Reverse => 1,
        }
    }
}

/// LFO waveform selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LfoMode {
    #[default]
    Triangle,
    Square,
    SawUp,
    SawDown,
    Random,
}

impl LfoMode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Triangle,
            1 => Self::Square,
            2 => Self::SawUp,
            3 => Self::SawDown,
            4 => Self::Random,
            other => {
                warn!("unknown LFO mode byte {other}, using triangle");
                Self::Triangle
            }
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Triangle => 0,
            Self::Square => 1,
            Self::SawUp => 2,
            Self::SawDown => 3,
            Self::Random => 4,
        }
    }
}

/// The sampling frequency a tone's wave data was recorded at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRate {
    #[default]
    Khz30,
    Khz15,
}

impl SampleRate {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Khz30,
            1 => Self::Khz15,
            other => {
                warn!("unknown sample rate byte {other}, using 30 kHz");
                Self::Khz30
            }
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Khz30 => 0,
            Self::Khz15 => 1,
        }
    }

    /// The rate in Hertz
    pub fn hz(self) -> u32 {
        match self {
            Self::Khz30 => 30_000,
            Self::Khz15 => 15_000,
        }
    }
}
