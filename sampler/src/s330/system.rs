//! The system parameter block

use super::{
    byte_or, offsets::system as offsets, value::{encode_signed, parse_signed, SIGNED_CENTER},
    S330Error,
};
use serde::{Deserialize, Serialize};

/// Machine-global settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemParams {
    /// Master tuning in cents around A=440
    pub master_tune: i8,
    pub midi_rx_channel: u8,
    pub midi_tx_channel: u8,
    pub function_select: u8,
    pub voice_assign: u8,
    pub output_mode: u8,
}

impl SystemParams {
    /// Bytes the block spans in parameter memory
    pub const SIZE: usize = offsets::SIZE;

    /// Parse the block from a flat buffer
    ///
    /// A short or empty buffer yields defaults; system data is the most
    /// commonly truncated region of old dumps and must never refuse to
    /// load.
    pub fn parse(data: &[u8]) -> Self {
        Self {
            master_tune: parse_signed(
                byte_or(data, offsets::MASTER_TUNE, SIGNED_CENTER),
                SIGNED_CENTER,
            ),
            midi_rx_channel: byte_or(data, offsets::MIDI_RX_CHANNEL, 0),
            midi_tx_channel: byte_or(data, offsets::MIDI_TX_CHANNEL, 0),
            function_select: byte_or(data, offsets::FUNCTION_SELECT, 0),
            voice_assign: byte_or(data, offsets::VOICE_ASSIGN, 0),
            output_mode: byte_or(data, offsets::OUTPUT_MODE, 0),
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

        data[offsets::MASTER_TUNE] = encode_signed(self.master_tune, SIGNED_CENTER);
        data[offsets::MIDI_RX_CHANNEL] = self.midi_rx_channel;
        data[offsets::MIDI_TX_CHANNEL] = self.midi_tx_channel;
        data[offsets::FUNCTION_SELECT] = self.function_select;
        data[offsets::VOICE_ASSIGN] = self.voice_assign;
        data[offsets::OUTPUT_MODE] = self.output_mode;

        Ok(())
    }
}
