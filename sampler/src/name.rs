//! Fixed-width, space-padded names based on a subset of ASCII
use serde::{Deserialize, Serialize};
use std::{fmt, str};

/// A fixed-width, space-padded name based on a subset of ASCII
///
/// Sampler parameter memory stores names as exactly `N` bytes, padded with
/// trailing spaces. The display alphabet is restricted to digits, uppercase
/// letters, space and a handful of symbols; the stored form additionally
/// keeps bit 7 of every byte clear, because name bytes travel over MIDI
/// where only 7-bit data is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Name<N> {
    /// The substitute character for anything outside the display alphabet
    const UNKNOWN_CHAR: u8 = b'?';

    /// Encode a string as a name
    ///
    /// Lowercase letters are uppercased, anything outside the display
    /// alphabet becomes `?`, and the result is truncated or space-padded to
    /// exactly `N` bytes. Every encoded byte has bit 7 clear.
    pub fn from_str(string: &str) -> Self {
        let mut bytes = [b' '; N];
        for (dest, char) in bytes.iter_mut().zip(string.chars()) {
            let byte = char.to_ascii_uppercase() as u32;
            *dest = match u8::try_from(byte) {
                Ok(byte) if Self::is_byte_allowed(byte) => byte,
                _ => Self::UNKNOWN_CHAR,
            };
        }

        Self { bytes }
    }

    /// Decode a name from raw parameter memory
    ///
    /// Bit 7 of every byte is stripped (legacy dumps sometimes carry it
    /// set), and non-printable results become spaces. Missing bytes (input
    /// shorter than `N`) also read as spaces.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut dest = [b' '; N];
        for (dest, byte) in dest.iter_mut().zip(bytes) {
            let byte = byte & 0x7F;
            *dest = if (0x20..0x7F).contains(&byte) {
                byte
            } else {
                b' '
            };
        }

        Self { bytes: dest }
    }

    /// Access the fixed-width byte form, as written to parameter memory
    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// The name with trailing padding removed
    pub fn as_str(&self) -> &str {
        let len = self
            .bytes
            .iter()
            .rposition(|byte| *byte != b' ')
            .map(|index| index + 1)
            .unwrap_or(0);

        // SAFETY: both constructors only ever store printable 7-bit ASCII
        unsafe { str::from_utf8_unchecked(&self.bytes[..len]) }
    }

    /// Are there _any_ non-padding characters in the name?
    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|byte| *byte == b' ')
    }

    /// Is a specific byte within the subset of ASCII usable for names?
    pub fn is_byte_allowed(byte: u8) -> bool {
        byte.is_ascii_uppercase()
            || byte.is_ascii_digit()
            || matches!(byte, b' ' | b'#' | b'+' | b'-' | b'.')
    }
}

impl<const N: usize> Default for Name<N> {
    fn default() -> Self {
        Self { bytes: [b' '; N] }
    }
}

impl<const N: usize> fmt::Display for Name<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<const N: usize> Serialize for Name<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, const N: usize> Deserialize<'de> for Name<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Ok(Self::from_str(&string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode() {
        let name = Name::<8>::from_str("TEST");
        assert_eq!(name.bytes(), b"TEST    ");
        assert_eq!(Name::<8>::from_bytes(name.bytes()).as_str(), "TEST");
    }

    #[test]
    fn encode_uppercases_and_substitutes() {
        let name = Name::<12>::from_str("wave #2.a_x!");
        assert_eq!(name.bytes(), b"WAVE #2.A?X?");
    }

    #[test]
    fn encode_truncates() {
        let name = Name::<4>::from_str("LONGNAME");
        assert_eq!(name.bytes(), b"LONG");
    }

    #[test]
    fn encoded_bytes_are_seven_bit() {
        let name = Name::<8>::from_str("ÅÄÖ TEST");
        assert!(name.bytes().iter().all(|byte| byte & 0x80 == 0));
    }

    #[test]
    fn decode_masks_and_cleans() {
        // 0xC1 is 'A' with bit 7 set; 0x07 is non-printable
        let name = Name::<4>::from_bytes(&[0xC1, b'B', 0x07, b'C']);
        assert_eq!(name.as_str(), "AB C");
    }

    #[test]
    fn decode_short_input_pads() {
        let name = Name::<8>::from_bytes(b"HI");
        assert_eq!(name.bytes(), b"HI      ");
        assert_eq!(name.as_str(), "HI");
    }

    #[test]
    fn all_spaces_is_empty() {
        let name = Name::<8>::from_bytes(b"        ");
        assert_eq!(name.as_str(), "");
        assert!(name.is_empty());
        assert_eq!(format!("{name}"), "");
    }

    #[test]
    fn serde_round_trip() {
        let name = Name::<8>::from_str("WV 2");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"WV 2\"");

        let back: Name<8> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
