//! The S-330's 8-point envelope
//!
//! Parameter memory interleaves the points: level at even offsets from the
//! envelope base, rate at odd. Two further bytes say which point sustains
//! and which ends the envelope.

use super::S330Error;
use serde::{Deserialize, Serialize};

/// An 8-point level/rate envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub levels: [u8; 8],
    pub rates: [u8; 8],
    /// Index of the point playback holds at while a key is down
    pub sustain_point: u8,
    /// Index one past the final point
    pub end_point: u8,
}

impl Envelope {
    /// The number of level/rate points
    pub const POINTS: usize = 8;

    /// Bytes the interleaved point data spans
    pub const DATA_LEN: usize = Self::POINTS * 2;

    /// Parse an envelope out of a flat parameter buffer
    ///
    /// `base` addresses the interleaved points, `sustain_offset` and
    /// `end_offset` the two index bytes. Bytes past the end of the buffer
    /// read as defaults: level 0, rate 1, sustain 0, end 8. A short or
    /// empty buffer is not an error; it is an empty envelope.
    pub fn parse(data: &[u8], base: usize, sustain_offset: usize, end_offset: usize) -> Self {
        let mut levels = [0; Self::POINTS];
        let mut rates = [1; Self::POINTS];

        for point in 0..Self::POINTS {
            if let Some(level) = data.get(base + 2 * point) {
                levels[point] = *level;
            }
            if let Some(rate) = data.get(base + 2 * point + 1) {
                rates[point] = *rate;
            }
        }

        Self {
            levels,
            rates,
            sustain_point: data.get(sustain_offset).copied().unwrap_or(0),
            end_point: data.get(end_offset).copied().unwrap_or(8),
        }
    }

    /// Write an envelope into a flat parameter buffer
    ///
    /// Every rate is floored to 1; a rate of zero has no meaning to the
    /// hardware and must never reach it.
    pub fn write(
        &self,
        data: &mut [u8],
        base: usize,
        sustain_offset: usize,
        end_offset: usize,
    ) -> Result<(), S330Error> {
        let needed = (base + Self::DATA_LEN).max(sustain_offset + 1).max(end_offset + 1);
        if data.len() < needed {
            return Err(S330Error::BufferTooSmall {
                needed,
                actual: data.len(),
            });
        }

        for point in 0..Self::POINTS {
            data[base + 2 * point] = self.levels[point];
            data[base + 2 * point + 1] = self.rates[point].max(1);
        }
        data[sustain_offset] = self.sustain_point;
        data[end_offset] = self.end_point;

        Ok(())
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            levels: [0; Self::POINTS],
            rates: [1; Self::POINTS],
            sustain_point: 0,
            end_point: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let envelope = Envelope {
            levels: [0, 127, 100, 80, 60, 40, 20, 0],
            rates: [99, 80, 70, 60, 50, 40, 30, 20],
            sustain_point: 3,
            end_point: 7,
        };

        let mut data = [0_u8; 18];
        envelope.write(&mut data, 0, 16, 17).unwrap();

        assert_eq!(Envelope::parse(&data, 0, 16, 17), envelope);
    }

    #[test]
    fn interleaving() {
        let envelope = Envelope {
            levels: [10, 11, 12, 13, 14, 15, 16, 17],
            rates: [20, 21, 22, 23, 24, 25, 26, 27],
            ..Envelope::default()
        };

        let mut data = [0_u8; 20];
        envelope.write(&mut data, 2, 18, 19).unwrap();

        // level at base + 2i, rate at base + 2i + 1
        assert_eq!(data[2], 10);
        assert_eq!(data[3], 20);
        assert_eq!(data[4], 11);
        assert_eq!(data[5], 21);
        assert_eq!(data[16], 17);
        assert_eq!(data[17], 27);
    }

    #[test]
    fn empty_input_yields_defaults() {
        let envelope = Envelope::parse(&[], 0, 16, 17);

        assert_eq!(envelope, Envelope::default());
        assert_eq!(envelope.levels, [0; 8]);
        assert_eq!(envelope.rates, [1; 8]);
        assert_eq!(envelope.sustain_point, 0);
        assert_eq!(envelope.end_point, 8);
    }

    #[test]
    fn partially_missing_input_fills_defaults() {
        // Only the first two points are present
        let data = [50, 60, 70, 80];
        let envelope = Envelope::parse(&data, 0, 16, 17);

        assert_eq!(envelope.levels[0], 50);
        assert_eq!(envelope.rates[0], 60);
        assert_eq!(envelope.levels[1], 70);
        assert_eq!(envelope.rates[1], 80);
        assert_eq!(envelope.levels[2..], [0; 6]);
        assert_eq!(envelope.rates[2..], [1; 6]);
    }

    #[test]
    fn zero_rates_are_floored_on_write() {
        let envelope = Envelope {
            rates: [0; 8],
            ..Envelope::default()
        };

        let mut data = [0_u8; 18];
        envelope.write(&mut data, 0, 16, 17).unwrap();

        for point in 0..Envelope::POINTS {
            assert_eq!(data[2 * point + 1], 1);
        }
    }

    #[test]
    fn short_output_buffer_fails() {
        let mut data = [0_u8; 10];
        let result = Envelope::default().write(&mut data, 0, 16, 17);

        assert!(matches!(
            result,
            Err(S330Error::BufferTooSmall {
                needed: 18,
                actual: 10
            })
        ));
    }
}
