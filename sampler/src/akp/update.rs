//! Partial updates for patch editing
//!
//! An update record mirrors a subset of the program structure with every
//! field optional. Fields present in the update overwrite their
//! counterpart; absent fields leave the program untouched. This is the
//! best-effort merge patch editors send: nothing here validates parameter
//! ranges, it only moves values into place.
//!
//! Changing the keygroup count is the one structural edit. Shrinking
//! truncates; growing re-parses keygroup records out of the byte buffer
//! the program was originally read from, at the fixed keygroup stride.

use super::{
    chunk::{ChunkError, ChunkReader},
    keygroup::Keygroup,
    program::Program,
};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

macro_rules! merge {
    ($dest:expr, $update:expr, { $($field:ident),* $(,)? }) => {
        $(
            if let Some(value) = $update.$field {
                $dest.$field = value;
            }
        )*
    };
}

/// A partial update to a [`Program`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgramUpdate {
    pub program_number: Option<i8>,
    pub keygroup_count: Option<i8>,
    pub output: Option<OutputUpdate>,
    pub tune: Option<TuneUpdate>,
    pub lfo1: Option<LfoUpdate>,
    pub lfo2: Option<LfoUpdate>,
    pub keygroups: Vec<KeygroupUpdate>,
}

impl ProgramUpdate {
    /// Parse an update from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A partial update to the `out ` chunk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputUpdate {
    pub loudness: Option<i8>,
    pub amp_mod1: Option<i8>,
    pub amp_mod2: Option<i8>,
    pub pan_mod1: Option<i8>,
    pub pan_mod2: Option<i8>,
    pub pan_mod3: Option<i8>,
    pub velocity_sensitivity: Option<i8>,
}

/// A partial update to the `tune` chunk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TuneUpdate {
    pub semitone_tune: Option<i8>,
    pub fine_tune: Option<i8>,
    pub detune: Option<[i8; 12]>,
    pub pitch_bend_up: Option<i8>,
    pub pitch_bend_down: Option<i8>,
    pub bend_mode: Option<i8>,
    pub aftertouch: Option<i8>,
}

/// A partial update to an `lfo ` chunk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LfoUpdate {
    pub waveform: Option<i8>,
    pub rate: Option<i8>,
    pub delay: Option<i8>,
    pub depth: Option<i8>,
    pub sync: Option<i8>,
    pub modwheel: Option<i8>,
    pub aftertouch: Option<i8>,
    pub rate_mod: Option<i8>,
    pub delay_mod: Option<i8>,
    pub depth_mod: Option<i8>,
}

/// A partial update to one keygroup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeygroupUpdate {
    pub kloc: Option<KlocUpdate>,
    pub zones: Vec<ZoneUpdate>,
}

/// A partial update to a keygroup's `kloc` chunk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KlocUpdate {
    pub low_note: Option<i8>,
    pub high_note: Option<i8>,
    pub semitone_tune: Option<i8>,
    pub fine_tune: Option<i8>,
    pub override_fx: Option<i8>,
    pub fx_send_level: Option<i8>,
    pub zone_xfade: Option<i8>,
    pub mute_group: Option<i8>,
}

/// A partial update to one zone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZoneUpdate {
    pub sample_name: Option<String>,
    pub low_velocity: Option<i8>,
    pub high_velocity: Option<i8>,
    pub fine_tune: Option<i8>,
    pub semitone_tune: Option<i8>,
    pub filter: Option<i8>,
    pub pan_balance: Option<i8>,
    pub playback: Option<i8>,
    pub output: Option<i8>,
    pub level: Option<i8>,
    pub keyboard_track: Option<i8>,
}

impl Program {
    /// Merge a partial update into this program
    ///
    /// Keygroup count changes happen before per-keygroup updates, so an
    /// update may grow the list and configure the new keygroups in one go.
    /// Per-keygroup updates beyond the (new) keygroup count are ignored.
    pub fn apply(&mut self, update: &ProgramUpdate) -> Result<(), ApplyError> {
        if let Some(value) = update.program_number {
            self.program.program_number = value;
        }

        if let Some(output) = &update.output {
            merge!(self.output, output, {
                loudness,
                amp_mod1,
                amp_mod2,
                pan_mod1,
                pan_mod2,
                pan_mod3,
                velocity_sensitivity,
            });
        }

        if let Some(tune) = &update.tune {
            merge!(self.tune, tune, {
                semitone_tune,
                fine_tune,
                detune,
                pitch_bend_up,
                pitch_bend_down,
                bend_mode,
                aftertouch,
            });
        }

        if let Some(lfo) = &update.lfo1 {
            merge_lfo(&mut self.lfo1, lfo);
        }
        if let Some(lfo) = &update.lfo2 {
            merge_lfo(&mut self.lfo2, lfo);
        }

        if let Some(count) = update.keygroup_count {
            self.resize_keygroups(count.max(0) as usize)?;
        }

        for (keygroup, keygroup_update) in self.keygroups.iter_mut().zip(&update.keygroups) {
            merge_keygroup(keygroup, keygroup_update);
        }

        Ok(())
    }

    /// Truncate or grow the keygroup list to `count`
    ///
    /// Growth re-parses the retained source buffer at
    /// `first_keygroup_offset + stride × index`. When the source holds no
    /// record at that offset (the file simply never had that many
    /// keygroups), the first keygroup's bytes serve as the template
    /// instead.
    fn resize_keygroups(&mut self, count: usize) -> Result<(), ApplyError> {
        if count <= self.keygroups.len() {
            self.keygroups.truncate(count);
            self.program.keygroup_count = count as i8;
            return Ok(());
        }

        let source = self
            .source
            .as_ref()
            .ok_or(ApplyError::NoSource { requested: count })?;

        for index in self.keygroups.len()..count {
            let mut offset = source.first_keygroup_offset + Keygroup::STRIDE * index;
            if offset + Keygroup::STRIDE > source.bytes.len() {
                debug!("keygroup {index} not present in source, re-parsing keygroup 0 as template");
                offset = source.first_keygroup_offset;
            }

            let mut reader = ChunkReader::at(&source.bytes, offset);
            let keygroup =
                Keygroup::parse(&mut reader).map_err(|source| ApplyError::Keygroup {
                    index,
                    count,
                    offset,
                    source,
                })?;
            self.keygroups.push(keygroup);
        }

        self.program.keygroup_count = count as i8;
        Ok(())
    }
}

fn merge_lfo(dest: &mut super::global::Lfo, update: &LfoUpdate) {
    merge!(dest, update, {
        waveform,
        rate,
        delay,
        depth,
        sync,
        modwheel,
        aftertouch,
        rate_mod,
        delay_mod,
        depth_mod,
    });
}

fn merge_keygroup(dest: &mut Keygroup, update: &KeygroupUpdate) {
    if let Some(kloc) = &update.kloc {
        merge!(dest.kloc, kloc, {
            low_note,
            high_note,
            semitone_tune,
            fine_tune,
            override_fx,
            fx_send_level,
            zone_xfade,
            mute_group,
        });
    }

    for (zone, zone_update) in dest.zones.iter_mut().zip(&update.zones) {
        if let Some(name) = &zone_update.sample_name {
            zone.sample_name = name.clone();
        }
        merge!(zone, zone_update, {
            low_velocity,
            high_velocity,
            fine_tune,
            semitone_tune,
            filter,
            pan_balance,
            playback,
            output,
            level,
            keyboard_track,
        });
    }
}

/// Errors that might be returned from [`Program::apply()`]
#[derive(Debug, Error)]
pub enum ApplyError {
    /// Growing the keygroup list needs the original parse buffer, and this
    /// program does not have one (it was built from scratch or from JSON)
    #[error("Cannot grow to {requested} keygroup(s) without a retained source buffer")]
    NoSource { requested: usize },

    /// Re-parsing a keygroup out of the source buffer failed
    #[error("Failed to parse keygroup {index} of {count} at offset {offset}: {source}")]
    Keygroup {
        index: usize,
        count: usize,
        offset: usize,
        source: ChunkError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_keygroup_program() -> Program {
        let mut program = Program::new();
        program.keygroups.push(Keygroup::default());
        program.keygroups[0].zones[0].sample_name = "FIRST".to_string();
        program.keygroups[1].zones[0].sample_name = "SECOND".to_string();
        program.program.keygroup_count = 2;

        // Round-trip through bytes so the program retains a source buffer
        Program::parse(&program.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn scalar_fields_overwrite() {
        let mut program = two_keygroup_program();

        let update = ProgramUpdate::from_json(
            r#"{
                "program_number": 5,
                "output": { "loudness": 70 },
                "tune": { "pitch_bend_up": 12 },
                "lfo2": { "rate": 99 }
            }"#,
        )
        .unwrap();

        program.apply(&update).unwrap();

        assert_eq!(program.program_number(), 5);
        assert_eq!(program.output.loudness, 70);
        assert_eq!(program.tune.pitch_bend_up, 12);
        assert_eq!(program.lfo2.rate, 99);

        // Untouched fields keep their values
        assert_eq!(program.tune.pitch_bend_down, 2);
        assert_eq!(program.lfo1.rate, 0);
    }

    #[test]
    fn absent_fields_are_skipped() {
        let mut program = two_keygroup_program();
        program.output.velocity_sensitivity = 42;

        let update = ProgramUpdate::from_json(r#"{ "output": {} }"#).unwrap();
        program.apply(&update).unwrap();

        assert_eq!(program.output.velocity_sensitivity, 42);
    }

    #[test]
    fn keygroup_and_zone_overrides() {
        let mut program = two_keygroup_program();

        let update = ProgramUpdate::from_json(
            r#"{
                "keygroups": [
                    {
                        "kloc": { "low_note": 24, "high_note": 48 },
                        "zones": [ { "sample_name": "NEW", "high_velocity": 100 } ]
                    }
                ]
            }"#,
        )
        .unwrap();

        program.apply(&update).unwrap();

        assert_eq!(program.keygroups[0].kloc.low_note, 24);
        assert_eq!(program.keygroups[0].zones[0].sample_name, "NEW");
        assert_eq!(program.keygroups[0].zones[0].high_velocity, 100);

        // Keygroup 1 had no update entry
        assert_eq!(program.keygroups[1].zones[0].sample_name, "SECOND");
    }

    #[test]
    fn shrinking_truncates() {
        let mut program = two_keygroup_program();

        let update = ProgramUpdate {
            keygroup_count: Some(1),
            ..ProgramUpdate::default()
        };
        program.apply(&update).unwrap();

        assert_eq!(program.keygroup_count(), 1);
        assert_eq!(program.keygroups[0].zones[0].sample_name, "FIRST");
        assert_eq!(program.to_bytes().unwrap().len(), program.byte_len());
    }

    #[test]
    fn growing_reparses_the_source_buffer() {
        let mut program = two_keygroup_program();

        // Shrink, then grow back: the second keygroup must come back from
        // the retained source bytes
        program
            .apply(&ProgramUpdate {
                keygroup_count: Some(1),
                ..ProgramUpdate::default()
            })
            .unwrap();
        program
            .apply(&ProgramUpdate {
                keygroup_count: Some(2),
                ..ProgramUpdate::default()
            })
            .unwrap();

        assert_eq!(program.keygroup_count(), 2);
        assert_eq!(program.keygroups[1].zones[0].sample_name, "SECOND");
    }

    #[test]
    fn growing_past_the_source_uses_the_first_keygroup_as_template() {
        let mut program = two_keygroup_program();

        program
            .apply(&ProgramUpdate {
                keygroup_count: Some(4),
                ..ProgramUpdate::default()
            })
            .unwrap();

        assert_eq!(program.keygroup_count(), 4);
        assert_eq!(program.keygroups[2].zones[0].sample_name, "FIRST");
        assert_eq!(program.keygroups[3].zones[0].sample_name, "FIRST");
    }

    #[test]
    fn growth_then_zone_override_in_one_update() {
        let mut program = two_keygroup_program();

        let update = ProgramUpdate::from_json(
            r#"{
                "keygroup_count": 3,
                "keygroups": [
                    {},
                    {},
                    { "zones": [ { "sample_name": "THIRD" } ] }
                ]
            }"#,
        )
        .unwrap();

        program.apply(&update).unwrap();

        assert_eq!(program.keygroup_count(), 3);
        assert_eq!(program.keygroups[2].zones[0].sample_name, "THIRD");
    }

    #[test]
    fn growing_without_source_fails() {
        let mut program = Program::new();
        assert!(program.source.is_none());

        let result = program.apply(&ProgramUpdate {
            keygroup_count: Some(2),
            ..ProgramUpdate::default()
        });

        assert!(matches!(
            result,
            Err(ApplyError::NoSource { requested: 2 })
        ));
    }

    #[test]
    fn grown_programs_serialize_consistently() {
        let mut program = two_keygroup_program();
        program
            .apply(&ProgramUpdate {
                keygroup_count: Some(3),
                ..ProgramUpdate::default()
            })
            .unwrap();

        let bytes = program.to_bytes().unwrap();
        let back = Program::parse(&bytes).unwrap();
        assert_eq!(back.keygroup_count(), 3);
    }
}
