//! # Sampler Tools
//!
//! Command-line tools for working with the program files of vintage
//! hardware samplers (Akai S5000/S6000 .akp and friends). Programs can be
//! inspected, converted to and from an editable JSON form, patched with
//! partial updates, and moved on and off disk images through the vendor's
//! `akairead`/`akaiwrite` tools.
//!
//! ## Inspect
//!
//! ```console
//! sampler-tools inspect sounds/
//! BASS.AKP                         prg   0 | loudness  80 | bend +2/-2
//!   0 |  21..127 | WV 2
//! ```
//!
//! ## Export
//!
//! ```console
//! sampler-tools export BASS.AKP -o json/
//! BASS.AKP => json/BASS.json
//! ```
//!
//! ## Import
//!
//! ```console
//! sampler-tools import json/BASS.json -o sounds/
//! json/BASS.json => sounds/BASS.akp
//! ```
//!
//! ## Apply
//!
//! ```console
//! sampler-tools apply BASS.AKP tweak.json -o BASS2.AKP
//! Wrote BASS2.AKP (2 keygroup(s))
//! ```

pub mod apply;
pub mod device;
pub mod export;
pub mod import;
pub mod inspect;
pub(crate) mod utils;
