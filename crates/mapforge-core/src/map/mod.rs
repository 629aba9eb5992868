//! Map document model.
//!
//! This module presents one data model over both on-disk schema generations:
//! - `VersionedMapDocument` - the info document, with `InfoFields` as its accessor set
//! - `BeatmapSet`, `DifficultyEntry` - difficulties grouped by characteristic
//! - `ExtensionBag` - vendor extension data with per-generation key prefixes
//! - `NoteData` - per-difficulty note data, preserved verbatim except where edited

mod beatmap;
mod current;
mod difficulty;
mod extension;
mod generation;
mod info;
pub mod json;
mod legacy;
mod notes;

pub use beatmap::*;
pub use current::CurrentInfo;
pub use difficulty::*;
pub use extension::*;
pub use generation::*;
pub use info::*;
pub use legacy::LegacyInfo;
pub use notes::*;
