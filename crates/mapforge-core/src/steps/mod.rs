//! Concrete pipeline steps.
//!
//! - `OverrideFiles` - splice hand-edited files into the bundle
//! - `SetSongData` - song title, subtitle and artist from the song record
//! - `AddMissingRequirements` - mod requirements for animated difficulties
//! - `RemoveEmptyMaps` - drop difficulties without notes
//! - `AddSimpleLightShow` - generated lighting for maps without events
//! - `SetSongCover` - replacement cover art
//! - `AddSubjectiveQualityRating` - rating prefix on the level author
//! - `ClampMapSpeeds`, `ClampReactionTimes` - keep difficulties within configured bounds

mod add_missing_requirements;
mod add_simple_light_show;
mod add_subjective_quality_rating;
mod clamp_map_speeds;
mod clamp_reaction_times;
mod override_files;
mod remove_empty_maps;
mod set_song_cover;
mod set_song_data;

pub use add_missing_requirements::*;
pub use add_simple_light_show::*;
pub use add_subjective_quality_rating::*;
pub use clamp_map_speeds::*;
pub use clamp_reaction_times::*;
pub use override_files::*;
pub use remove_empty_maps::*;
pub use set_song_cover::*;
pub use set_song_data::*;
