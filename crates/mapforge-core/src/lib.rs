pub mod batch;
pub mod bundle;
pub mod config;
pub mod error;
pub mod kinematics;
pub mod lightshow;
pub mod map;
pub mod pipeline;
pub mod report;
pub mod song;
pub mod steps;

pub use batch::{
    BatchReport, BatchRunner, BundleOutcome, BundleStatus, create_hash_mapping, process_song,
    write_hash_mapping,
};
pub use bundle::{
    BundleSource, FileMap, INFO_FILE_NAME, MapBundle, WriteReport, content_hash, hash_bundle,
};
pub use config::{ClampBounds, ClampTable, Config, MapsLayout};
pub use error::{Error, Result};
pub use map::{
    BeatmapSet, DifficultyEntry, DifficultyRank, ExtensionBag, ExtensionValue, InfoFields,
    MapInfo, NoteData, SchemaGeneration, VersionedMapDocument,
};
pub use pipeline::{Pipeline, Step};
pub use song::{MapSource, Song};
