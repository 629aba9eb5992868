use serde_json::Value;

use crate::error::{Error, Result};
use crate::map::beatmap::{BeatmapSet, DifficultyEntry};
use crate::map::current::CurrentInfo;
use crate::map::extension::ExtensionBag;
use crate::map::generation::SchemaGeneration;
use crate::map::json::parse_object;
use crate::map::legacy::LegacyInfo;

/// Uniform access to the fields of an info document.
///
/// Implemented once per schema generation. Setters always write in the
/// convention of the document they belong to.
pub trait InfoFields {
    fn song_title(&self) -> &str;
    fn set_song_title(&mut self, title: &str);

    fn song_subtitle(&self) -> &str;
    fn set_song_subtitle(&mut self, subtitle: &str);

    fn song_author(&self) -> &str;
    fn set_song_author(&mut self, author: &str);

    fn level_author(&self) -> &str;
    fn set_level_author(&mut self, author: &str);

    /// Prefix the level author unless it already starts with `prefix`.
    ///
    /// Returns `true` when anything changed.
    fn ensure_level_author_prefix(&mut self, prefix: &str) -> bool {
        let current = self.level_author();
        if current.starts_with(prefix) {
            return false;
        }
        let prefixed = format!("{}{}", prefix, current);
        self.set_level_author(&prefixed);
        true
    }

    fn beats_per_minute(&self) -> f64;
    fn set_beats_per_minute(&mut self, bpm: f64);

    fn cover_image_filename(&self) -> &str;
    fn set_cover_image_filename(&mut self, file_name: &str);

    fn beatmap_sets(&self) -> &[BeatmapSet];
    fn beatmap_sets_mut(&mut self) -> &mut [BeatmapSet];

    fn extensions(&self) -> &ExtensionBag;
    fn extensions_mut(&mut self) -> &mut ExtensionBag;

    /// Serialize back to the on-disk shape of this generation.
    fn to_value(&self) -> Value;
}

/// An info document of either schema generation.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionedMapDocument {
    Legacy(LegacyInfo),
    Current(CurrentInfo),
}

/// Top-level map metadata owned by a bundle.
pub type MapInfo = VersionedMapDocument;

impl VersionedMapDocument {
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(Error::MalformedDocument(
                "info document is not a JSON object".to_string(),
            ));
        };
        match SchemaGeneration::detect_info(&fields)? {
            SchemaGeneration::Legacy => Ok(Self::Legacy(LegacyInfo::decode(fields)?)),
            SchemaGeneration::Current => Ok(Self::Current(CurrentInfo::decode(fields)?)),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_value(Value::Object(parse_object(bytes, "Info.dat")?))
    }

    pub fn generation(&self) -> SchemaGeneration {
        match self {
            Self::Legacy(_) => SchemaGeneration::Legacy,
            Self::Current(_) => SchemaGeneration::Current,
        }
    }

    fn fields(&self) -> &dyn InfoFields {
        match self {
            Self::Legacy(info) => info,
            Self::Current(info) => info,
        }
    }

    fn fields_mut(&mut self) -> &mut dyn InfoFields {
        match self {
            Self::Legacy(info) => info,
            Self::Current(info) => info,
        }
    }

    pub fn difficulties(&self) -> impl Iterator<Item = &DifficultyEntry> {
        self.beatmap_sets().iter().flat_map(|set| set.entries())
    }

    pub fn difficulties_mut(&mut self) -> impl Iterator<Item = &mut DifficultyEntry> {
        self.beatmap_sets_mut()
            .iter_mut()
            .flat_map(|set| set.entries_mut().iter_mut())
    }

    /// Whether any difficulty points at `file_name` (case-insensitive).
    pub fn references(&self, file_name: &str) -> bool {
        self.difficulties()
            .any(|entry| crate::bundle::same_file_name(entry.file_name(), file_name))
    }

    /// Note-data file names referenced by the difficulties, without duplicates.
    pub fn referenced_files(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in self.difficulties() {
            if !names
                .iter()
                .any(|name| crate::bundle::same_file_name(name, entry.file_name()))
            {
                names.push(entry.file_name().to_string());
            }
        }
        names
    }
}

impl InfoFields for VersionedMapDocument {
    fn song_title(&self) -> &str {
        self.fields().song_title()
    }

    fn set_song_title(&mut self, title: &str) {
        self.fields_mut().set_song_title(title)
    }

    fn song_subtitle(&self) -> &str {
        self.fields().song_subtitle()
    }

    fn set_song_subtitle(&mut self, subtitle: &str) {
        self.fields_mut().set_song_subtitle(subtitle)
    }

    fn song_author(&self) -> &str {
        self.fields().song_author()
    }

    fn set_song_author(&mut self, author: &str) {
        self.fields_mut().set_song_author(author)
    }

    fn level_author(&self) -> &str {
        self.fields().level_author()
    }

    fn set_level_author(&mut self, author: &str) {
        self.fields_mut().set_level_author(author)
    }

    fn ensure_level_author_prefix(&mut self, prefix: &str) -> bool {
        self.fields_mut().ensure_level_author_prefix(prefix)
    }

    fn beats_per_minute(&self) -> f64 {
        self.fields().beats_per_minute()
    }

    fn set_beats_per_minute(&mut self, bpm: f64) {
        self.fields_mut().set_beats_per_minute(bpm)
    }

    fn cover_image_filename(&self) -> &str {
        self.fields().cover_image_filename()
    }

    fn set_cover_image_filename(&mut self, file_name: &str) {
        self.fields_mut().set_cover_image_filename(file_name)
    }

    fn beatmap_sets(&self) -> &[BeatmapSet] {
        self.fields().beatmap_sets()
    }

    fn beatmap_sets_mut(&mut self) -> &mut [BeatmapSet] {
        self.fields_mut().beatmap_sets_mut()
    }

    fn extensions(&self) -> &ExtensionBag {
        self.fields().extensions()
    }

    fn extensions_mut(&mut self) -> &mut ExtensionBag {
        self.fields_mut().extensions_mut()
    }

    fn to_value(&self) -> Value {
        self.fields().to_value()
    }
}
