use serde_json::{Number, Value};

use crate::error::{Error, Result};
use crate::map::beatmap::{BeatmapSet, DifficultyEntry};
use crate::map::extension::ExtensionBag;
use crate::map::generation::SchemaGeneration;
use crate::map::info::InfoFields;
use crate::map::json::{
    JsonMap, number_from_f64, number_to_f64, require_array, require_number, require_str,
};

/// Info document with underscore-prefixed keys and nested beatmap sets.
#[derive(Debug, Clone)]
pub struct LegacyInfo {
    song_name: String,
    song_sub_name: String,
    song_author_name: String,
    level_author_name: String,
    beats_per_minute: Number,
    cover_image_filename: String,
    extensions: ExtensionBag,
    sets: Vec<BeatmapSet>,
    fields: JsonMap,
}

impl LegacyInfo {
    pub(crate) fn decode(fields: JsonMap) -> Result<Self> {
        let generation = SchemaGeneration::Legacy;

        let mut sets = Vec::new();
        for set_value in require_array(&fields, "_difficultyBeatmapSets")? {
            let set_fields = set_value.as_object().cloned().ok_or_else(|| {
                Error::MalformedDocument("beatmap set is not an object".to_string())
            })?;
            let characteristic = require_str(&set_fields, "_beatmapCharacteristicName")?;
            let entries = require_array(&set_fields, "_difficultyBeatmaps")?
                .iter()
                .enumerate()
                .map(|(i, value)| DifficultyEntry::decode(generation, value, i))
                .collect::<Result<Vec<_>>>()?;
            sets.push(BeatmapSet::new(characteristic, set_fields, entries));
        }

        Ok(Self {
            song_name: require_str(&fields, "_songName")?,
            song_sub_name: require_str(&fields, "_songSubName")?,
            song_author_name: require_str(&fields, "_songAuthorName")?,
            level_author_name: require_str(&fields, "_levelAuthorName")?,
            beats_per_minute: require_number(&fields, "_beatsPerMinute")?,
            cover_image_filename: require_str(&fields, "_coverImageFilename")?,
            extensions: ExtensionBag::decode(generation, &fields)?,
            sets,
            fields,
        })
    }
}

/// Documents are equal when they serialize to the same JSON.
impl PartialEq for LegacyInfo {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl InfoFields for LegacyInfo {
    fn song_title(&self) -> &str {
        &self.song_name
    }

    fn set_song_title(&mut self, title: &str) {
        self.song_name = title.to_string();
    }

    fn song_subtitle(&self) -> &str {
        &self.song_sub_name
    }

    fn set_song_subtitle(&mut self, subtitle: &str) {
        self.song_sub_name = subtitle.to_string();
    }

    fn song_author(&self) -> &str {
        &self.song_author_name
    }

    fn set_song_author(&mut self, author: &str) {
        self.song_author_name = author.to_string();
    }

    fn level_author(&self) -> &str {
        &self.level_author_name
    }

    fn set_level_author(&mut self, author: &str) {
        self.level_author_name = author.to_string();
    }

    fn beats_per_minute(&self) -> f64 {
        number_to_f64(&self.beats_per_minute)
    }

    fn set_beats_per_minute(&mut self, bpm: f64) {
        self.beats_per_minute = number_from_f64(bpm);
    }

    fn cover_image_filename(&self) -> &str {
        &self.cover_image_filename
    }

    fn set_cover_image_filename(&mut self, file_name: &str) {
        self.cover_image_filename = file_name.to_string();
    }

    fn beatmap_sets(&self) -> &[BeatmapSet] {
        &self.sets
    }

    fn beatmap_sets_mut(&mut self) -> &mut [BeatmapSet] {
        &mut self.sets
    }

    fn extensions(&self) -> &ExtensionBag {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionBag {
        &mut self.extensions
    }

    fn to_value(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.insert("_songName".into(), Value::String(self.song_name.clone()));
        fields.insert("_songSubName".into(), Value::String(self.song_sub_name.clone()));
        fields.insert(
            "_songAuthorName".into(),
            Value::String(self.song_author_name.clone()),
        );
        fields.insert(
            "_levelAuthorName".into(),
            Value::String(self.level_author_name.clone()),
        );
        fields.insert(
            "_beatsPerMinute".into(),
            Value::Number(self.beats_per_minute.clone()),
        );
        fields.insert(
            "_coverImageFilename".into(),
            Value::String(self.cover_image_filename.clone()),
        );

        let sets = self
            .sets
            .iter()
            .map(|set| {
                let mut set_fields = set.fields().clone();
                let entries = set.entries().iter().map(DifficultyEntry::to_value).collect();
                set_fields.insert("_difficultyBeatmaps".into(), Value::Array(entries));
                Value::Object(set_fields)
            })
            .collect();
        fields.insert("_difficultyBeatmapSets".into(), Value::Array(sets));

        self.extensions.encode_into(&mut fields);
        Value::Object(fields)
    }
}
