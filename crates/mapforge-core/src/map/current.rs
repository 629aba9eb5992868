use serde_json::{Number, Value};

use crate::error::Result;
use crate::map::beatmap::{BeatmapSet, DifficultyEntry};
use crate::map::extension::ExtensionBag;
use crate::map::generation::SchemaGeneration;
use crate::map::info::InfoFields;
use crate::map::json::{
    JsonMap, number_from_f64, number_to_f64, require_array, require_number, require_object,
    require_str,
};

/// Info document with plain keys, nested song/audio objects and a flat
/// difficulty list. Mapper names live on each difficulty.
#[derive(Debug, Clone)]
pub struct CurrentInfo {
    title: String,
    sub_title: String,
    author: String,
    bpm: Number,
    cover_image_filename: String,
    extensions: ExtensionBag,
    sets: Vec<BeatmapSet>,
    fields: JsonMap,
}

impl CurrentInfo {
    pub(crate) fn decode(fields: JsonMap) -> Result<Self> {
        let generation = SchemaGeneration::Current;

        let song = require_object(&fields, "song")?;
        let audio = require_object(&fields, "audio")?;

        // Group the flat list by characteristic, in order of first appearance.
        let mut sets: Vec<BeatmapSet> = Vec::new();
        for (i, value) in require_array(&fields, "difficultyBeatmaps")?.iter().enumerate() {
            let entry = DifficultyEntry::decode(generation, value, i)?;
            let characteristic = require_str(entry.fields(), "characteristic")?;
            match sets
                .iter_mut()
                .find(|set| set.characteristic() == characteristic)
            {
                Some(set) => set.push(entry),
                None => sets.push(BeatmapSet::new(characteristic, JsonMap::new(), vec![entry])),
            }
        }

        Ok(Self {
            title: require_str(song, "title")?,
            sub_title: require_str(song, "subTitle")?,
            author: require_str(song, "author")?,
            bpm: require_number(audio, "bpm")?,
            cover_image_filename: require_str(&fields, "coverImageFilename")?,
            extensions: ExtensionBag::decode(generation, &fields)?,
            sets,
            fields,
        })
    }

    fn entries_in_file_order(&self) -> Vec<&DifficultyEntry> {
        let mut entries: Vec<&DifficultyEntry> =
            self.sets.iter().flat_map(|set| set.entries()).collect();
        entries.sort_by_key(|entry| entry.position());
        entries
    }
}

fn first_mapper(entry: &DifficultyEntry) -> Option<&str> {
    entry
        .fields()
        .get("beatmapAuthors")?
        .get("mappers")?
        .get(0)?
        .as_str()
}

fn set_first_mapper(entry: &mut DifficultyEntry, name: &str) {
    let authors = entry
        .fields_mut()
        .entry("beatmapAuthors")
        .or_insert_with(|| Value::Object(JsonMap::new()));
    if !authors.is_object() {
        *authors = Value::Object(JsonMap::new());
    }
    if let Value::Object(authors) = authors {
        let mappers = authors
            .entry("mappers")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !mappers.is_array() {
            *mappers = Value::Array(Vec::new());
        }
        if let Value::Array(mappers) = mappers {
            match mappers.first_mut() {
                Some(first) => *first = Value::String(name.to_string()),
                None => mappers.push(Value::String(name.to_string())),
            }
        }
    }
}

fn merge_object(fields: &JsonMap, key: &str, members: &[(&str, Value)]) -> Value {
    let mut object = fields
        .get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (name, value) in members {
        object.insert(name.to_string(), value.clone());
    }
    Value::Object(object)
}

/// Documents are equal when they serialize to the same JSON.
impl PartialEq for CurrentInfo {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl InfoFields for CurrentInfo {
    fn song_title(&self) -> &str {
        &self.title
    }

    fn set_song_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn song_subtitle(&self) -> &str {
        &self.sub_title
    }

    fn set_song_subtitle(&mut self, subtitle: &str) {
        self.sub_title = subtitle.to_string();
    }

    fn song_author(&self) -> &str {
        &self.author
    }

    fn set_song_author(&mut self, author: &str) {
        self.author = author.to_string();
    }

    /// First mapper of the first difficulty in file order.
    fn level_author(&self) -> &str {
        self.entries_in_file_order()
            .first()
            .copied()
            .and_then(first_mapper)
            .unwrap_or_default()
    }

    fn set_level_author(&mut self, author: &str) {
        for set in &mut self.sets {
            for entry in set.entries_mut() {
                set_first_mapper(entry, author);
            }
        }
    }

    fn ensure_level_author_prefix(&mut self, prefix: &str) -> bool {
        let mut changed = false;
        for set in &mut self.sets {
            for entry in set.entries_mut() {
                let Some(mapper) = first_mapper(entry) else {
                    continue;
                };
                if mapper.starts_with(prefix) {
                    continue;
                }
                let prefixed = format!("{}{}", prefix, mapper);
                set_first_mapper(entry, &prefixed);
                changed = true;
            }
        }
        changed
    }

    fn beats_per_minute(&self) -> f64 {
        number_to_f64(&self.bpm)
    }

    fn set_beats_per_minute(&mut self, bpm: f64) {
        self.bpm = number_from_f64(bpm);
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
        let song = merge_object(
            &fields,
            "song",
            &[
                ("title", Value::String(self.title.clone())),
                ("subTitle", Value::String(self.sub_title.clone())),
                ("author", Value::String(self.author.clone())),
            ],
        );
        let audio = merge_object(&fields, "audio", &[("bpm", Value::Number(self.bpm.clone()))]);
        fields.insert("song".into(), song);
        fields.insert("audio".into(), audio);
        fields.insert(
            "coverImageFilename".into(),
            Value::String(self.cover_image_filename.clone()),
        );

        let entries = self
            .entries_in_file_order()
            .into_iter()
            .map(DifficultyEntry::to_value)
            .collect();
        fields.insert("difficultyBeatmaps".into(), Value::Array(entries));

        self.extensions.encode_into(&mut fields);
        Value::Object(fields)
    }
}
