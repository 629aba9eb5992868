use serde_json::{Number, Value};

use crate::error::{Error, Result};
use crate::map::difficulty::DifficultyRank;
use crate::map::extension::{DIFFICULTY_LABEL_KEY, ExtensionBag, ExtensionValue, REQUIREMENTS_KEY};
use crate::map::generation::SchemaGeneration;
use crate::map::json::{JsonMap, number_from_f64, number_to_f64, require_number, require_str};

/// Appended to a label when a value was pushed up to its configured bound.
pub const RAISED_MARKER: &str = "▲";

/// Appended to a label when a value was pushed down to its configured bound.
pub const LOWERED_MARKER: &str = "▼";

/// Characteristic whose difficulties legitimately carry no notes.
pub const LIGHTSHOW_CHARACTERISTIC: &str = "Lightshow";

/// Key names of a difficulty entry for one schema generation.
struct EntryKeys {
    difficulty: &'static str,
    file_name: &'static str,
    note_jump_speed: &'static str,
    start_beat_offset: &'static str,
}

const LEGACY_ENTRY_KEYS: EntryKeys = EntryKeys {
    difficulty: "_difficulty",
    file_name: "_beatmapFilename",
    note_jump_speed: "_noteJumpMovementSpeed",
    start_beat_offset: "_noteJumpStartBeatOffset",
};

const CURRENT_ENTRY_KEYS: EntryKeys = EntryKeys {
    difficulty: "difficulty",
    file_name: "beatmapDataFilename",
    note_jump_speed: "noteJumpMovementSpeed",
    start_beat_offset: "noteJumpStartBeatOffset",
};

fn entry_keys(generation: SchemaGeneration) -> &'static EntryKeys {
    match generation {
        SchemaGeneration::Legacy => &LEGACY_ENTRY_KEYS,
        SchemaGeneration::Current => &CURRENT_ENTRY_KEYS,
    }
}

/// One playable difficulty as listed in the info document.
#[derive(Debug, Clone)]
pub struct DifficultyEntry {
    generation: SchemaGeneration,
    rank: DifficultyRank,
    file_name: String,
    note_jump_speed: Number,
    start_beat_offset: Number,
    extensions: ExtensionBag,
    /// Every member of the on-disk entry, typed ones included.
    fields: JsonMap,
    /// Index in the flat on-disk list (Current generation only).
    position: usize,
}

impl DifficultyEntry {
    pub(crate) fn decode(generation: SchemaGeneration, value: &Value, position: usize) -> Result<Self> {
        let fields = value.as_object().cloned().ok_or_else(|| {
            Error::MalformedDocument("difficulty entry is not an object".to_string())
        })?;
        let keys = entry_keys(generation);

        let difficulty = require_str(&fields, keys.difficulty)?;
        let rank = match generation {
            SchemaGeneration::Legacy => {
                let rank = fields
                    .get("_difficultyRank")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| Error::missing_field("_difficultyRank"))?;
                DifficultyRank::from_rank_value(rank)?
            }
            SchemaGeneration::Current => DifficultyRank::from_name(&difficulty)?,
        };

        Ok(Self {
            generation,
            rank,
            file_name: require_str(&fields, keys.file_name)?,
            note_jump_speed: require_number(&fields, keys.note_jump_speed)?,
            start_beat_offset: require_number(&fields, keys.start_beat_offset)?,
            extensions: ExtensionBag::decode(generation, &fields)?,
            fields,
            position,
        })
    }

    pub(crate) fn to_value(&self) -> Value {
        let keys = entry_keys(self.generation);
        let mut fields = self.fields.clone();
        fields.insert(keys.file_name.to_string(), Value::String(self.file_name.clone()));
        fields.insert(
            keys.note_jump_speed.to_string(),
            Value::Number(self.note_jump_speed.clone()),
        );
        fields.insert(
            keys.start_beat_offset.to_string(),
            Value::Number(self.start_beat_offset.clone()),
        );
        self.extensions.encode_into(&mut fields);
        Value::Object(fields)
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn fields(&self) -> &JsonMap {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut JsonMap {
        &mut self.fields
    }

    pub fn generation(&self) -> SchemaGeneration {
        self.generation
    }

    pub fn rank(&self) -> DifficultyRank {
        self.rank
    }

    /// Name of the note-data file this difficulty points at.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn note_jump_speed(&self) -> f64 {
        number_to_f64(&self.note_jump_speed)
    }

    pub fn set_note_jump_speed(&mut self, njs: f64) {
        self.note_jump_speed = number_from_f64(njs);
    }

    pub fn start_beat_offset(&self) -> f64 {
        number_to_f64(&self.start_beat_offset)
    }

    pub fn set_start_beat_offset(&mut self, offset: f64) {
        self.start_beat_offset = number_from_f64(offset);
    }

    pub fn extensions(&self) -> &ExtensionBag {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionBag {
        &mut self.extensions
    }

    /// Custom label if one is set, otherwise the rank's default label.
    pub fn difficulty_label(&self) -> String {
        match self.extensions.get(DIFFICULTY_LABEL_KEY) {
            Some(ExtensionValue::Text(label)) if !label.is_empty() => label,
            _ => self.rank.default_label().to_string(),
        }
    }

    /// Append a direction marker to the label unless it already carries one.
    ///
    /// Returns `true` when the label changed.
    pub fn add_label_modifier(&mut self, marker: &str) -> bool {
        let label = self.difficulty_label();
        if label.contains(RAISED_MARKER) || label.contains(LOWERED_MARKER) {
            return false;
        }
        self.extensions
            .set(DIFFICULTY_LABEL_KEY, format!("{}{}", label, marker));
        true
    }

    pub fn requirements(&self) -> Vec<String> {
        match self.extensions.get(REQUIREMENTS_KEY) {
            Some(ExtensionValue::List(items)) => items,
            _ => Vec::new(),
        }
    }

    pub fn set_requirements(&mut self, requirements: Vec<String>) {
        self.extensions.set(REQUIREMENTS_KEY, requirements);
    }
}

/// Entries are equal when they serialize to the same JSON.
impl PartialEq for DifficultyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

/// Difficulties grouped under one characteristic (game mode).
#[derive(Debug, Clone, PartialEq)]
pub struct BeatmapSet {
    characteristic: String,
    /// Set-level members (Legacy only; Current sets are synthesized).
    fields: JsonMap,
    entries: Vec<DifficultyEntry>,
}

impl BeatmapSet {
    pub(crate) fn new(characteristic: String, fields: JsonMap, entries: Vec<DifficultyEntry>) -> Self {
        Self {
            characteristic,
            fields,
            entries,
        }
    }

    pub(crate) fn fields(&self) -> &JsonMap {
        &self.fields
    }

    pub(crate) fn push(&mut self, entry: DifficultyEntry) {
        self.entries.push(entry);
    }

    pub fn characteristic(&self) -> &str {
        &self.characteristic
    }

    pub fn is_lightshow(&self) -> bool {
        self.characteristic == LIGHTSHOW_CHARACTERISTIC
    }

    pub fn entries(&self) -> &[DifficultyEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [DifficultyEntry] {
        &mut self.entries
    }

    /// Keep only the entries matching `keep`, returning the removed ones.
    pub fn retain_entries<F>(&mut self, mut keep: F) -> Vec<DifficultyEntry>
    where
        F: FnMut(&DifficultyEntry) -> bool,
    {
        let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| keep(entry));
        self.entries = kept;
        removed
    }
}
