//! Per-difficulty note data.
//!
//! Only the members the pipeline inspects are interpreted; everything else in
//! the document is carried through untouched.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::lightshow::LightEvent;
use crate::map::generation::SchemaGeneration;
use crate::map::json::{JsonMap, number_from_f64, parse_object};

/// A single note as seen by the light-show synthesizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub time: f64,
    pub column: i64,
    pub note_type: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteData {
    generation: SchemaGeneration,
    document: JsonMap,
}

impl NoteData {
    pub fn from_value(value: Value, name: &str) -> Result<Self> {
        let Value::Object(document) = value else {
            return Err(Error::MalformedDocument(format!(
                "{} is not a JSON object",
                name
            )));
        };
        Ok(Self {
            generation: SchemaGeneration::detect_note_data(&document),
            document,
        })
    }

    pub fn from_slice(bytes: &[u8], name: &str) -> Result<Self> {
        Self::from_value(Value::Object(parse_object(bytes, name)?), name)
    }

    pub fn generation(&self) -> SchemaGeneration {
        self.generation
    }

    fn notes_key(&self) -> &'static str {
        match self.generation {
            SchemaGeneration::Legacy => "_notes",
            SchemaGeneration::Current => "colorNotes",
        }
    }

    /// Number of notes, treating a missing note list as empty.
    pub fn note_count(&self) -> usize {
        self.document
            .get(self.notes_key())
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.note_count() == 0
    }

    /// Whether the document defines point definitions for animated content.
    pub fn uses_point_definitions(&self) -> bool {
        let custom_key = self.generation.key("customData");
        let points_key = self.generation.key("pointDefinitions");
        self.document
            .get(custom_key.as_ref())
            .and_then(Value::as_object)
            .is_some_and(|custom| custom.contains_key(points_key.as_ref()))
    }

    /// Whether the legacy event list exists and is non-empty.
    pub fn has_events(&self) -> bool {
        let key = match self.generation {
            SchemaGeneration::Legacy => "_events",
            SchemaGeneration::Current => "basicBeatmapEvents",
        };
        self.document
            .get(key)
            .and_then(Value::as_array)
            .is_some_and(|events| !events.is_empty())
    }

    /// Notes of a legacy document.
    pub fn notes(&self) -> Result<Vec<Note>> {
        if self.generation != SchemaGeneration::Legacy {
            return Err(Error::UnsupportedGeneration(
                "note list access requires the legacy note format".to_string(),
            ));
        }
        let Some(items) = self.document.get("_notes").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .map(|item| {
                let time = item.get("_time").and_then(Value::as_f64);
                let column = item.get("_lineIndex").and_then(Value::as_i64);
                let note_type = item.get("_type").and_then(Value::as_i64);
                match (time, column, note_type) {
                    (Some(time), Some(column), Some(note_type)) => Ok(Note {
                        time,
                        column,
                        note_type,
                    }),
                    _ => Err(Error::MalformedDocument(
                        "note is missing '_time', '_lineIndex' or '_type'".to_string(),
                    )),
                }
            })
            .collect()
    }

    /// Replace the event list of a legacy document.
    pub fn set_events(&mut self, events: &[LightEvent]) -> Result<()> {
        if self.generation != SchemaGeneration::Legacy {
            return Err(Error::UnsupportedGeneration(
                "event list access requires the legacy note format".to_string(),
            ));
        }
        let events = events
            .iter()
            .map(|event| {
                let mut object = JsonMap::new();
                object.insert("_time".into(), Value::Number(number_from_f64(event.time)));
                object.insert("_type".into(), Value::from(event.kind as u8));
                object.insert("_value".into(), Value::from(event.value));
                Value::Object(object)
            })
            .collect();
        self.document.insert("_events".into(), Value::Array(events));
        Ok(())
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }
}
