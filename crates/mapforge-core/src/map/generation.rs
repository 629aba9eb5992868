use std::borrow::Cow;

use strum::{Display, IntoStaticStr};

use crate::error::{Error, Result};
use crate::map::json::JsonMap;

/// On-disk schema generation of a document.
///
/// Detected once when a document is parsed and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum SchemaGeneration {
    /// Underscore-prefixed keys, difficulties nested per characteristic.
    Legacy,
    /// Plain keys, flat difficulty list tagged with a characteristic.
    Current,
}

impl SchemaGeneration {
    /// Classify an info document by its difficulty collection.
    pub fn detect_info(document: &JsonMap) -> Result<Self> {
        if document.contains_key("_difficultyBeatmapSets") {
            Ok(Self::Legacy)
        } else if document.contains_key("difficultyBeatmaps") {
            Ok(Self::Current)
        } else {
            Err(Error::MalformedDocument(
                "info document has neither '_difficultyBeatmapSets' nor 'difficultyBeatmaps'"
                    .to_string(),
            ))
        }
    }

    /// Classify a note-data document by its note collection.
    pub fn detect_note_data(document: &JsonMap) -> Self {
        if document.contains_key("colorNotes") {
            Self::Current
        } else {
            Self::Legacy
        }
    }

    pub fn key_prefix(&self) -> &'static str {
        match self {
            Self::Legacy => "_",
            Self::Current => "",
        }
    }

    /// Apply this generation's key convention to a logical key name.
    pub fn key<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            Self::Legacy => Cow::Owned(format!("_{}", name)),
            Self::Current => Cow::Borrowed(name),
        }
    }
}
