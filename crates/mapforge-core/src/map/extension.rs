//! Vendor extension data (`customData` / `_customData`).
//!
//! The bag keeps every member it was loaded with so unknown extensions survive
//! a load/save cycle untouched. The typed API only exposes the value kinds the
//! pipeline works with.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::map::generation::SchemaGeneration;
use crate::map::json::{JsonMap, number_from_f64};

/// Extension key holding a human-readable difficulty label.
pub const DIFFICULTY_LABEL_KEY: &str = "difficultyLabel";

/// Extension key holding the list of required mods.
pub const REQUIREMENTS_KEY: &str = "requirements";

#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionValue {
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl ExtensionValue {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(number_from_f64(*n)),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for ExtensionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ExtensionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ExtensionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for ExtensionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionBag {
    generation: SchemaGeneration,
    entries: JsonMap,
    /// Whether the owning document carried an extension object at all.
    present: bool,
}

impl ExtensionBag {
    pub fn new(generation: SchemaGeneration) -> Self {
        Self {
            generation,
            entries: JsonMap::new(),
            present: false,
        }
    }

    /// Read the extension object of `container`, if it has one.
    pub(crate) fn decode(generation: SchemaGeneration, container: &JsonMap) -> Result<Self> {
        let key = generation.key("customData");
        match container.get(key.as_ref()) {
            None | Some(Value::Null) => Ok(Self::new(generation)),
            Some(Value::Object(entries)) => Ok(Self {
                generation,
                entries: entries.clone(),
                present: true,
            }),
            Some(_) => Err(Error::MalformedDocument(format!(
                "'{}' is not an object",
                key
            ))),
        }
    }

    /// Write the bag back into `container`. An absent bag that was never
    /// written to stays absent.
    pub(crate) fn encode_into(&self, container: &mut JsonMap) {
        if self.present || !self.entries.is_empty() {
            container.insert(
                self.generation.key("customData").into_owned(),
                Value::Object(self.entries.clone()),
            );
        }
    }

    pub fn generation(&self) -> SchemaGeneration {
        self.generation
    }

    pub fn get(&self, key: &str) -> Option<ExtensionValue> {
        self.entries
            .get(self.generation.key(key).as_ref())
            .and_then(ExtensionValue::from_json)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(self.generation.key(key).as_ref())
    }

    pub fn set(&mut self, key: &str, value: impl Into<ExtensionValue>) {
        let key = self.generation.key(key).into_owned();
        self.entries.insert(key, value.into().to_json());
    }

    pub fn remove(&mut self, key: &str) -> Option<ExtensionValue> {
        let key = self.generation.key(key);
        self.entries
            .shift_remove(key.as_ref())
            .as_ref()
            .and_then(ExtensionValue::from_json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn container(value: Value) -> JsonMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_legacy_keys_are_prefixed() {
        let doc = container(json!({"_customData": {"_difficultyLabel": "Hard Mode"}}));
        let mut bag = ExtensionBag::decode(SchemaGeneration::Legacy, &doc).unwrap();
        assert_eq!(
            bag.get(DIFFICULTY_LABEL_KEY),
            Some(ExtensionValue::Text("Hard Mode".to_string()))
        );

        bag.set(REQUIREMENTS_KEY, vec!["Chroma".to_string()]);
        let mut out = JsonMap::new();
        bag.encode_into(&mut out);
        assert_eq!(
            Value::Object(out),
            json!({"_customData": {"_difficultyLabel": "Hard Mode", "_requirements": ["Chroma"]}})
        );
    }

    #[test]
    fn test_current_keys_are_plain() {
        let doc = container(json!({"customData": {"difficultyLabel": "Hard Mode"}}));
        let bag = ExtensionBag::decode(SchemaGeneration::Current, &doc).unwrap();
        assert_eq!(
            bag.get(DIFFICULTY_LABEL_KEY).and_then(|v| v.as_text().map(str::to_string)),
            Some("Hard Mode".to_string())
        );
        assert!(!bag.contains("_difficultyLabel"));
    }

    #[test]
    fn test_absent_bag_stays_absent() {
        let bag = ExtensionBag::decode(SchemaGeneration::Legacy, &JsonMap::new()).unwrap();
        let mut out = JsonMap::new();
        bag.encode_into(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_members_survive() {
        let doc = container(json!({
            "_customData": {"_contributors": [{"_role": "Mapper"}], "_editorOffset": 12}
        }));
        let bag = ExtensionBag::decode(SchemaGeneration::Legacy, &doc).unwrap();
        assert_eq!(bag.get("contributors"), None);
        assert_eq!(bag.get("editorOffset"), Some(ExtensionValue::Number(12.0)));

        let mut out = JsonMap::new();
        bag.encode_into(&mut out);
        assert_eq!(Value::Object(out), Value::Object(doc));
    }

    #[test]
    fn test_non_object_bag_is_malformed() {
        let doc = container(json!({"customData": 5}));
        assert!(ExtensionBag::decode(SchemaGeneration::Current, &doc).is_err());
    }

    #[test]
    fn test_remove() {
        let mut bag = ExtensionBag::new(SchemaGeneration::Current);
        bag.set(DIFFICULTY_LABEL_KEY, "Label");
        assert_eq!(bag.len(), 1);
        assert_eq!(
            bag.remove(DIFFICULTY_LABEL_KEY),
            Some(ExtensionValue::Text("Label".to_string()))
        );
        assert!(bag.is_empty());
    }
}
