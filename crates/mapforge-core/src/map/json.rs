//! Helpers shared by the document codecs.

use serde_json::{Number, Value};

use crate::error::{Error, Result};

pub type JsonMap = serde_json::Map<String, Value>;

/// Largest integer an f64 represents exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Decode raw file bytes as UTF-8, dropping a leading byte-order mark.
///
/// Map editors on Windows frequently emit a BOM, which `serde_json` rejects.
pub fn decode_text(bytes: &[u8], name: &str) -> Result<String> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(Error::MalformedDocument(format!(
            "{} is not valid UTF-8",
            name
        )));
    }
    Ok(text.into_owned())
}

/// Parse raw file bytes into a JSON object.
pub fn parse_object(bytes: &[u8], name: &str) -> Result<JsonMap> {
    let text = decode_text(bytes, name)?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Error::MalformedDocument(format!(
            "{} is not a JSON object",
            name
        ))),
        Err(e) => Err(Error::MalformedDocument(format!("{}: {}", name, e))),
    }
}

pub fn require_str(map: &JsonMap, key: &str) -> Result<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::missing_field(key))
}

pub fn require_number(map: &JsonMap, key: &str) -> Result<Number> {
    match map.get(key) {
        Some(Value::Number(n)) => Ok(n.clone()),
        _ => Err(Error::missing_field(key)),
    }
}

pub fn require_object<'a>(map: &'a JsonMap, key: &str) -> Result<&'a JsonMap> {
    map.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| Error::missing_field(key))
}

pub fn require_array<'a>(map: &'a JsonMap, key: &str) -> Result<&'a Vec<Value>> {
    map.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::missing_field(key))
}

/// Convert an f64 into a JSON number, keeping whole values integral.
///
/// A clamp to `17` is written as `17`, not `17.0`. Non-finite values have no
/// JSON representation and collapse to zero.
pub fn number_from_f64(value: f64) -> Number {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        Number::from(value as i64)
    } else {
        Number::from_f64(value).unwrap_or_else(|| Number::from(0))
    }
}

pub fn number_to_f64(number: &Number) -> f64 {
    number.as_f64().unwrap_or_default()
}

/// Recursively remove every `null` member from objects.
///
/// Array elements that are themselves `null` are kept; only object members
/// are treated as removable.
pub fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                strip_nulls(v);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_nulls(item);
            }
        }
        _ => {}
    }
}
