use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::Result;
use crate::map::json::{decode_text, strip_nulls};

/// How a structured document is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    /// Four-space indentation, for documents people read.
    Pretty,
    /// No whitespace, for bulky note data.
    Compact,
}

/// Outcome of writing a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Files whose content changed (or did not exist yet).
    pub written: Vec<String>,
    /// Files already holding the expected content.
    pub unchanged: Vec<String>,
}

impl WriteReport {
    pub fn is_unchanged(&self) -> bool {
        self.written.is_empty()
    }

    fn record(&mut self, name: &str, written: bool) {
        if written {
            self.written.push(name.to_string());
        } else {
            self.unchanged.push(name.to_string());
        }
    }
}

/// Destination path of bundle file `name` (which uses `/` separators).
pub(crate) fn target_path(target: &Path, name: &str) -> PathBuf {
    let mut path = target.to_path_buf();
    path.extend(name.split('/').filter(|part| !part.is_empty()));
    path
}

fn serialize(value: &Value, layout: JsonLayout) -> Result<Vec<u8>> {
    match layout {
        JsonLayout::Compact => Ok(serde_json::to_vec(value)?),
        JsonLayout::Pretty => {
            let mut buffer = Vec::new();
            let mut serializer =
                serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
            value.serialize(&mut serializer)?;
            Ok(buffer)
        }
    }
}

/// Parsed content of an existing JSON file, or `None` if it cannot be read.
fn read_existing_json(path: &Path) -> Option<Value> {
    let bytes = fs::read(path).ok()?;
    let text = decode_text(&bytes, &path.to_string_lossy()).ok()?;
    let mut value: Value = serde_json::from_str(&text).ok()?;
    strip_nulls(&mut value);
    Some(value)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Write a structured document unless the existing file already parses to the same value.
pub(crate) fn write_json(
    target: &Path,
    name: &str,
    value: &Value,
    layout: JsonLayout,
    report: &mut WriteReport,
) -> Result<()> {
    let mut value = value.clone();
    strip_nulls(&mut value);

    let path = target_path(target, name);
    if read_existing_json(&path).as_ref() == Some(&value) {
        debug!("{} is unchanged", name);
        report.record(name, false);
        return Ok(());
    }

    write_file(&path, &serialize(&value, layout)?)?;
    debug!("Wrote {}", name);
    report.record(name, true);
    Ok(())
}

/// Write an opaque asset unless the existing file holds identical bytes.
pub(crate) fn write_bytes(
    target: &Path,
    name: &str,
    bytes: &[u8],
    report: &mut WriteReport,
) -> Result<()> {
    let path = target_path(target, name);
    if fs::read(&path).is_ok_and(|existing| existing == bytes) {
        debug!("{} is unchanged", name);
        report.record(name, false);
        return Ok(());
    }

    write_file(&path, bytes)?;
    debug!("Wrote {}", name);
    report.record(name, true);
    Ok(())
}
