//! Content hash of a bundle.
//!
//! Map repositories identify a bundle by the SHA-1 of its info document
//! followed by the files that document references, in reference order:
//! - Legacy: every `_beatmapFilename`, set by set.
//! - Current: `audio.audioDataFilename`, then each difficulty's
//!   `beatmapDataFilename` and `lightshowDataFilename`.
//!
//! Referenced files are hashed as raw bytes, once per reference.

use std::path::Path;

use serde_json::Value;
use sha1::{Digest, Sha1};

use super::{BundleSource, FileMap, INFO_FILE_NAME};
use crate::error::{Error, Result};
use crate::map::SchemaGeneration;
use crate::map::json::{JsonMap, parse_object, require_array};

/// Hash the bundle at `path` (a directory or a ZIP archive).
pub fn hash_bundle(path: &Path) -> Result<String> {
    let files = BundleSource::detect(path)?.read_files()?;
    content_hash(&files)
}

/// Hex-encoded SHA-1 over the info document and the files it references.
pub fn content_hash(files: &[(String, Vec<u8>)]) -> Result<String> {
    let files: FileMap<&[u8]> = files
        .iter()
        .map(|(name, bytes)| (name.clone(), bytes.as_slice()))
        .collect();
    let info = files
        .get(INFO_FILE_NAME)
        .copied()
        .ok_or(Error::MissingInfoFile { found: 0 })?;
    let document = parse_object(info, INFO_FILE_NAME)?;

    let mut hasher = Sha1::new();
    hasher.update(info);
    for name in hashed_references(&document)? {
        let bytes = files
            .get(&name)
            .ok_or_else(|| Error::DanglingReference(name.clone()))?;
        hasher.update(bytes);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Referenced file names, in hashing order.
fn hashed_references(document: &JsonMap) -> Result<Vec<String>> {
    let mut names = Vec::new();
    match SchemaGeneration::detect_info(document)? {
        SchemaGeneration::Legacy => {
            for set in require_array(document, "_difficultyBeatmapSets")? {
                let set = set
                    .as_object()
                    .ok_or_else(|| Error::missing_field("_difficultyBeatmapSets"))?;
                for entry in require_array(set, "_difficultyBeatmaps")? {
                    let name = entry
                        .get("_beatmapFilename")
                        .and_then(Value::as_str)
                        .ok_or_else(|| Error::missing_field("_beatmapFilename"))?;
                    names.push(name.to_string());
                }
            }
        }
        SchemaGeneration::Current => {
            if let Some(audio) = document
                .get("audio")
                .and_then(|audio| audio.get("audioDataFilename"))
                .and_then(Value::as_str)
            {
                names.push(audio.to_string());
            }
            for entry in require_array(document, "difficultyBeatmaps")? {
                for key in ["beatmapDataFilename", "lightshowDataFilename"] {
                    if let Some(name) = entry.get(key).and_then(Value::as_str) {
                        names.push(name.to_string());
                    }
                }
            }
        }
    }
    Ok(names)
}
