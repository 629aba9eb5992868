//! In-memory map bundle.
//!
//! A bundle owns one info document, the note-data documents its difficulties
//! point at, and every other file as an opaque asset. It is loaded from a
//! directory or a ZIP archive and written to a directory, skipping files whose
//! content is already up to date.

mod files;
mod hash;
mod source;
mod write;

pub use files::*;
pub use hash::{content_hash, hash_bundle};
pub use source::*;
pub use write::{JsonLayout, WriteReport};

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::map::{DifficultyEntry, InfoFields, MapInfo, NoteData};
use write::write_bytes;
pub(crate) use write::write_json;

/// File name of the info document, matched ignoring case on load.
pub const INFO_FILE_NAME: &str = "Info.dat";

#[derive(Debug, Clone, PartialEq)]
pub struct MapBundle {
    identity: String,
    info: MapInfo,
    difficulties: FileMap<NoteData>,
    assets: FileMap<Vec<u8>>,
}

impl MapBundle {
    /// Load a bundle from a directory or a ZIP archive.
    pub fn load(path: &Path) -> Result<Self> {
        let source = BundleSource::detect(path)?;
        let files = source.read_files()?;
        info!("Loading {} ({} files)", path.display(), files.len());
        Self::from_files(source.identity(), files)
    }

    /// Build a bundle from `(name, bytes)` pairs.
    ///
    /// Exactly one file may be named `Info.dat` ignoring case, and no two
    /// files may share a name ignoring case.
    pub fn from_files(identity: impl Into<String>, files: Vec<(String, Vec<u8>)>) -> Result<Self> {
        let found = files
            .iter()
            .filter(|(name, _)| same_file_name(name, INFO_FILE_NAME))
            .count();
        if found != 1 {
            return Err(Error::MissingInfoFile { found });
        }

        let mut assets = FileMap::new();
        for (name, bytes) in files {
            if let Err((existing, _)) = assets.try_insert(name.clone(), bytes) {
                return Err(Error::FileNameCollision {
                    first: existing,
                    second: name,
                });
            }
        }

        let info_bytes = assets
            .remove(INFO_FILE_NAME)
            .ok_or(Error::MissingInfoFile { found: 0 })?;
        let info = MapInfo::from_slice(&info_bytes)?;

        let mut bundle = Self {
            identity: identity.into(),
            info,
            difficulties: FileMap::new(),
            assets,
        };
        bundle.adopt_referenced_difficulties()?;
        Ok(bundle)
    }

    /// Move every asset the info document references into the difficulty map.
    fn adopt_referenced_difficulties(&mut self) -> Result<()> {
        for name in self.info.referenced_files() {
            if self.difficulties.contains(&name) {
                continue;
            }
            match self.assets.remove_entry(&name) {
                Some((stored, bytes)) => {
                    let data = NoteData::from_slice(&bytes, &stored)?;
                    self.difficulties.insert(stored, data);
                }
                None => warn!(
                    "{}: difficulty file {} is referenced but missing",
                    self.identity, name
                ),
            }
        }
        Ok(())
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut MapInfo {
        &mut self.info
    }

    /// Replace the info document and pick up any newly referenced difficulties.
    pub fn set_info(&mut self, info: MapInfo) -> Result<()> {
        self.info = info;
        self.adopt_referenced_difficulties()
    }

    pub fn difficulties(&self) -> &FileMap<NoteData> {
        &self.difficulties
    }

    pub fn difficulties_mut(&mut self) -> &mut FileMap<NoteData> {
        &mut self.difficulties
    }

    pub fn difficulty(&self, name: &str) -> Option<&NoteData> {
        self.difficulties.get(name)
    }

    pub fn difficulty_mut(&mut self, name: &str) -> Option<&mut NoteData> {
        self.difficulties.get_mut(name)
    }

    /// Note data of `entry`, failing if the bundle does not contain it.
    pub fn difficulty_for(&self, entry: &DifficultyEntry) -> Result<&NoteData> {
        self.difficulties
            .get(entry.file_name())
            .ok_or_else(|| Error::DanglingReference(entry.file_name().to_string()))
    }

    /// Insert or replace a note-data document.
    pub fn insert_difficulty(&mut self, name: impl Into<String>, data: NoteData) {
        let name = name.into();
        self.assets.remove(&name);
        self.difficulties.insert(name, data);
    }

    pub fn assets(&self) -> &FileMap<Vec<u8>> {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut FileMap<Vec<u8>> {
        &mut self.assets
    }

    /// Insert or replace an opaque asset.
    pub fn insert_asset(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        let name = name.into();
        self.difficulties.remove(&name);
        self.assets.insert(name, bytes);
    }

    /// Splice a raw file into the bundle.
    ///
    /// The info document replaces the current one; known or referenced
    /// difficulty files are parsed as note data; anything else is an asset.
    pub fn insert_file(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        if same_file_name(name, INFO_FILE_NAME) {
            self.set_info(MapInfo::from_slice(&bytes)?)
        } else if self.difficulties.contains(name) || self.info.references(name) {
            let data = NoteData::from_slice(&bytes, name)?;
            self.insert_difficulty(name, data);
            Ok(())
        } else {
            self.insert_asset(name, bytes);
            Ok(())
        }
    }

    /// Difficulty file names the info document references but the bundle lacks.
    pub fn dangling_references(&self) -> Vec<String> {
        self.info
            .referenced_files()
            .into_iter()
            .filter(|name| !self.difficulties.contains(name))
            .collect()
    }

    /// Write every file under `target`, leaving up-to-date files untouched.
    pub fn write(&self, target: &Path) -> Result<WriteReport> {
        fs::create_dir_all(target)?;
        let mut report = WriteReport::default();

        write_json(
            target,
            INFO_FILE_NAME,
            &self.info.to_value(),
            JsonLayout::Pretty,
            &mut report,
        )?;
        for (name, data) in self.difficulties.iter() {
            write_json(target, name, &data.to_value(), JsonLayout::Compact, &mut report)?;
        }
        for (name, bytes) in self.assets.iter() {
            write_bytes(target, name, bytes, &mut report)?;
        }

        info!(
            "{}: {} files written, {} unchanged",
            self.identity,
            report.written.len(),
            report.unchanged.len()
        );
        Ok(report)
    }
}
