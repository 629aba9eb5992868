use std::path::{Path, PathBuf};

use crate::song::MapSource;

/// Conventional directory layout below one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsLayout {
    base: PathBuf,
}

impl MapsLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Output for songs that passed validation.
    pub fn validated_dir(&self) -> PathBuf {
        self.base.join("Maps")
    }

    /// Output for songs that have not been validated.
    pub fn unvalidated_dir(&self) -> PathBuf {
        self.base.join("UnvalidatedMaps")
    }

    /// Per-bundle override directories, named by bundle identity.
    pub fn overrides_dir(&self) -> PathBuf {
        self.base.join("Overrides")
    }

    pub fn override_dir(&self, identity: &str) -> PathBuf {
        self.overrides_dir().join(identity)
    }

    /// Flat directory of replacement cover images.
    pub fn covers_dir(&self) -> PathBuf {
        self.base.join("Covers")
    }

    /// Untouched downloads, one subdirectory per source.
    pub fn download_dir(&self, source: MapSource) -> PathBuf {
        self.base.join("Downloads").join(source.to_string())
    }

    pub fn output_dir(&self, validated: bool) -> PathBuf {
        if validated {
            self.validated_dir()
        } else {
            self.unvalidated_dir()
        }
    }
}
