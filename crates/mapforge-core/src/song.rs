//! The song record a bundle is processed for.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::bundle::source_identity;

/// Where a bundle came from. Each source has its own pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum MapSource {
    #[strum(to_string = "BeatSaver", serialize = "beat-saver")]
    BeatSaver,
    #[strum(to_string = "BeatSage", serialize = "beat-sage")]
    BeatSage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub artist: String,
    #[serde(rename = "songName", alias = "title")]
    pub title: String,
    #[serde(rename = "songSubName", alias = "subtitle", default)]
    pub subtitle: Option<String>,
    #[serde(rename = "mapSource", alias = "source")]
    pub source: MapSource,
    #[serde(rename = "mapDownloadPath", alias = "downloadPath")]
    pub download_path: PathBuf,
    #[serde(default)]
    pub validated: bool,
    #[serde(
        rename = "subjectiveQualityRating",
        alias = "rating",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<String>,
}

impl Song {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        source: MapSource,
        download_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            subtitle: None,
            source,
            download_path: download_path.into(),
            validated: false,
            rating: None,
        }
    }

    /// "Artist - Title Subtitle", optionally made safe for use as a file name.
    pub fn display_name(&self, escaped: bool) -> String {
        let mut name = format!("{} - {}", self.artist, self.title);
        if let Some(subtitle) = self.subtitle.as_deref().filter(|s| !s.is_empty()) {
            name.push(' ');
            name.push_str(subtitle);
        }
        if escaped {
            name = name.replace(['/', '\\', ':'], "_");
        }
        name
    }

    /// Name shared by the override directory and the output directory.
    pub fn identity(&self) -> String {
        source_identity(&self.download_path)
    }

    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    /// Rating, if one was given and is non-empty.
    pub fn rating(&self) -> Option<&str> {
        self.rating.as_deref().filter(|rating| !rating.is_empty())
    }
}
