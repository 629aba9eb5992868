//! Processing configuration.
//!
//! - `Config` - clamp tables and enabled sources, stored as JSON
//! - `ClampTable`, `ClampBounds` - per-rank bounds for the clamp steps
//! - `MapsLayout` - conventional input/output directories

mod clamp;
mod layout;

pub use clamp::*;
pub use layout::*;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::map::DifficultyRank;
use crate::song::MapSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Note jump speed bounds, in units per second.
    #[serde(rename = "ClampedMapSpeeds", alias = "clampedMapSpeeds", default)]
    pub map_speeds: ClampTable,

    /// Reaction time bounds, in milliseconds.
    #[serde(rename = "ClampedReactionTimes", alias = "clampedReactionTimes", default)]
    pub reaction_times: ClampTable,

    /// Sources to process; `None` enables all of them.
    #[serde(
        rename = "EnabledSources",
        alias = "enabledSources",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled_sources: Option<Vec<MapSource>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_speeds: ClampTable::new()
                .with_bounds(DifficultyRank::Hard, ClampBounds::new(17.0, 19.0))
                .with_bounds(DifficultyRank::Expert, ClampBounds::new(17.0, 19.0))
                .with_bounds(DifficultyRank::ExpertPlus, ClampBounds::new(18.0, 20.0)),
            reaction_times: ClampTable::new()
                .with_bounds(DifficultyRank::Hard, ClampBounds::new(600.0, 750.0))
                .with_bounds(DifficultyRank::Expert, ClampBounds::new(600.0, 700.0))
                .with_bounds(DifficultyRank::ExpertPlus, ClampBounds::new(600.0, 700.0)),
            enabled_sources: None,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::ConfigParseError(e.to_string()))
    }

    /// Load `path`, writing the defaults there first if it does not exist.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        info!("Wrote default configuration to {}", path.display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn source_enabled(&self, source: MapSource) -> bool {
        self.enabled_sources
            .as_ref()
            .is_none_or(|sources| sources.contains(&source))
    }
}
