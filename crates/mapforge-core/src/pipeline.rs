//! Ordered bundle transforms.

use tracing::{debug, info};

use crate::bundle::MapBundle;
use crate::config::{Config, MapsLayout};
use crate::error::Result;
use crate::song::{MapSource, Song};
use crate::steps::{
    AddMissingRequirements, AddSimpleLightShow, AddSubjectiveQualityRating, ClampMapSpeeds,
    ClampReactionTimes, OverrideFiles, RemoveEmptyMaps, SetSongCover, SetSongData,
};

/// One transform applied to a bundle in place.
///
/// Steps must be idempotent: applying one to a bundle it already processed
/// leaves the bundle unchanged.
pub trait Step {
    fn name(&self) -> &'static str;

    fn apply(&self, bundle: &mut MapBundle, song: &Song) -> Result<()>;
}

#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// The step sequence used for bundles from `source`.
    pub fn for_source(source: MapSource, config: &Config, layout: &MapsLayout) -> Self {
        let mut pipeline = Self::new()
            .with_step(OverrideFiles::new(layout.overrides_dir()))
            .with_step(SetSongData)
            .with_step(AddMissingRequirements);
        // Generated maps never contain empty difficulties.
        if source == MapSource::BeatSaver {
            pipeline = pipeline.with_step(RemoveEmptyMaps);
        }
        pipeline
            .with_step(AddSimpleLightShow)
            .with_step(SetSongCover::new(layout.covers_dir()))
            .with_step(AddSubjectiveQualityRating)
            .with_step(ClampMapSpeeds::new(config.map_speeds.clone()))
            .with_step(ClampReactionTimes::new(config.reaction_times.clone()))
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step in order, stopping at the first failure.
    pub fn run(&self, bundle: &mut MapBundle, song: &Song) -> Result<()> {
        info!("Processing {}", bundle.identity());
        for step in &self.steps {
            debug!("Running {}", step.name());
            step.apply(bundle, song)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}
