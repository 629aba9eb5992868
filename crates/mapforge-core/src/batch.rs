//! Processing many songs into the maps directory tree.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use serde_json::Value;

use crate::bundle::{JsonLayout, MapBundle, WriteReport, hash_bundle, write_json};
use crate::config::{Config, MapsLayout};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::song::{MapSource, Song};

/// Load, transform and write the bundle of one song into `target_parent/<identity>`.
pub fn process_song(song: &Song, pipeline: &Pipeline, target_parent: &Path) -> Result<WriteReport> {
    let mut bundle = MapBundle::load(song.download_path())?;
    pipeline.run(&mut bundle, song)?;
    bundle.write(&target_parent.join(song.identity()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleStatus {
    Processed { written: usize, unchanged: usize },
    /// The song's source is disabled in the configuration.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutcome {
    pub identity: String,
    pub validated: bool,
    pub status: BundleStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<BundleOutcome>,
    /// Output directories removed because no song maps to them anymore.
    pub pruned: Vec<PathBuf>,
}

impl BatchReport {
    fn count(&self, matches: impl Fn(&BundleStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| matches(&o.status)).count()
    }

    pub fn processed_count(&self) -> usize {
        self.count(|status| matches!(status, BundleStatus::Processed { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|status| matches!(status, BundleStatus::Skipped))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|status| matches!(status, BundleStatus::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

/// Runs every song through the pipeline of its source.
///
/// A failing bundle is logged and recorded; the remaining songs are still
/// processed. Its previous output is left in place.
#[derive(Debug)]
pub struct BatchRunner {
    config: Config,
    layout: MapsLayout,
    pipelines: HashMap<MapSource, Pipeline>,
}

impl BatchRunner {
    pub fn new(config: Config, layout: MapsLayout) -> Self {
        Self {
            config,
            layout,
            pipelines: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &MapsLayout {
        &self.layout
    }

    fn pipeline(&mut self, source: MapSource) -> &Pipeline {
        let config = &self.config;
        let layout = &self.layout;
        self.pipelines
            .entry(source)
            .or_insert_with(|| Pipeline::for_source(source, config, layout))
    }

    pub fn run(&mut self, songs: &[Song]) -> Result<BatchReport> {
        let validated_dir = self.layout.validated_dir();
        let unvalidated_dir = self.layout.unvalidated_dir();
        fs::create_dir_all(&validated_dir)?;
        fs::create_dir_all(&unvalidated_dir)?;

        let mut report = BatchReport::default();
        let mut validated_keep = Vec::new();
        let mut unvalidated_keep = Vec::new();

        for song in songs {
            let identity = song.identity();
            let target_parent = self.layout.output_dir(song.validated);
            if song.validated {
                validated_keep.push(identity.clone());
            } else {
                unvalidated_keep.push(identity.clone());
            }

            let status = if !self.config.source_enabled(song.source) {
                info!("Skipping {} ({} is disabled)", identity, song.source);
                BundleStatus::Skipped
            } else {
                let pipeline = self.pipeline(song.source);
                match process_song(song, pipeline, &target_parent) {
                    Ok(write) => BundleStatus::Processed {
                        written: write.written.len(),
                        unchanged: write.unchanged.len(),
                    },
                    Err(e) => {
                        error!("Failed to process {}: {}", identity, e);
                        BundleStatus::Failed(e.to_string())
                    }
                }
            };
            report.outcomes.push(BundleOutcome {
                identity,
                validated: song.validated,
                status,
            });
        }

        report.pruned.extend(prune_stale(&validated_dir, &validated_keep)?);
        report.pruned.extend(prune_stale(&unvalidated_dir, &unvalidated_keep)?);
        Ok(report)
    }
}

/// Delete subdirectories of `dir` whose name is not in `keep`.
pub fn prune_stale(dir: &Path, keep: &[String]) -> Result<Vec<PathBuf>> {
    let mut pruned = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if keep.contains(&name) {
            continue;
        }
        let path = entry.path();
        match fs::remove_dir_all(&path) {
            Ok(()) => {
                info!("Removed stale output {}", path.display());
                pruned.push(path);
            }
            Err(e) => warn!("Could not remove {}: {}", path.display(), e),
        }
    }
    pruned.sort();
    Ok(pruned)
}

/// Name of the hash mapping written to the validated output directory.
pub const HASH_MAPPING_FILE_NAME: &str = "hashes.json";

/// Map the content hash of every processed bundle to the hash of its
/// BeatSaver download.
///
/// Output directories without a matching `<identity>.zip` download are left
/// out. A bundle that cannot be hashed is logged and skipped.
pub fn create_hash_mapping(layout: &MapsLayout) -> Result<BTreeMap<String, String>> {
    let downloads = layout.download_dir(MapSource::BeatSaver);
    let mut mapping = BTreeMap::new();
    for dir in [layout.validated_dir(), layout.unvalidated_dir()] {
        if !dir.is_dir() {
            continue;
        }
        info!("Generating hashes for {}", dir.display());
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                entries.push(entry.path());
            }
        }
        entries.sort();

        for output in entries {
            let Some(name) = output.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let download = downloads.join(format!("{}.zip", name));
            if !download.is_file() {
                continue;
            }
            match (hash_bundle(&output), hash_bundle(&download)) {
                (Ok(processed), Ok(original)) => {
                    mapping.insert(processed, original);
                }
                (Err(e), _) | (_, Err(e)) => warn!("Could not hash {}: {}", name, e),
            }
        }
    }
    Ok(mapping)
}

/// Write the hash mapping to `Maps/hashes.json`, leaving an identical file untouched.
pub fn write_hash_mapping(layout: &MapsLayout) -> Result<WriteReport> {
    let mapping = create_hash_mapping(layout)?;
    let value = Value::Object(mapping.into_iter().map(|(k, v)| (k, Value::String(v))).collect());
    let mut report = WriteReport::default();
    write_json(
        &layout.validated_dir(),
        HASH_MAPPING_FILE_NAME,
        &value,
        JsonLayout::Pretty,
        &mut report,
    )?;
    Ok(report)
}
