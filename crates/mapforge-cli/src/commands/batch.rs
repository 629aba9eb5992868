//! Process every song in a manifest.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use mapforge_core::{BatchRunner, Config, MapsLayout, Song, report};
use tracing::info;

pub fn run(manifest: &Path, config: &Path, maps_dir: &Path) -> Result<()> {
    let config = Config::load_or_create(config)
        .with_context(|| format!("Failed to load config from {}", config.display()))?;
    let songs = load_manifest(manifest)?;
    info!("Loaded {} songs from {}", songs.len(), manifest.display());

    let mut runner = BatchRunner::new(config, MapsLayout::new(maps_dir));
    let report = runner.run(&songs)?;
    println!("{}", report::format_batch_report(&report));

    if report.has_failures() {
        bail!("{} of {} bundles failed", report.failed_count(), report.outcomes.len());
    }
    Ok(())
}

fn load_manifest(path: &Path) -> Result<Vec<Song>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))
}
