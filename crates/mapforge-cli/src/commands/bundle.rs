//! Process a single bundle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use mapforge_core::{Config, InfoFields, MapBundle, MapSource, MapsLayout, Pipeline, Song, report};
use tracing::info;

pub struct BundleArgs {
    pub source: PathBuf,
    pub output: PathBuf,
    pub source_kind: MapSource,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub rating: Option<String>,
    pub config: PathBuf,
    pub maps_dir: PathBuf,
}

pub fn run(args: BundleArgs) -> Result<()> {
    let config = Config::load_or_create(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let mut bundle = MapBundle::load(&args.source)
        .with_context(|| format!("Failed to load {}", args.source.display()))?;

    // Song fields left unset keep the bundle's own values.
    let info = bundle.info();
    let mut song = Song::new(
        args.artist.unwrap_or_else(|| info.song_author().to_string()),
        args.title.unwrap_or_else(|| info.song_title().to_string()),
        args.source_kind,
        &args.source,
    );
    song.subtitle = args
        .subtitle
        .or_else(|| Some(info.song_subtitle().to_string()).filter(|s| !s.is_empty()));
    song.rating = args.rating;

    let pipeline = Pipeline::for_source(song.source, &config, &MapsLayout::new(&args.maps_dir));
    info!("Running {} steps on {}", pipeline.len(), song.display_name(false));
    pipeline.run(&mut bundle, &song)?;

    let report = bundle
        .write(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    eprintln!("{}", report::format_write_summary(bundle.identity(), &report));
    Ok(())
}
