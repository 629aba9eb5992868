//! CLI argument definitions for mapforge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mapforge_core::MapSource;

#[derive(Parser)]
#[command(name = "mapforge")]
#[command(about = "Beat Saber map bundle processor", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process a single bundle (directory or .zip archive)
    Bundle {
        /// Bundle directory or archive
        source: PathBuf,
        /// Directory the processed bundle is written to
        #[arg(short, long)]
        output: PathBuf,
        /// Where the bundle was downloaded from
        #[arg(long = "source", value_name = "KIND", default_value = "beat-saver")]
        source_kind: MapSource,
        /// Song artist (defaults to the bundle's own)
        #[arg(long)]
        artist: Option<String>,
        /// Song title (defaults to the bundle's own)
        #[arg(long)]
        title: Option<String>,
        /// Song subtitle (defaults to the bundle's own)
        #[arg(long)]
        subtitle: Option<String>,
        /// Subjective quality rating shown before the mapper name
        #[arg(long)]
        rating: Option<String>,
        /// Path to config file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
        /// Base directory holding Overrides/ and Covers/
        #[arg(long, default_value = ".")]
        maps_dir: PathBuf,
    },
    /// Process every song listed in a manifest
    Batch {
        /// JSON array of song records
        #[arg(short, long)]
        manifest: PathBuf,
        /// Path to config file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
        /// Base directory for Maps/, UnvalidatedMaps/, Overrides/ and Covers/
        #[arg(long, default_value = ".")]
        maps_dir: PathBuf,
    },
    /// Write Maps/hashes.json, mapping processed bundle hashes to download hashes
    Hashes {
        /// Base directory holding Maps/, UnvalidatedMaps/ and Downloads/
        #[arg(long, default_value = ".")]
        maps_dir: PathBuf,
    },
    /// Write the default configuration
    InitConfig {
        /// Path to config file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}
