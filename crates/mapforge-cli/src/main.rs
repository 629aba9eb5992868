mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mapforge=info,mapforge_core=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match args.command {
        Command::Bundle {
            source,
            output,
            source_kind,
            artist,
            title,
            subtitle,
            rating,
            config,
            maps_dir,
        } => commands::bundle::run(commands::bundle::BundleArgs {
            source,
            output,
            source_kind,
            artist,
            title,
            subtitle,
            rating,
            config,
            maps_dir,
        }),
        Command::Batch {
            manifest,
            config,
            maps_dir,
        } => commands::batch::run(&manifest, &config, &maps_dir),
        Command::Hashes { maps_dir } => commands::hashes::run(&maps_dir),
        Command::InitConfig { config, force } => commands::init_config::run(&config, force),
    }
}
