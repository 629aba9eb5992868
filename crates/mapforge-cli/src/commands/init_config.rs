//! Write the default configuration file.

use std::path::Path;

use anyhow::{Result, bail};
use mapforge_core::Config;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }
    Config::default().save(path)?;
    eprintln!("Wrote default configuration to {}", path.display());
    Ok(())
}
