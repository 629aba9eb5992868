//! Write the processed-to-download hash mapping.

use std::path::Path;

use anyhow::Result;
use mapforge_core::batch::HASH_MAPPING_FILE_NAME;
use mapforge_core::{MapsLayout, write_hash_mapping};

pub fn run(maps_dir: &Path) -> Result<()> {
    let layout = MapsLayout::new(maps_dir);
    let report = write_hash_mapping(&layout)?;
    let path = layout.validated_dir().join(HASH_MAPPING_FILE_NAME);
    if report.is_unchanged() {
        eprintln!("{} is up to date", path.display());
    } else {
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}
