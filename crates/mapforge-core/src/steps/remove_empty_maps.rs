use tracing::info;

use crate::bundle::{MapBundle, same_file_name};
use crate::error::Result;
use crate::map::InfoFields;
use crate::pipeline::Step;
use crate::song::Song;

/// Removes difficulties without notes, except in lightshow sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveEmptyMaps;

impl Step for RemoveEmptyMaps {
    fn name(&self) -> &'static str {
        "RemoveEmptyMaps"
    }

    fn apply(&self, bundle: &mut MapBundle, _song: &Song) -> Result<()> {
        let mut empty_files: Vec<String> = Vec::new();
        for set in bundle.info().beatmap_sets() {
            if set.is_lightshow() {
                continue;
            }
            for entry in set.entries() {
                if bundle.difficulty_for(entry)?.is_empty() {
                    empty_files.push(entry.file_name().to_string());
                }
            }
        }
        if empty_files.is_empty() {
            return Ok(());
        }

        for set in bundle.info_mut().beatmap_sets_mut() {
            if set.is_lightshow() {
                continue;
            }
            let removed = set.retain_entries(|entry| {
                !empty_files
                    .iter()
                    .any(|name| same_file_name(name, entry.file_name()))
            });
            for entry in removed {
                info!(
                    "Removing {} difficulty {} (has no notes)",
                    set.characteristic(),
                    entry.rank().name()
                );
            }
        }
        Ok(())
    }
}
