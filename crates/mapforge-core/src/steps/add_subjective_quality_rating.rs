use tracing::{debug, info};

use crate::bundle::MapBundle;
use crate::error::Result;
use crate::map::InfoFields;
use crate::pipeline::Step;
use crate::song::Song;

/// Prefixes the level author with the song's rating, e.g. `[A] Mapper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddSubjectiveQualityRating;

impl Step for AddSubjectiveQualityRating {
    fn name(&self) -> &'static str {
        "AddSubjectiveQualityRating"
    }

    fn apply(&self, bundle: &mut MapBundle, song: &Song) -> Result<()> {
        let Some(rating) = song.rating() else {
            debug!("Map has no subjective quality rating");
            return Ok(());
        };
        let prefix = format!("[{}] ", rating);
        if bundle.info_mut().ensure_level_author_prefix(&prefix) {
            info!("Adding subjective quality rating \"{}\"", rating);
        }
        Ok(())
    }
}
