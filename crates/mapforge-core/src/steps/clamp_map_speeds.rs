use tracing::info;

use crate::bundle::MapBundle;
use crate::config::{Adjustment, ClampTable};
use crate::error::Result;
use crate::map::{LOWERED_MARKER, RAISED_MARKER};
use crate::pipeline::Step;
use crate::song::Song;

/// Keeps note jump speeds within the configured per-rank bounds.
#[derive(Debug, Clone, Default)]
pub struct ClampMapSpeeds {
    bounds: ClampTable,
}

impl ClampMapSpeeds {
    pub fn new(bounds: ClampTable) -> Self {
        Self { bounds }
    }
}

impl Step for ClampMapSpeeds {
    fn name(&self) -> &'static str {
        "ClampMapSpeeds"
    }

    fn apply(&self, bundle: &mut MapBundle, _song: &Song) -> Result<()> {
        for entry in bundle.info_mut().difficulties_mut() {
            let Some(bounds) = self.bounds.bounds(entry.rank()) else {
                continue;
            };
            let njs = entry.note_jump_speed();
            match bounds.check(njs) {
                Some(Adjustment::Raised(minimum)) => {
                    info!(
                        "Increasing the note jump speed of {} from {} to {}",
                        entry.difficulty_label(),
                        njs,
                        minimum
                    );
                    entry.set_note_jump_speed(minimum);
                    entry.add_label_modifier(RAISED_MARKER);
                }
                Some(Adjustment::Lowered(maximum)) => {
                    info!(
                        "Decreasing the note jump speed of {} from {} to {}",
                        entry.difficulty_label(),
                        njs,
                        maximum
                    );
                    entry.set_note_jump_speed(maximum);
                    entry.add_label_modifier(LOWERED_MARKER);
                }
                None => {}
            }
        }
        Ok(())
    }
}
