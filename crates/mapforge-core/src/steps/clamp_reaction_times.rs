use tracing::{info, warn};

use crate::bundle::MapBundle;
use crate::config::{Adjustment, ClampTable};
use crate::error::Result;
use crate::kinematics::{is_valid_input, offset_for_reaction_time, reaction_time_for};
use crate::map::{InfoFields, LOWERED_MARKER, RAISED_MARKER};
use crate::pipeline::Step;
use crate::song::Song;

/// Keeps reaction times within the configured per-rank bounds by moving the
/// start-beat offset.
///
/// Marker directions are the reverse of [`ClampMapSpeeds`](super::ClampMapSpeeds):
/// a reaction time raised to its minimum is marked `▼`, one lowered to its
/// maximum is marked `▲`.
#[derive(Debug, Clone, Default)]
pub struct ClampReactionTimes {
    bounds: ClampTable,
}

impl ClampReactionTimes {
    pub fn new(bounds: ClampTable) -> Self {
        Self { bounds }
    }
}

impl Step for ClampReactionTimes {
    fn name(&self) -> &'static str {
        "ClampReactionTimes"
    }

    fn apply(&self, bundle: &mut MapBundle, _song: &Song) -> Result<()> {
        let bpm = bundle.info().beats_per_minute();
        for entry in bundle.info_mut().difficulties_mut() {
            let Some(bounds) = self.bounds.bounds(entry.rank()) else {
                continue;
            };
            let njs = entry.note_jump_speed();
            if !is_valid_input(bpm, njs) {
                warn!(
                    "Cannot compute the reaction time of {} (bpm {}, njs {})",
                    entry.difficulty_label(),
                    bpm,
                    njs
                );
                continue;
            }

            let reaction_time = reaction_time_for(bpm, njs, entry.start_beat_offset());
            match bounds.check(reaction_time) {
                Some(Adjustment::Raised(minimum)) => {
                    info!(
                        "Increasing the reaction time of {} from {:.0} ms to {} ms",
                        entry.difficulty_label(),
                        reaction_time,
                        minimum
                    );
                    entry.set_start_beat_offset(offset_for_reaction_time(minimum, bpm, njs));
                    entry.add_label_modifier(LOWERED_MARKER);
                }
                Some(Adjustment::Lowered(maximum)) => {
                    info!(
                        "Decreasing the reaction time of {} from {:.0} ms to {} ms",
                        entry.difficulty_label(),
                        reaction_time,
                        maximum
                    );
                    entry.set_start_beat_offset(offset_for_reaction_time(maximum, bpm, njs));
                    entry.add_label_modifier(RAISED_MARKER);
                }
                None => {}
            }
        }
        Ok(())
    }
}
