use tracing::info;

use crate::bundle::MapBundle;
use crate::error::Result;
use crate::map::NoteData;
use crate::pipeline::Step;
use crate::song::Song;

/// Mods needed to play difficulties that animate notes with point definitions.
pub const POINT_DEFINITION_REQUIREMENTS: [&str; 2] = ["Noodle Extensions", "Chroma"];

/// Adds mod requirements some maps use without declaring.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddMissingRequirements;

impl Step for AddMissingRequirements {
    fn name(&self) -> &'static str {
        "AddMissingRequirements"
    }

    fn apply(&self, bundle: &mut MapBundle, _song: &Song) -> Result<()> {
        let needs_requirements = bundle
            .info()
            .difficulties()
            .map(|entry| bundle.difficulty_for(entry).map(NoteData::uses_point_definitions))
            .collect::<Result<Vec<bool>>>()?;

        let entries = bundle.info_mut().difficulties_mut();
        for (entry, needed) in entries.zip(needs_requirements) {
            if !needed {
                continue;
            }
            let mut requirements = entry.requirements();
            let mut changed = false;
            for requirement in POINT_DEFINITION_REQUIREMENTS {
                if !requirements.iter().any(|r| r == requirement) {
                    info!(
                        "Adding \"{}\" requirement to {}",
                        requirement,
                        entry.difficulty_label()
                    );
                    requirements.push(requirement.to_string());
                    changed = true;
                }
            }
            if changed {
                entry.set_requirements(requirements);
            }
        }
        Ok(())
    }
}
