use std::path::PathBuf;

use tracing::info;

use crate::bundle::{BundleSource, INFO_FILE_NAME, MapBundle, same_file_name};
use crate::error::Result;
use crate::pipeline::Step;
use crate::song::Song;

/// Replaces or adds files from `<overrides>/<bundle identity>/`.
#[derive(Debug, Clone)]
pub struct OverrideFiles {
    overrides_dir: PathBuf,
}

impl OverrideFiles {
    pub fn new(overrides_dir: impl Into<PathBuf>) -> Self {
        Self {
            overrides_dir: overrides_dir.into(),
        }
    }
}

impl Step for OverrideFiles {
    fn name(&self) -> &'static str {
        "OverrideFiles"
    }

    fn apply(&self, bundle: &mut MapBundle, _song: &Song) -> Result<()> {
        let dir = self.overrides_dir.join(bundle.identity());
        if !dir.is_dir() {
            return Ok(());
        }

        let mut files = BundleSource::Directory(dir).read_files()?;
        // The info document decides how the remaining files are classified.
        files.sort_by_key(|(name, _)| !same_file_name(name, INFO_FILE_NAME));

        for (name, bytes) in files {
            if same_file_name(&name, INFO_FILE_NAME) {
                info!("Overriding info file");
            } else if bundle.difficulty(&name).is_some() {
                info!("Overriding difficulty file {}", name);
            } else if bundle.info().references(&name) {
                info!("Adding difficulty file {}", name);
            } else {
                info!("Overriding other file {}", name);
            }
            bundle.insert_file(&name, bytes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;
    use crate::map::InfoFields;
    use crate::steps::test_support::*;

    fn base_bundle() -> MapBundle {
        bundle(
            info(120.0, json!([{
                "_beatmapCharacteristicName": "Standard",
                "_difficultyBeatmaps": [entry("Expert", 7, "Expert.dat", 16.0, 0.0)]
            }])),
            vec![
                ("Expert.dat", notes(json!([]))),
                ("Hard.dat", notes(json!([{"_time": 1, "_lineIndex": 0, "_type": 0}]))),
            ],
        )
    }

    #[test]
    fn test_no_override_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = base_bundle();
        let before = bundle.clone();
        OverrideFiles::new(dir.path()).apply(&mut bundle, &song()).unwrap();
        assert_eq!(bundle, before);
    }

    #[test]
    fn test_info_override_applies_first() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("test");
        fs::create_dir_all(&target).unwrap();

        let new_info = info(150.0, json!([{
            "_beatmapCharacteristicName": "Standard",
            "_difficultyBeatmaps": [
                entry("Hard", 5, "Hard.dat", 14.0, 0.0),
                entry("Expert", 7, "Expert.dat", 16.0, 0.0),
                entry("ExpertPlus", 9, "ExpertPlus.dat", 18.0, 0.0)
            ]
        }]));
        fs::write(target.join("info.dat"), serde_json::to_vec(&new_info).unwrap()).unwrap();
        fs::write(
            target.join("ExpertPlus.dat"),
            serde_json::to_vec(&notes(json!([]))).unwrap(),
        )
        .unwrap();
        fs::write(target.join("cover.jpg"), [1u8, 2, 3]).unwrap();

        let mut bundle = base_bundle();
        OverrideFiles::new(dir.path()).apply(&mut bundle, &song()).unwrap();

        assert_eq!(bundle.info().beats_per_minute(), 150.0);
        assert!(bundle.difficulty("Hard.dat").is_some());
        assert!(bundle.difficulty("ExpertPlus.dat").is_some());
        assert!(bundle.dangling_references().is_empty());
        assert_eq!(bundle.assets().get("cover.jpg"), Some(&vec![1, 2, 3]));
    }
}
