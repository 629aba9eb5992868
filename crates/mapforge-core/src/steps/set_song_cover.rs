use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::bundle::MapBundle;
use crate::error::Result;
use crate::map::InfoFields;
use crate::pipeline::Step;
use crate::song::Song;

/// Cover extensions, in order of preference.
pub const COVER_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Installs `<covers>/<display name>.<ext>` as the bundle's cover.
#[derive(Debug, Clone)]
pub struct SetSongCover {
    covers_dir: PathBuf,
}

impl SetSongCover {
    pub fn new(covers_dir: impl Into<PathBuf>) -> Self {
        Self {
            covers_dir: covers_dir.into(),
        }
    }

    fn find_cover(&self, song: &Song) -> Option<(PathBuf, &'static str)> {
        let name = song.display_name(true);
        COVER_EXTENSIONS.iter().find_map(|extension| {
            let path = self.covers_dir.join(format!("{}.{}", name, extension));
            path.is_file().then_some((path, *extension))
        })
    }
}

impl Step for SetSongCover {
    fn name(&self) -> &'static str {
        "SetSongCover"
    }

    fn apply(&self, bundle: &mut MapBundle, song: &Song) -> Result<()> {
        let Some((path, extension)) = self.find_cover(song) else {
            debug!("No replacement cover for {}", song.display_name(false));
            return Ok(());
        };

        info!("Replacing album cover with {}", path.display());
        let bytes = fs::read(&path)?;
        let old_cover = bundle.info().cover_image_filename().to_string();
        bundle.assets_mut().remove(&old_cover);

        let new_cover = format!("cover.{}", extension);
        bundle.insert_asset(new_cover.as_str(), bytes);
        bundle.info_mut().set_cover_image_filename(&new_cover);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::steps::test_support::*;

    fn cover_bundle() -> MapBundle {
        let mut raw = vec![(
            "Info.dat".to_string(),
            serde_json::to_vec(&info(120.0, json!([]))).unwrap(),
        )];
        raw.push(("Cover.JPG".to_string(), vec![0xff, 0xd8]));
        MapBundle::from_files("test", raw).unwrap()
    }

    #[test]
    fn test_replaces_cover_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Artist - Title.jpg"), [1u8]).unwrap();
        std::fs::write(dir.path().join("Artist - Title.png"), [2u8]).unwrap();

        let mut bundle = cover_bundle();
        SetSongCover::new(dir.path()).apply(&mut bundle, &song()).unwrap();

        assert_eq!(bundle.info().cover_image_filename(), "cover.png");
        assert_eq!(bundle.assets().names().collect::<Vec<_>>(), ["cover.png"]);
        assert_eq!(bundle.assets().get("cover.png"), Some(&vec![2u8]));
    }

    #[test]
    fn test_no_cover_available() {
        let dir = tempfile::tempdir().unwrap();
        let mut bundle = cover_bundle();
        let before = bundle.clone();
        SetSongCover::new(dir.path()).apply(&mut bundle, &song()).unwrap();
        assert_eq!(bundle, before);
    }
}
