use tracing::info;

use crate::bundle::MapBundle;
use crate::error::Result;
use crate::map::InfoFields;
use crate::pipeline::Step;
use crate::song::Song;

/// Overwrites the song title, subtitle and artist with the song record's.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetSongData;

impl Step for SetSongData {
    fn name(&self) -> &'static str {
        "SetSongData"
    }

    fn apply(&self, bundle: &mut MapBundle, song: &Song) -> Result<()> {
        info!("Setting song data to {}", song.display_name(false));
        let info = bundle.info_mut();
        info.set_song_author(&song.artist);
        info.set_song_title(&song.title);
        info.set_song_subtitle(song.subtitle.as_deref().unwrap_or_default());
        Ok(())
    }
}
