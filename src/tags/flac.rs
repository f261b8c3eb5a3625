//! FLAC variant: Vorbis comments plus PICTURE metadata blocks.

use super::{Container, CoverArt, TagCodec, TagSet, TaggedAudio, decodable_cover};
use crate::error::Result;

pub struct FlacTag {
    audio: TaggedAudio,
}

impl FlacTag {
    pub(crate) fn new(audio: TaggedAudio) -> Self {
        Self { audio }
    }
}

impl TagCodec for FlacTag {
    fn container(&self) -> Container {
        Container::Flac
    }

    fn read_tags(&self) -> TagSet {
        let mut tags = self.audio.read_fields();
        tags.lyrics = self.read_lyrics();
        tags
    }

    /// First PICTURE block, whatever its type
    fn read_cover(&self) -> Option<CoverArt> {
        decodable_cover(self.audio.pictures().iter().take(1))
    }

    /// `LYRICS` comment
    fn read_lyrics(&self) -> String {
        self.audio.lyrics_item()
    }

    fn write_tags(&mut self, tags: &TagSet) -> Result<bool> {
        self.audio.write_fields(tags)
    }

    fn write_lyrics(&mut self, text: &str) -> Result<bool> {
        let current = self.read_lyrics();
        self.audio.write_lyrics_item(&current, text)
    }

    /// Clears every picture block, then adds one
    fn write_cover(&mut self, data: &[u8], mime: &str) -> Result<()> {
        self.audio.replace_pictures(data, mime, |_| true)
    }
}
