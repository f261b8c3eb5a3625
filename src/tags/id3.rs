//! ID3v2 (MP3) variant.

use std::fs::File;

use lofty::config::ParseOptions;
use lofty::file::AudioFile;
use lofty::mpeg::MpegFile;
use lofty::picture::PictureType;

use super::{
    Container, CoverArt, SYNCED_FRAME_MARKER, TagCodec, TagSet, TaggedAudio, decodable_cover,
};
use crate::error::Result;

/// ID3v2 frame holding time-stamped lyrics
const SYLT: &str = "SYLT";

pub struct Mp3Tag {
    audio: TaggedAudio,
    has_synced_frame: bool,
}

impl Mp3Tag {
    pub(crate) fn new(audio: TaggedAudio) -> Self {
        let has_synced_frame = probe_synced_frame(&audio);
        Self {
            audio,
            has_synced_frame,
        }
    }
}

/// The generic tag view drops SYLT frames, so look at the raw ID3v2 tag.
fn probe_synced_frame(audio: &TaggedAudio) -> bool {
    let Ok(mut file) = File::open(audio.path()) else {
        return false;
    };
    let Ok(mpeg) = MpegFile::read_from(&mut file, ParseOptions::new().read_properties(false))
    else {
        return false;
    };
    mpeg.id3v2()
        .is_some_and(|tag| tag.into_iter().any(|frame| frame.id_str() == SYLT))
}

impl TagCodec for Mp3Tag {
    fn container(&self) -> Container {
        Container::Id3
    }

    fn read_tags(&self) -> TagSet {
        let mut tags = self.audio.read_fields();
        tags.lyrics = self.read_lyrics();
        tags
    }

    fn read_cover(&self) -> Option<CoverArt> {
        let pictures = self.audio.pictures();
        let front = pictures
            .iter()
            .filter(|p| p.pic_type() == PictureType::CoverFront);
        let others = pictures
            .iter()
            .filter(|p| p.pic_type() != PictureType::CoverFront);
        decodable_cover(front.chain(others))
    }

    fn read_lyrics(&self) -> String {
        let text = self.audio.lyrics_item();
        if text.is_empty() && self.has_synced_frame {
            return SYNCED_FRAME_MARKER.to_string();
        }
        text
    }

    fn write_tags(&mut self, tags: &TagSet) -> Result<bool> {
        self.audio.write_fields(tags)
    }

    fn write_lyrics(&mut self, text: &str) -> Result<bool> {
        let current = self.read_lyrics();
        let saved = self.audio.write_lyrics_item(&current, text)?;
        if saved {
            // A full rewrite does not carry the SYLT frame over
            self.has_synced_frame = false;
        }
        Ok(saved)
    }

    fn write_cover(&mut self, data: &[u8], mime: &str) -> Result<()> {
        self.audio
            .replace_pictures(data, mime, |p| p.pic_type() == PictureType::CoverFront)
    }
}
