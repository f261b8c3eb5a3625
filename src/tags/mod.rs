//! Tag codec for the three supported containers.
//!
//! Uses lofty for the binary formats. A file is opened once, its container is
//! detected (content sniffing first, extension as fallback), and all further
//! work goes through a [`TagFile`] variant implementing [`TagCodec`]:
//!
//! - [`Mp3Tag`]: ID3v2 (`.mp3`)
//! - [`FlacTag`]: Vorbis comments and PICTURE blocks (`.flac`)
//! - [`Mp4Tag`]: iTunes-style `ilst` atoms (`.m4a`, `.mp4`)
//!
//! Reads degrade to a placeholder [`TagSet`] on failure; writes return a
//! typed error and leave escalation to the caller.

mod cover;
mod flac;
mod id3;
mod mp4;

pub use cover::{COVER_EDGE, CoverArt, normalize_cover};
pub use flac::FlacTag;
pub use id3::Mp3Tag;
pub use mp4::Mp4Tag;

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, FileType, TaggedFile, TaggedFileExt};
use lofty::picture::{Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagExt, TagType};

use crate::error::{Error, Result};

/// Lyrics value reported when an ID3 tag carries only a synchronized (SYLT)
/// lyrics frame. Classifies as synced and is never written back.
pub const SYNCED_FRAME_MARKER: &str = "[Synced Lyrics Present]";

/// Tag container family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Id3,
    Flac,
    Mp4,
}

impl Container {
    fn from_file_type(file_type: FileType) -> Option<Self> {
        match file_type {
            FileType::Mpeg => Some(Self::Id3),
            FileType::Flac => Some(Self::Flac),
            FileType::Mp4 => Some(Self::Mp4),
            _ => None,
        }
    }

    /// Container implied by a file extension alone
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Id3),
            "flac" => Some(Self::Flac),
            "m4a" | "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    /// The lofty tag type read and written for this container
    pub fn tag_type(self) -> TagType {
        match self {
            Self::Id3 => TagType::Id3v2,
            Self::Flac => TagType::VorbisComments,
            Self::Mp4 => TagType::Mp4Ilst,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Id3 => "ID3v2",
            Self::Flac => "FLAC",
            Self::Mp4 => "MP4",
        }
    }
}

/// The six generic text fields every container carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericField {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Year,
    Genre,
}

impl GenericField {
    pub const ALL: [GenericField; 6] = [
        Self::Title,
        Self::Artist,
        Self::Album,
        Self::AlbumArtist,
        Self::Year,
        Self::Genre,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Artist => "Artist",
            Self::Album => "Album",
            Self::AlbumArtist => "Album artist",
            Self::Year => "Year",
            Self::Genre => "Genre",
        }
    }

    fn item_key(self) -> ItemKey {
        match self {
            Self::Title => ItemKey::TrackTitle,
            Self::Artist => ItemKey::TrackArtist,
            Self::Album => ItemKey::AlbumTitle,
            Self::AlbumArtist => ItemKey::AlbumArtist,
            Self::Year => ItemKey::RecordingDate,
            Self::Genre => ItemKey::Genre,
        }
    }

    /// Current value in `tag`; the year falls back to the original release date.
    fn read(self, tag: &Tag) -> String {
        let value = tag.get_string(&self.item_key()).unwrap_or_default();
        if value.is_empty() && self == Self::Year {
            return tag
                .get_string(&ItemKey::OriginalReleaseDate)
                .unwrap_or_default()
                .to_string();
        }
        value.to_string()
    }
}

/// Generic view of a file's tags.
///
/// Absent values are empty strings; duration is zero when the stream info
/// could not be decoded. Duration is only ever set by the codec.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSet {
    pub filename: String,
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub albumartist: String,
    pub year: String,
    pub genre: String,
    pub lyrics: String,
    duration: f64,
}

impl TagSet {
    /// A record carrying only the file identity
    pub fn placeholder(path: &Path) -> Self {
        Self {
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            ..Self::default()
        }
    }

    /// Stream duration in seconds (0.0 if unknown)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub(crate) fn set_duration(&mut self, seconds: f64) {
        self.duration = seconds;
    }

    pub fn field(&self, field: GenericField) -> &str {
        match field {
            GenericField::Title => &self.title,
            GenericField::Artist => &self.artist,
            GenericField::Album => &self.album,
            GenericField::AlbumArtist => &self.albumartist,
            GenericField::Year => &self.year,
            GenericField::Genre => &self.genre,
        }
    }

    pub fn field_mut(&mut self, field: GenericField) -> &mut String {
        match field {
            GenericField::Title => &mut self.title,
            GenericField::Artist => &mut self.artist,
            GenericField::Album => &mut self.album,
            GenericField::AlbumArtist => &mut self.albumartist,
            GenericField::Year => &mut self.year,
            GenericField::Genre => &mut self.genre,
        }
    }
}

/// Capability set shared by every container variant
pub trait TagCodec {
    fn container(&self) -> Container;

    /// All generic fields, lyrics and duration
    fn read_tags(&self) -> TagSet;

    /// Embedded cover; undecodable picture data is reported as absent.
    fn read_cover(&self) -> Option<CoverArt>;

    fn read_lyrics(&self) -> String;

    /// Write the six generic fields. Returns whether the file was saved.
    fn write_tags(&mut self, tags: &TagSet) -> Result<bool>;

    /// Replace the lyrics item. Returns whether the file was saved.
    fn write_lyrics(&mut self, text: &str) -> Result<bool>;

    /// Replace the cover slot with `data`, stored as-is.
    fn write_cover(&mut self, data: &[u8], mime: &str) -> Result<()>;
}

/// An opened audio file, dispatched on its container
pub enum TagFile {
    Mp3(Mp3Tag),
    Flac(FlacTag),
    Mp4(Mp4Tag),
}

impl TagFile {
    /// Open `path` and detect its container.
    pub fn open(path: &Path) -> Result<Self> {
        let (container, audio) = TaggedAudio::open(path)?;
        Ok(match container {
            Container::Id3 => Self::Mp3(Mp3Tag::new(audio)),
            Container::Flac => Self::Flac(FlacTag::new(audio)),
            Container::Mp4 => Self::Mp4(Mp4Tag::new(audio)),
        })
    }

    pub fn codec(&self) -> &dyn TagCodec {
        match self {
            Self::Mp3(t) => t,
            Self::Flac(t) => t,
            Self::Mp4(t) => t,
        }
    }

    pub fn codec_mut(&mut self) -> &mut dyn TagCodec {
        match self {
            Self::Mp3(t) => t,
            Self::Flac(t) => t,
            Self::Mp4(t) => t,
        }
    }
}

// ============================================================================
// Path-level surface
// ============================================================================

/// Read a file's tags, degrading to a placeholder on any failure.
pub fn read(path: &Path) -> TagSet {
    try_read(path).unwrap_or_else(|e| {
        tracing::debug!("Falling back to placeholder tags for {:?}: {}", path, e);
        TagSet::placeholder(path)
    })
}

/// Read a file's tags, reporting why the read failed.
pub fn try_read(path: &Path) -> Result<TagSet> {
    Ok(TagFile::open(path)?.codec().read_tags())
}

/// Write the generic fields then the lyrics of `tags` to `path`.
///
/// Returns whether anything on disk changed.
pub fn write(path: &Path, tags: &TagSet) -> Result<bool> {
    let mut file = TagFile::open(path)?;
    let codec = file.codec_mut();
    let fields_saved = codec.write_tags(tags)?;
    let lyrics_saved = codec.write_lyrics(&tags.lyrics)?;
    Ok(fields_saved || lyrics_saved)
}

pub fn read_cover(path: &Path) -> Option<CoverArt> {
    TagFile::open(path).ok()?.codec().read_cover()
}

pub fn write_cover(path: &Path, data: &[u8], mime: &str) -> Result<()> {
    TagFile::open(path)?.codec_mut().write_cover(data, mime)
}

pub fn read_lyrics(path: &Path) -> String {
    TagFile::open(path)
        .map(|f| f.codec().read_lyrics())
        .unwrap_or_default()
}

pub fn write_lyrics(path: &Path, text: &str) -> Result<bool> {
    TagFile::open(path)?.codec_mut().write_lyrics(text)
}

// ============================================================================
// Shared lofty plumbing
// ============================================================================

/// A probed file plus the tag type its container reads and writes.
///
/// Variants wrap this and add their container-specific rules.
pub(crate) struct TaggedAudio {
    path: PathBuf,
    file: TaggedFile,
    tag_type: TagType,
}

impl TaggedAudio {
    fn open(path: &Path) -> Result<(Container, Self)> {
        let probe = Probe::open(path)
            .map_err(|e| Error::tag(path, e.to_string()))?
            .guess_file_type()?;

        let container = probe
            .file_type()
            .and_then(Container::from_file_type)
            .ok_or_else(|| Error::unsupported(path))?;

        let file = probe.read().map_err(|e| Error::tag(path, e.to_string()))?;

        Ok((
            container,
            Self {
                path: path.to_path_buf(),
                file,
                tag_type: container.tag_type(),
            },
        ))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn tag(&self) -> Option<&Tag> {
        self.file
            .tag(self.tag_type)
            .or_else(|| self.file.primary_tag())
            .or_else(|| self.file.first_tag())
    }

    /// The container's own tag, created empty if the file has none yet
    fn tag_mut(&mut self) -> Result<&mut Tag> {
        if self.file.tag(self.tag_type).is_none() {
            self.file.insert_tag(Tag::new(self.tag_type));
        }
        let path = &self.path;
        self.file
            .tag_mut(self.tag_type)
            .ok_or_else(|| Error::tag(path, "container does not accept a tag"))
    }

    /// Save the container's tag.
    ///
    /// lofty can panic on malformed block layouts (a FLAC holding nothing but
    /// STREAMINFO); that is reported as a tag error like any other write failure.
    fn save(&self) -> Result<()> {
        let Some(tag) = self.file.tag(self.tag_type) else {
            return Ok(());
        };
        let saved = panic::catch_unwind(AssertUnwindSafe(|| {
            tag.save_to_path(&self.path, WriteOptions::default())
        }));
        match saved {
            Ok(result) => result.map_err(|e| Error::tag(&self.path, e.to_string())),
            Err(_) => {
                tracing::warn!("Tag writer panicked on {:?}", self.path);
                Err(Error::tag(&self.path, "tag writer failed on this file layout"))
            }
        }
    }

    pub(crate) fn pictures(&self) -> &[Picture] {
        self.tag().map(|t| t.pictures()).unwrap_or_default()
    }

    /// Generic fields and duration; lyrics are left to the variant.
    pub(crate) fn read_fields(&self) -> TagSet {
        let mut tags = TagSet::placeholder(&self.path);
        if let Some(tag) = self.tag() {
            for field in GenericField::ALL {
                *tags.field_mut(field) = field.read(tag);
            }
        }
        tags.set_duration(self.file.properties().duration().as_secs_f64());
        tags
    }

    pub(crate) fn lyrics_item(&self) -> String {
        self.tag()
            .and_then(|t| t.get_string(&ItemKey::Lyrics))
            .unwrap_or_default()
            .to_string()
    }

    pub(crate) fn write_fields(&mut self, tags: &TagSet) -> Result<bool> {
        let tag = self.tag_mut()?;
        let mut changed = false;

        for field in GenericField::ALL {
            let value = tags.field(field);
            if field.read(tag) == value {
                continue;
            }
            let key = field.item_key();
            tag.remove_key(&key);
            if !value.is_empty() {
                tag.insert_text(key, value.to_string());
            }
            changed = true;
        }

        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Replace the lyrics item; `current` is the variant's view of the lyrics.
    pub(crate) fn write_lyrics_item(&mut self, current: &str, text: &str) -> Result<bool> {
        if text == SYNCED_FRAME_MARKER || current == text {
            return Ok(false);
        }

        let tag = self.tag_mut()?;
        tag.remove_key(&ItemKey::Lyrics);
        if !text.is_empty() {
            tag.insert_text(ItemKey::Lyrics, text.to_string());
        }
        self.save()?;
        Ok(true)
    }

    /// Insert `data` as the front cover after dropping the pictures `evict` selects.
    pub(crate) fn replace_pictures(
        &mut self,
        data: &[u8],
        mime: &str,
        evict: impl Fn(&Picture) -> bool,
    ) -> Result<()> {
        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            Some(cover::mime_from_str(mime)),
            None,
            data.to_vec(),
        );

        let tag = self.tag_mut()?;
        while let Some(index) = tag.pictures().iter().position(&evict) {
            tag.remove_picture(index);
        }
        tag.push_picture(picture);
        self.save()
    }
}

/// First decodable picture among `pictures`, in preference order.
pub(crate) fn decodable_cover<'a>(
    pictures: impl Iterator<Item = &'a Picture>,
) -> Option<CoverArt> {
    pictures
        .map(CoverArt::from_picture)
        .find(CoverArt::is_decodable)
}
