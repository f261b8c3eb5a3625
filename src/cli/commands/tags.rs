//! Tag inspection, editing and status commands.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::scanner::collect_audio_files;
use crate::status::{self, CoverStatus, LyricsStatus};
use crate::tags::{self, GenericField, TagFile};

/// Show the tags and quality status of one file
pub fn cmd_show(path: &Path) -> anyhow::Result<()> {
    let file = TagFile::open(path)?;
    let codec = file.codec();
    let tag_set = codec.read_tags();
    let cover = codec.read_cover();
    let (cover_status, lyrics_status) = status::classify(&tag_set, cover.as_ref());

    println!("File: {:?}", path);
    println!("Container: {}", codec.container().name());
    println!();
    for field in GenericField::ALL {
        println!("  {:<13} {}", format!("{}:", field.label()), tag_set.field(field));
    }
    println!("  {:<13} {:.1}s", "Duration:", tag_set.duration());
    println!();

    match cover.as_ref().and_then(|c| c.dimensions().map(|d| (c, d))) {
        Some((cover, (w, h))) => {
            println!("Cover:  {} ({}x{}, {})", cover_status, w, h, cover.mime_type())
        }
        None => println!("Cover:  {}", cover_status),
    }
    println!("Lyrics: {}", lyrics_status);
    Ok(())
}

/// One row of the status table
struct StatusRow {
    path: PathBuf,
    cover: CoverStatus,
    lyrics: LyricsStatus,
}

/// Classify every audio file, reading them in parallel
pub fn cmd_status(path: &Path, recursive: bool) -> anyhow::Result<()> {
    let files = collect_audio_files(path, recursive)?;
    if files.is_empty() {
        println!("No audio files found.");
        return Ok(());
    }

    let rows: Vec<StatusRow> = files
        .par_iter()
        .map(|file| {
            let tag_set = tags::read(file);
            let cover = tags::read_cover(file);
            let (cover, lyrics) = status::classify(&tag_set, cover.as_ref());
            StatusRow {
                path: file.clone(),
                cover,
                lyrics,
            }
        })
        .collect();

    println!("{:<11} {:<9} File", "Cover", "Lyrics");
    for row in &rows {
        println!(
            "{:<11} {:<9} {}",
            row.cover.to_string(),
            row.lyrics.to_string(),
            row.path.display()
        );
    }

    let count = |pred: &dyn Fn(&StatusRow) -> bool| rows.iter().filter(|r| pred(r)).count();
    println!();
    println!("{} files", rows.len());
    println!(
        "  Covers: {} correct, {} wrong size, {} missing",
        count(&|r| r.cover == CoverStatus::Correct),
        count(&|r| r.cover == CoverStatus::WrongSize),
        count(&|r| r.cover == CoverStatus::Missing)
    );
    println!(
        "  Lyrics: {} synced, {} unsynced, {} missing",
        count(&|r| r.lyrics == LyricsStatus::Synced),
        count(&|r| r.lyrics == LyricsStatus::Unsynced),
        count(&|r| r.lyrics == LyricsStatus::Missing)
    );
    Ok(())
}

/// Field values given on the command line; `None` leaves a field unchanged
#[derive(Debug, Default)]
pub struct FieldEdits {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
}

impl FieldEdits {
    fn get(&self, field: GenericField) -> Option<&String> {
        match field {
            GenericField::Title => self.title.as_ref(),
            GenericField::Artist => self.artist.as_ref(),
            GenericField::Album => self.album.as_ref(),
            GenericField::AlbumArtist => self.album_artist.as_ref(),
            GenericField::Year => self.year.as_ref(),
            GenericField::Genre => self.genre.as_ref(),
        }
    }
}

/// Write metadata to an audio file
pub fn cmd_write_tags(path: &Path, edits: &FieldEdits) -> anyhow::Result<()> {
    let mut tag_set = tags::try_read(path)?;

    for field in GenericField::ALL {
        if let Some(value) = edits.get(field) {
            let current = tag_set.field_mut(field);
            if current != value {
                println!("  {} : {:?} → {:?}", field.label(), current, value);
                *current = value.clone();
            }
        }
    }

    if tags::write(path, &tag_set)? {
        println!("✓ Tags written to {:?}", path);
    } else {
        println!("No changes made.");
    }
    Ok(())
}
