//! Quality tiers for embedded cover art and lyrics.
//!
//! Tiers are always derived from the current tag content and never stored, so
//! the batch skip decisions match what `status` displays.

use std::fmt;

use crate::batch::BatchPolicy;
use crate::tags::{COVER_EDGE, CoverArt, SYNCED_FRAME_MARKER, TagSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverStatus {
    Missing,
    WrongSize,
    /// Exactly 500x500 pixels
    Correct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LyricsStatus {
    Missing,
    Unsynced,
    Synced,
}

impl fmt::Display for CoverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "missing",
            Self::WrongSize => "wrong size",
            Self::Correct => "500x500",
        })
    }
}

impl fmt::Display for LyricsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "missing",
            Self::Unsynced => "unsynced",
            Self::Synced => "synced",
        })
    }
}

/// Both tiers for one file
pub fn classify(tags: &TagSet, cover: Option<&CoverArt>) -> (CoverStatus, LyricsStatus) {
    (cover_status(cover), lyrics_status(&tags.lyrics))
}

pub fn cover_status(cover: Option<&CoverArt>) -> CoverStatus {
    match cover.and_then(CoverArt::dimensions) {
        None => CoverStatus::Missing,
        Some((w, h)) if w == COVER_EDGE && h == COVER_EDGE => CoverStatus::Correct,
        Some(_) => CoverStatus::WrongSize,
    }
}

pub fn lyrics_status(lyrics: &str) -> LyricsStatus {
    if lyrics.is_empty() {
        LyricsStatus::Missing
    } else if lyrics == SYNCED_FRAME_MARKER || has_timestamp(lyrics) {
        LyricsStatus::Synced
    } else {
        LyricsStatus::Unsynced
    }
}

/// Whether `text` contains an LRC timestamp: `[mm:ss]`, `[mm:ss.xx]` or `[mm:ss.xxx]`.
pub fn has_timestamp(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'[' && timestamp_at(&bytes[i + 1..]))
}

/// `rest` starts right after an opening bracket
fn timestamp_at(rest: &[u8]) -> bool {
    let digits = |range: std::ops::Range<usize>| {
        rest.get(range)
            .is_some_and(|s| s.iter().all(u8::is_ascii_digit))
    };

    if !(digits(0..2) && rest.get(2) == Some(&b':') && digits(3..5)) {
        return false;
    }
    match rest.get(5) {
        Some(b']') => true,
        Some(b'.') => {
            let fraction = rest[6..].iter().take_while(|b| b.is_ascii_digit()).count();
            (2..=3).contains(&fraction) && rest.get(6 + fraction) == Some(&b']')
        }
        _ => false,
    }
}

// ============================================================================
// Batch pre-filter
// ============================================================================

/// Whether a lyrics batch should touch a file in `status`.
///
/// Unsynced lyrics are upgraded in strict mode even when existing lyrics are
/// otherwise kept.
pub fn needs_lyrics_fetch(status: LyricsStatus, policy: &BatchPolicy) -> bool {
    match status {
        LyricsStatus::Missing => true,
        LyricsStatus::Unsynced => policy.strict_mode || !policy.skip_existing,
        LyricsStatus::Synced => !policy.skip_existing,
    }
}

pub fn needs_cover_fetch(status: CoverStatus) -> bool {
    status == CoverStatus::Missing
}

pub fn needs_cover_resize(status: CoverStatus) -> bool {
    status == CoverStatus::WrongSize
}
