//! Provider-independent result types.
//!
//! Every client converts its API response into these types, so the cascade
//! and the batch jobs never see a DTO.

use crate::tags::TagSet;

/// Downloaded cover image
#[derive(Debug, Clone)]
pub struct CoverImage {
    /// Raw image bytes, as served
    pub data: Vec<u8>,
    /// MIME type from the response (image/jpeg if absent)
    pub mime_type: String,
    /// Source URL
    pub url: String,
}

/// Requested artwork edge length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverTarget {
    /// 500x500
    #[default]
    Px500,
    /// 1000x1000 (iTunes) or the original upload (Cover Art Archive)
    Px1000,
}

impl CoverTarget {
    pub fn from_force_500(force_500px: bool) -> Self {
        if force_500px { Self::Px500 } else { Self::Px1000 }
    }
}

/// What the exact-match lyrics lookup is keyed on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricsQuery {
    pub artist: String,
    pub title: String,
    pub album: String,
    /// Local duration in seconds, 0.0 if unknown
    pub duration: f64,
}

impl LyricsQuery {
    pub fn from_tags(tags: &TagSet) -> Self {
        Self {
            artist: tags.artist.clone(),
            title: tags.title.clone(),
            album: tags.album.clone(),
            duration: tags.duration(),
        }
    }
}

/// Exact-match lyrics lookup result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricsResult {
    pub synced_lyrics: Option<String>,
    pub plain_lyrics: Option<String>,
    /// Track duration the provider has on file, in seconds
    pub duration: Option<f64>,
}

/// One row of a free-text lyrics search
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsCandidate {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub synced_lyrics: Option<String>,
    pub plain_lyrics: Option<String>,
}

/// A release offered for manual cover selection
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseCandidate {
    /// MusicBrainz release ID
    pub id: String,
    pub title: String,
    /// Joined artist credit
    pub artist: String,
}

/// Errors from a single provider call.
///
/// None of these are fatal: the cascade logs them and moves on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Http(u16),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Not found")]
    NotFound,

    #[error("Duration mismatch: local {local:.1}s, provider {provider:.1}s")]
    DurationMismatch { local: f64, provider: f64 },

    #[error("Rate limited - try again later")]
    RateLimited,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
