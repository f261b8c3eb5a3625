//! Trait definitions for external API clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute the mocks below.

use async_trait::async_trait;

use super::domain::{
    CoverImage, CoverTarget, LyricsCandidate, LyricsQuery, LyricsResult, ProviderResult,
    ReleaseCandidate,
};

/// One strategy in the cover cascade
#[async_trait]
pub trait CoverProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn fetch_cover(
        &self,
        artist: &str,
        album: &str,
        target: CoverTarget,
    ) -> ProviderResult<CoverImage>;
}

/// Structured release search (MusicBrainz)
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    async fn search_releases(
        &self,
        artist: &str,
        album: &str,
        limit: u32,
    ) -> ProviderResult<Vec<ReleaseCandidate>>;
}

/// Cover image by release ID (Cover Art Archive)
#[async_trait]
pub trait CoverArtApi: Send + Sync {
    async fn front_cover(&self, release_id: &str, target: CoverTarget)
    -> ProviderResult<CoverImage>;
}

/// Lyrics lookup (LRCLIB)
#[async_trait]
pub trait LyricsApi: Send + Sync {
    /// Exact match on artist/title/album/duration
    async fn get_lyrics(&self, query: &LyricsQuery) -> ProviderResult<LyricsResult>;

    /// Free-text search returning every candidate
    async fn search(&self, text: &str) -> ProviderResult<Vec<LyricsCandidate>>;
}
