//! Provider cascade - ordered, fallback-tolerant fetching of covers and lyrics.
//!
//! Each pipeline tries its strategies in order. A strategy error (network,
//! non-success status, empty result, timeout) is logged and the next strategy
//! is tried; when all fail the pipeline yields `None`. Nothing here returns an
//! error to the caller.

use std::sync::Arc;

use async_trait::async_trait;

use super::coverart::CoverArtClient;
use super::domain::{
    CoverImage, CoverTarget, LyricsCandidate, LyricsQuery, LyricsResult, ProviderError,
    ProviderResult, ReleaseCandidate,
};
use super::http;
use super::itunes::ItunesClient;
use super::lrclib::LrclibClient;
use super::musicbrainz::MusicBrainzClient;
use super::traits::{CoverArtApi, CoverProvider, LyricsApi, ReleaseApi};
use crate::config::{Config, CoverSource};

/// Maximum accepted difference between local and provider durations (seconds)
pub const DURATION_TOLERANCE: f64 = 2.0;

/// Releases offered for manual selection
const RELEASE_SEARCH_LIMIT: u32 = 10;

/// Whether a provider duration is consistent with the local one.
///
/// When either side is unknown (absent or zero) there is nothing to validate
/// against and the result is accepted.
pub fn duration_matches(provider: Option<f64>, local: f64) -> bool {
    match provider {
        Some(provider) if provider > 0.0 && local > 0.0 => {
            (provider - local).abs() < DURATION_TOLERANCE
        }
        _ => true,
    }
}

/// Release-database cover strategy: best release match, then its front cover
pub struct ReleaseCovers {
    releases: Arc<dyn ReleaseApi>,
    cover_art: Arc<dyn CoverArtApi>,
}

impl ReleaseCovers {
    pub fn new(releases: Arc<dyn ReleaseApi>, cover_art: Arc<dyn CoverArtApi>) -> Self {
        Self {
            releases,
            cover_art,
        }
    }
}

#[async_trait]
impl CoverProvider for ReleaseCovers {
    fn name(&self) -> &'static str {
        "musicbrainz"
    }

    async fn fetch_cover(
        &self,
        artist: &str,
        album: &str,
        target: CoverTarget,
    ) -> ProviderResult<CoverImage> {
        let release = self
            .releases
            .search_releases(artist, album, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(ProviderError::NotFound)?;

        self.cover_art.front_cover(&release.id, target).await
    }
}

/// The clients a cascade is assembled from
pub struct Providers {
    /// Cover strategies in the order they are tried
    pub covers: Vec<Arc<dyn CoverProvider>>,
    pub releases: Arc<dyn ReleaseApi>,
    pub cover_art: Arc<dyn CoverArtApi>,
    pub lyrics: Arc<dyn LyricsApi>,
}

/// Ordered cover and lyrics fetching shared by interactive and batch use
pub struct ProviderCascade {
    providers: Providers,
    target: CoverTarget,
}

impl ProviderCascade {
    /// Build the production cascade from configuration.
    ///
    /// All clients share one HTTP client carrying the configured timeout.
    pub fn new(config: &Config) -> ProviderResult<Self> {
        let client = http::build_client(config.network.timeout())?;
        let endpoints = &config.endpoints;

        let itunes: Arc<dyn CoverProvider> =
            Arc::new(ItunesClient::new(client.clone(), &endpoints.itunes_search));
        let releases: Arc<dyn ReleaseApi> =
            Arc::new(MusicBrainzClient::new(client.clone(), &endpoints.musicbrainz));
        let cover_art: Arc<dyn CoverArtApi> = Arc::new(CoverArtClient::new(
            client.clone(),
            &endpoints.cover_art_archive,
        ));
        let release_covers: Arc<dyn CoverProvider> = Arc::new(ReleaseCovers::new(
            Arc::clone(&releases),
            Arc::clone(&cover_art),
        ));

        let covers = match config.covers.source {
            CoverSource::Itunes => vec![itunes, release_covers],
            CoverSource::MusicBrainz => vec![release_covers, itunes],
        };

        Ok(Self::with_providers(
            Providers {
                covers,
                releases,
                cover_art,
                lyrics: Arc::new(LrclibClient::new(client, &endpoints.lrclib)),
            },
            CoverTarget::from_force_500(config.covers.force_500px),
        ))
    }

    pub fn with_providers(providers: Providers, target: CoverTarget) -> Self {
        Self { providers, target }
    }

    pub fn target(&self) -> CoverTarget {
        self.target
    }

    /// First cover any strategy can produce for `artist`/`album`.
    ///
    /// Both must be non-blank; a lone album title is too vague to match on.
    pub async fn fetch_cover(&self, artist: &str, album: &str) -> Option<CoverImage> {
        if artist.trim().is_empty() || album.trim().is_empty() {
            return None;
        }

        for provider in &self.providers.covers {
            match provider.fetch_cover(artist, album, self.target).await {
                Ok(image) => {
                    tracing::debug!(
                        "Cover for {} - {} from {} ({})",
                        artist,
                        album,
                        provider.name(),
                        image.url
                    );
                    return Some(image);
                }
                Err(e) => {
                    tracing::debug!(
                        "{} has no cover for {} - {}: {}",
                        provider.name(),
                        artist,
                        album,
                        e
                    );
                }
            }
        }
        None
    }

    /// Exact-match lyrics, rejected when the durations disagree
    pub async fn fetch_lyrics(&self, query: &LyricsQuery) -> Option<LyricsResult> {
        match self.try_fetch_lyrics(query).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!("No lyrics for {} - {}: {}", query.artist, query.title, e);
                None
            }
        }
    }

    async fn try_fetch_lyrics(&self, query: &LyricsQuery) -> ProviderResult<LyricsResult> {
        let result = self.providers.lyrics.get_lyrics(query).await?;
        if !duration_matches(result.duration, query.duration) {
            return Err(ProviderError::DurationMismatch {
                local: query.duration,
                provider: result.duration.unwrap_or_default(),
            });
        }
        Ok(result)
    }

    /// Free-text lyrics search for manual selection; empty on failure
    pub async fn search_lyrics(
        &self,
        artist: &str,
        title: &str,
        album: &str,
    ) -> Vec<LyricsCandidate> {
        let text = format!("{artist} {title} {album}");
        self.providers
            .lyrics
            .search(text.trim())
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Lyrics search failed: {}", e);
                Vec::new()
            })
    }

    /// Candidate releases for manual cover selection; empty on failure
    pub async fn search_releases(&self, artist: &str, album: &str) -> Vec<ReleaseCandidate> {
        self.providers
            .releases
            .search_releases(artist, album, RELEASE_SEARCH_LIMIT)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Release search failed: {}", e);
                Vec::new()
            })
    }

    /// Front cover of a specific release
    pub async fn cover_for_release(&self, release_id: &str) -> Option<CoverImage> {
        self.providers
            .cover_art
            .front_cover(release_id, self.target)
            .await
            .map_err(|e| tracing::warn!("No cover for release {}: {}", release_id, e))
            .ok()
    }
}
