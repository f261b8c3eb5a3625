//! MusicBrainz HTTP client
//!
//! Handles communication with the MusicBrainz web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to 1 req/sec.
//! The shared client built by [`http::build_client`] carries the User-Agent;
//! every search waits for [`MIN_REQUEST_INTERVAL`] since the previous one.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{adapter, dto};
use crate::providers::domain::{ProviderError, ProviderResult, ReleaseCandidate};
use crate::providers::http;
use crate::providers::traits::ReleaseApi;

/// Gap between two searches, shared by all batch workers
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1100);

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl MusicBrainzClient {
    /// `base_url` is the web service root (…/ws/2)
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            min_interval: MIN_REQUEST_INTERVAL,
            last_request: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Wait until `min_interval` has passed since the previous request.
    ///
    /// The lock is held while sleeping so concurrent callers queue up.
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + self.min_interval).await;
        }
        *last = Some(Instant::now());
    }

    /// Search releases by artist and title, best match first
    pub async fn search_releases(
        &self,
        artist: &str,
        album: &str,
        limit: u32,
    ) -> ProviderResult<Vec<ReleaseCandidate>> {
        let url = format!(
            "{}/release?query={}&fmt=json&limit={}",
            self.base_url,
            urlencoding::encode(&release_query(artist, album)),
            limit
        );

        self.pace().await;
        let response: dto::ReleaseSearchResponse = http::send(self.http_client.get(&url))
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(adapter::to_candidates(response))
    }
}

/// Lucene query `artist:"A" AND release:"B"`, with embedded quotes escaped
pub fn release_query(artist: &str, album: &str) -> String {
    format!(
        r#"artist:"{}" AND release:"{}""#,
        escape_phrase(artist),
        escape_phrase(album)
    )
}

fn escape_phrase(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', r#"\""#)
}

#[async_trait]
impl ReleaseApi for MusicBrainzClient {
    async fn search_releases(
        &self,
        artist: &str,
        album: &str,
        limit: u32,
    ) -> ProviderResult<Vec<ReleaseCandidate>> {
        self.search_releases(artist, album, limit).await
    }
}
