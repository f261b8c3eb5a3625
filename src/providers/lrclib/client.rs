//! LRCLIB HTTP client
//!
//! Exact-match lyrics lookup (`/get`) and free-text search (`/search`).
//! No API key required.

use async_trait::async_trait;

use super::dto;
use crate::providers::domain::{
    LyricsCandidate, LyricsQuery, LyricsResult, ProviderError, ProviderResult,
};
use crate::providers::http;
use crate::providers::traits::LyricsApi;

/// LRCLIB API client
pub struct LrclibClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    /// `base_url` is the API root (…/api)
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Exact match on every non-empty field of `query`
    pub async fn get_lyrics(&self, query: &LyricsQuery) -> ProviderResult<LyricsResult> {
        let url = format!("{}/get?{}", self.base_url, get_query_string(query));

        let record: dto::LyricsRecord = http::send(self.http_client.get(&url))
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(LyricsResult {
            synced_lyrics: non_empty(record.synced_lyrics),
            plain_lyrics: non_empty(record.plain_lyrics),
            duration: record.duration,
        })
    }

    pub async fn search(&self, text: &str) -> ProviderResult<Vec<LyricsCandidate>> {
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(text));

        let items: Vec<dto::SearchItem> = http::send(self.http_client.get(&url))
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(items.into_iter().map(to_candidate).collect())
    }
}

/// `artist_name=…&track_name=…&album_name=…&duration=…`, skipping empty values.
///
/// Duration is sent as whole seconds and omitted when it rounds to zero.
pub fn get_query_string(query: &LyricsQuery) -> String {
    let seconds = query.duration.round();
    let duration = if seconds >= 1.0 {
        format!("{}", seconds as u64)
    } else {
        String::new()
    };

    [
        ("artist_name", query.artist.as_str()),
        ("track_name", query.title.as_str()),
        ("album_name", query.album.as_str()),
        ("duration", duration.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
    .collect::<Vec<_>>()
    .join("&")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn to_candidate(item: dto::SearchItem) -> LyricsCandidate {
    LyricsCandidate {
        title: item.name.or(item.track_name).unwrap_or_default(),
        artist: item.artist_name.unwrap_or_default(),
        album: item.album_name.unwrap_or_default(),
        synced_lyrics: non_empty(item.synced_lyrics),
        plain_lyrics: non_empty(item.plain_lyrics),
    }
}

#[async_trait]
impl LyricsApi for LrclibClient {
    async fn get_lyrics(&self, query: &LyricsQuery) -> ProviderResult<LyricsResult> {
        self.get_lyrics(query).await
    }

    async fn search(&self, text: &str) -> ProviderResult<Vec<LyricsCandidate>> {
        self.search(text).await
    }
}
