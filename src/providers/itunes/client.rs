//! iTunes Search HTTP client
//!
//! Searches albums by free text and rewrites the thumbnail URL of the first
//! hit to the requested artwork size. No API key required.

use async_trait::async_trait;

use super::dto;
use crate::providers::domain::{CoverImage, CoverTarget, ProviderError, ProviderResult};
use crate::providers::http;
use crate::providers::traits::CoverProvider;

/// Size token embedded in `artworkUrl100`
const THUMBNAIL_TOKEN: &str = "100x100bb";

/// iTunes Search API client
pub struct ItunesClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ItunesClient {
    /// `base_url` is the full search endpoint (…/search)
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Artwork URL of the first album matching `artist album`
    pub async fn artwork_url(
        &self,
        artist: &str,
        album: &str,
        target: CoverTarget,
    ) -> ProviderResult<String> {
        let term = format!("{artist} {album}");
        let url = format!(
            "{}?term={}&entity=album&limit=1",
            self.base_url,
            urlencoding::encode(term.trim())
        );

        let response: dto::SearchResponse = http::send(self.http_client.get(&url))
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        if response.result_count == 0 {
            return Err(ProviderError::NotFound);
        }

        let thumbnail = response
            .results
            .into_iter()
            .next()
            .and_then(|r| r.artwork_url100)
            .ok_or(ProviderError::NotFound)?;

        Ok(sized_artwork_url(&thumbnail, target))
    }
}

/// Rewrite the thumbnail size token; URLs without it are used as-is.
pub fn sized_artwork_url(thumbnail: &str, target: CoverTarget) -> String {
    let size = match target {
        CoverTarget::Px500 => "500x500bb",
        CoverTarget::Px1000 => "1000x1000bb",
    };
    thumbnail.replace(THUMBNAIL_TOKEN, size)
}

#[async_trait]
impl CoverProvider for ItunesClient {
    fn name(&self) -> &'static str {
        "itunes"
    }

    async fn fetch_cover(
        &self,
        artist: &str,
        album: &str,
        target: CoverTarget,
    ) -> ProviderResult<CoverImage> {
        let url = self.artwork_url(artist, album, target).await?;
        http::download_image(&self.http_client, &url).await
    }
}
