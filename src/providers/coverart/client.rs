//! Cover Art Archive HTTP client
//!
//! Fetches album artwork for MusicBrainz releases.
//! No API key required, but please respect their rate limits.
//!
//! API: https://coverartarchive.org

use async_trait::async_trait;

use crate::providers::domain::{CoverImage, CoverTarget, ProviderError, ProviderResult};
use crate::providers::http;
use crate::providers::traits::CoverArtApi;

/// Cover Art Archive client
pub struct CoverArtClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CoverArtClient {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Get the front cover for a release.
    ///
    /// The 500px thumbnail is requested first when `target` is 500px; a 404
    /// there retries once against the original upload.
    pub async fn front_cover(
        &self,
        release_id: &str,
        target: CoverTarget,
    ) -> ProviderResult<CoverImage> {
        let original = format!("{}/release/{}/front", self.base_url, release_id);

        if target == CoverTarget::Px500 {
            let thumbnail = format!("{original}-500");
            match http::download_image(&self.http_client, &thumbnail).await {
                Err(ProviderError::NotFound) => {
                    tracing::debug!("No 500px thumbnail for release {}, trying original", release_id);
                }
                other => return other,
            }
        }

        http::download_image(&self.http_client, &original).await
    }
}

#[async_trait]
impl CoverArtApi for CoverArtClient {
    async fn front_cover(
        &self,
        release_id: &str,
        target: CoverTarget,
    ) -> ProviderResult<CoverImage> {
        self.front_cover(release_id, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> CoverArtClient {
        let http = http::build_client(Duration::from_secs(5)).unwrap();
        CoverArtClient::new(http, server.uri())
    }

    async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }

    fn jpeg(data: Vec<u8>) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(data, "image/jpeg")
    }

    async fn requested_paths(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_thumbnail_preferred() {
        let server = MockServer::start().await;
        serve(&server, "/release/rel-1/front-500", jpeg(vec![5])).await;
        serve(&server, "/release/rel-1/front", jpeg(vec![1])).await;

        let image = client(&server)
            .front_cover("rel-1", CoverTarget::Px500)
            .await
            .unwrap();
        assert_eq!(image.data, vec![5]);
        assert_eq!(requested_paths(&server).await, vec!["/release/rel-1/front-500"]);
    }

    #[tokio::test]
    async fn test_404_falls_back_to_original() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/release/rel-1/front",
            ResponseTemplate::new(200).set_body_raw(vec![1], "image/png"),
        )
        .await;

        let image = client(&server)
            .front_cover("rel-1", CoverTarget::Px500)
            .await
            .unwrap();
        assert_eq!(image.data, vec![1]);
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(
            requested_paths(&server).await,
            vec!["/release/rel-1/front-500", "/release/rel-1/front"]
        );
    }

    #[tokio::test]
    async fn test_server_error_does_not_fall_back() {
        let server = MockServer::start().await;
        serve(&server, "/release/rel-1/front-500", ResponseTemplate::new(502)).await;
        serve(&server, "/release/rel-1/front", jpeg(vec![1])).await;

        let err = client(&server)
            .front_cover("rel-1", CoverTarget::Px500)
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::Http(502));
        assert_eq!(requested_paths(&server).await.len(), 1);
    }

    #[tokio::test]
    async fn test_large_target_uses_original_directly() {
        let server = MockServer::start().await;
        serve(&server, "/release/rel-1/front", jpeg(vec![9])).await;

        client(&server)
            .front_cover("rel-1", CoverTarget::Px1000)
            .await
            .unwrap();
        assert_eq!(requested_paths(&server).await, vec!["/release/rel-1/front"]);
    }
}
