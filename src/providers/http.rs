//! Shared HTTP plumbing for all provider clients.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};

use super::domain::{CoverImage, ProviderError, ProviderResult};

/// User agent sent with every request - MusicBrainz requires one
pub const USER_AGENT: &str = concat!("TagFix/", env!("CARGO_PKG_VERSION"));

/// Build the client shared by every provider.
///
/// The timeout applies to each request independently.
pub fn build_client(timeout: Duration) -> ProviderResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Network(e.to_string()))
}

/// Send a request and map non-success statuses to errors
pub(crate) async fn send(request: RequestBuilder) -> ProviderResult<Response> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    if !status.is_success() {
        return Err(ProviderError::Http(status.as_u16()));
    }

    Ok(response)
}

/// Download an image, keeping the server's content type
pub(crate) async fn download_image(
    client: &reqwest::Client,
    url: &str,
) -> ProviderResult<CoverImage> {
    let response = send(client.get(url)).await?;

    let mime_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();

    let data = response.bytes().await?.to_vec();
    if data.is_empty() {
        return Err(ProviderError::NotFound);
    }

    Ok(CoverImage {
        data,
        mime_type,
        url: url.to_string(),
    })
}
