//! LRCLIB API Data Transfer Objects
//!
//! API Reference: https://lrclib.net/docs

use serde::{Deserialize, Serialize};

/// Response of `GET /api/get`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsRecord {
    pub id: Option<u64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    /// Seconds, may be fractional
    pub duration: Option<f64>,
    #[serde(default)]
    pub instrumental: bool,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

/// One element of the `GET /api/search` array
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub duration: Option<f64>,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

/// Error body returned with 404 and 400 responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub name: Option<String>,
    pub message: Option<String>,
}
