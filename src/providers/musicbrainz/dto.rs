//! MusicBrainz API Data Transfer Objects
//!
//! These types match what the MusicBrainz release search returns.
//! DO NOT use these types outside the musicbrainz module - convert to domain types.
//!
//! API Reference: https://musicbrainz.org/doc/MusicBrainz_API/Search

use serde::{Deserialize, Serialize};

/// Response of `GET /release?query=…&fmt=json`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseSearchResponse {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Release (album/single/EP)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Release {
    /// MusicBrainz release ID
    pub id: String,
    /// Release title
    pub title: String,
    /// Search relevance (0-100)
    pub score: Option<u32>,
    /// Release date (YYYY, YYYY-MM, or YYYY-MM-DD)
    pub date: Option<String>,
    /// Artist credits
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
}

/// Artist credit (can be multiple for collaborations)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistCredit {
    /// How this artist is credited
    pub name: Option<String>,
    /// Join phrase (e.g., " & ", " feat. ")
    pub joinphrase: Option<String>,
    pub artist: Option<Artist>,
}

/// Artist info
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Artist {
    pub id: String,
    pub name: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_release_search() {
        let json = r#"{
            "created": "2024-01-01T00:00:00.000Z",
            "count": 2,
            "offset": 0,
            "releases": [{
                "id": "b84ee12a-09ef-421b-82de-0441a926375b",
                "score": 100,
                "title": "Dummy",
                "status": "Official",
                "date": "1994-08-22",
                "artist-credit": [{
                    "name": "Portishead",
                    "artist": {
                        "id": "8f6bd1e4-fbe1-4f50-aa9b-94c450ec0f11",
                        "name": "Portishead",
                        "sort-name": "Portishead"
                    }
                }]
            }]
        }"#;

        let response: ReleaseSearchResponse =
            serde_json::from_str(json).expect("Should parse release search");
        assert_eq!(response.count, Some(2));
        let release = &response.releases[0];
        assert_eq!(release.title, "Dummy");
        assert_eq!(release.score, Some(100));
        assert_eq!(release.artist_credit[0].name.as_deref(), Some("Portishead"));
    }

    #[test]
    fn test_parse_minimal_release() {
        let json = r#"{"releases": [{"id": "abc", "title": "Untitled"}]}"#;
        let response: ReleaseSearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.releases[0].artist_credit.is_empty());
        assert!(response.count.is_none());
    }

    #[test]
    fn test_parse_no_releases() {
        let response: ReleaseSearchResponse = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(response.releases.is_empty());
    }
}
