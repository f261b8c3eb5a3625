//! iTunes Search API Data Transfer Objects
//!
//! Only the fields we read are modelled; serde ignores the rest.
//!
//! API Reference: https://performance-partners.apple.com/search-api

use serde::{Deserialize, Serialize};

/// Response of `GET /search?entity=album`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<AlbumResult>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResult {
    pub collection_name: Option<String>,
    pub artist_name: Option<String>,
    /// 100x100 artwork URL; the size token can be rewritten for larger art
    pub artwork_url100: Option<String>,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_album_search() {
        let json = r#"{
            "resultCount": 1,
            "results": [{
                "wrapperType": "collection",
                "collectionType": "Album",
                "artistName": "Massive Attack",
                "collectionName": "Mezzanine",
                "artworkUrl60": "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/aa/bb/cc/source/60x60bb.jpg",
                "artworkUrl100": "https://is1-ssl.mzstatic.com/image/thumb/Music/v4/aa/bb/cc/source/100x100bb.jpg",
                "trackCount": 11
            }]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("Should parse search");
        assert_eq!(response.result_count, 1);
        let album = &response.results[0];
        assert_eq!(album.collection_name.as_deref(), Some("Mezzanine"));
        assert!(
            album
                .artwork_url100
                .as_deref()
                .unwrap()
                .ends_with("100x100bb.jpg")
        );
    }

    #[test]
    fn test_parse_empty_search() {
        let json = r#"{"resultCount": 0, "results": []}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.result_count, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_parse_result_without_artwork() {
        let json = r#"{"resultCount": 1, "results": [{"collectionName": "Untitled"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.results[0].artwork_url100.is_none());
    }
}
