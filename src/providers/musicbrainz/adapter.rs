//! Adapter layer: Convert MusicBrainz DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::providers::domain::ReleaseCandidate;

pub fn to_candidates(response: dto::ReleaseSearchResponse) -> Vec<ReleaseCandidate> {
    response
        .releases
        .into_iter()
        .map(|release| ReleaseCandidate {
            artist: build_artist_string(&release.artist_credit),
            id: release.id,
            title: release.title,
        })
        .collect()
}

/// Join credits with their join phrases ("A feat. B")
fn build_artist_string(credits: &[dto::ArtistCredit]) -> String {
    credits
        .iter()
        .map(|credit| {
            let name = credit
                .name
                .as_deref()
                .or(credit.artist.as_ref().map(|a| a.name.as_str()))
                .unwrap_or_default();
            format!("{}{}", name, credit.joinphrase.as_deref().unwrap_or_default())
        })
        .collect::<String>()
        .trim()
        .to_string()
}
