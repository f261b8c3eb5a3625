//! External metadata providers - cover art and lyrics.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - our result and error types
//! - **API DTOs** (`itunes/dto.rs`, `musicbrainz/dto.rs`, `lrclib/dto.rs`) - exact API response shapes
//! - **Clients** - one HTTP client per service, all sharing one `reqwest::Client`
//! - **Traits** (`traits.rs`) - seams for injecting mocks
//! - **Cascade** (`cascade.rs`) - ordered fallback across clients
//!
//! # Usage
//!
//! ```ignore
//! let cascade = ProviderCascade::new(&config)?;
//! if let Some(cover) = cascade.fetch_cover("Portishead", "Dummy").await {
//!     tags::write_cover(path, &cover.data, &cover.mime_type)?;
//! }
//! ```

pub mod cascade;
pub mod coverart;
pub mod domain;
pub mod http;
pub mod itunes;
pub mod lrclib;
pub mod musicbrainz;
pub mod traits;

pub use cascade::{DURATION_TOLERANCE, ProviderCascade, Providers, duration_matches};
pub use domain::{
    CoverImage, CoverTarget, LyricsCandidate, LyricsQuery, LyricsResult, ProviderError,
    ProviderResult, ReleaseCandidate,
};
