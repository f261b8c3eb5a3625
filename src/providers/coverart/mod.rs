//! Cover Art Archive integration
//!
//! Front covers by MusicBrainz release ID. The redirect endpoints
//! (`/front`, `/front-500`) serve the image directly, so no listing DTOs are
//! needed.

mod client;

pub use client::CoverArtClient;
