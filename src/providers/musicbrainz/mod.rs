//! MusicBrainz API integration
//!
//! Release search for the release-database cover strategy and for manual
//! cover selection.
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API

pub mod dto;
mod adapter;
mod client;

pub use client::{MusicBrainzClient, release_query};
