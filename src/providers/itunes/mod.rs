//! iTunes Search integration (search-by-name cover provider)
//!
//! API docs: https://performance-partners.apple.com/search-api

pub mod dto;
mod client;

pub use client::{ItunesClient, sized_artwork_url};
