//! LRCLIB integration (lyrics provider)
//!
//! API docs: https://lrclib.net/docs

pub mod dto;
mod client;

pub use client::{LrclibClient, get_query_string};
