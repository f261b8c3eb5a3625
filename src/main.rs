//! tagfix - keeps cover art and lyrics in a music library up to standard.
//!
//! Classifies each file's embedded cover and lyrics, fetches missing or
//! substandard assets from iTunes, MusicBrainz / Cover Art Archive and
//! LRCLIB, and writes them back into the file's own tag container.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod providers;
pub mod scanner;
pub mod status;
pub mod tags;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("tagfix=info".parse()?))
        .init();

    cli::run_command(&args)
}
