//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `tags`: inspecting and editing tags, status classification
//! - `lyrics`: lyrics batch fetch and search
//! - `covers`: cover batch fetch, resizing and release search

mod covers;
mod lyrics;
mod tags;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::batch::{BatchStats, UnitProgress, display_name};
use crate::config::{self, Config, CoverSource};
use crate::error::Error;

pub use covers::{cmd_covers, cmd_resize_covers, cmd_search_releases};
pub use lyrics::{cmd_lyrics, cmd_search_lyrics};
pub use tags::{cmd_show, cmd_status, cmd_write_tags};

/// tagfix CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the OS config directory)
    #[arg(long, global = true, env = "TAGFIX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the tags and quality status of one file
    Show {
        /// Path to the audio file
        path: PathBuf,
    },
    /// Classify cover and lyrics quality for every audio file
    Status {
        /// File or directory
        path: PathBuf,
        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,
    },
    /// Write generic tag fields to an audio file
    WriteTags {
        /// Path to the audio file
        path: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        artist: Option<String>,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        album_artist: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },
    /// Fetch and embed lyrics
    Lyrics {
        /// File or directory
        path: PathBuf,
        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,
        /// Refetch even when synced lyrics are already embedded
        #[arg(long)]
        no_skip: bool,
        /// Accept plain lyrics when no synced version exists
        #[arg(long)]
        lenient: bool,
        /// Also write a .lrc file next to each audio file
        #[arg(long)]
        sidecar: bool,
        /// Write a JSON report of the batch to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Fetch and embed covers for files that have none
    Covers {
        /// File or directory
        path: PathBuf,
        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,
        /// Provider tried first: itunes or musicbrainz
        #[arg(long)]
        source: Option<CoverSource>,
        /// Request 1000x1000 / original artwork instead of 500x500
        #[arg(long)]
        large: bool,
    },
    /// Resize embedded covers to 500x500 JPEG
    ResizeCovers {
        /// File or directory
        path: PathBuf,
        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,
    },
    /// Search lyrics by artist and title
    SearchLyrics {
        #[arg(long)]
        artist: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        album: String,
    },
    /// Search releases for manual cover selection
    SearchReleases {
        #[arg(long)]
        artist: String,
        #[arg(long)]
        album: String,
        /// Release ID whose front cover should be embedded
        #[arg(long, requires = "into")]
        download: Option<String>,
        /// Audio file that receives the downloaded cover
        #[arg(long)]
        into: Option<PathBuf>,
    },
    /// Write a config file with the default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref());
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Show { path } => cmd_show(path),
        Commands::Status { path, recursive } => cmd_status(path, *recursive),
        Commands::WriteTags {
            path,
            title,
            artist,
            album,
            album_artist,
            year,
            genre,
        } => cmd_write_tags(
            path,
            &tags::FieldEdits {
                title: title.clone(),
                artist: artist.clone(),
                album: album.clone(),
                album_artist: album_artist.clone(),
                year: year.clone(),
                genre: genre.clone(),
            },
        ),
        Commands::Lyrics {
            path,
            recursive,
            no_skip,
            lenient,
            sidecar,
            report,
        } => {
            let mut policy = config.lyrics.policy();
            if *no_skip {
                policy.skip_existing = false;
            }
            if *lenient {
                policy.strict_mode = false;
            }
            if *sidecar {
                policy.save_sidecar = true;
            }
            cmd_lyrics(&rt, &config, path, *recursive, policy, report.as_deref())
        }
        Commands::Covers {
            path,
            recursive,
            source,
            large,
        } => {
            let mut config = config.clone();
            if let Some(source) = source {
                config.covers.source = *source;
            }
            if *large {
                config.covers.force_500px = false;
            }
            cmd_covers(&rt, &config, path, *recursive)
        }
        Commands::ResizeCovers { path, recursive } => {
            cmd_resize_covers(&rt, &config, path, *recursive)
        }
        Commands::SearchLyrics {
            artist,
            title,
            album,
        } => cmd_search_lyrics(&rt, &config, artist, title, album),
        Commands::SearchReleases {
            artist,
            album,
            download,
            into,
        } => cmd_search_releases(
            &rt,
            &config,
            artist,
            album,
            download.as_deref().zip(into.as_deref()),
        ),
        Commands::InitConfig { force } => cmd_init_config(cli.config.as_deref(), *force),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => config::load_from(path),
        None => config::load(),
    }
}

/// Write the default configuration to `path` (or the default location)
fn cmd_init_config(path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config::config_path()
            .ok_or_else(|| Error::config("could not determine config directory"))?,
    };
    if path.exists() && !force {
        println!("Config already exists at {:?} (use --force to overwrite)", path);
        return Ok(());
    }

    config::save_to(&Config::default(), &path)?;
    println!("✓ Default config written to {:?}", path);
    Ok(())
}

/// Token cancelled on Ctrl-C; units that have not started report Cancelled.
pub(crate) fn cancel_on_ctrl_c(rt: &Runtime) -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    rt.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling, waiting for running files to finish...");
            cancel.cancel();
        }
    });
    token
}

/// Per-file progress line
pub(crate) fn print_progress(progress: UnitProgress<'_>) {
    let marker = if progress.outcome.is_failure() {
        "✗"
    } else {
        "✓"
    };
    println!(
        "[{}/{}] {} {} ({})",
        progress.completed,
        progress.total,
        marker,
        display_name(progress.path),
        progress.outcome
    );
}

pub(crate) fn print_summary(stats: &BatchStats) {
    println!();
    println!(
        "Done! {} saved, {} skipped, {} failed (of {})",
        stats.saved, stats.skipped, stats.failed, stats.total
    );

    if !stats.failures.is_empty() {
        println!("\nFailures:");
        for failure in stats.failures.iter().take(20) {
            println!("  {} - {}", failure.filename, failure.reason);
        }
        if stats.failures.len() > 20 {
            println!("  ... and {} more", stats.failures.len() - 20);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lyrics_flags() {
        let cli = Cli::try_parse_from([
            "tagfix",
            "lyrics",
            "/music",
            "-r",
            "--lenient",
            "--sidecar",
            "--report",
            "out.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Lyrics {
                recursive,
                no_skip,
                lenient,
                sidecar,
                report,
                ..
            } => {
                assert!(recursive && lenient && sidecar && !no_skip);
                assert_eq!(report, Some(PathBuf::from("out.json")));
            }
            _ => panic!("expected lyrics command"),
        }
    }

    #[test]
    fn test_parse_cover_source() {
        let cli = Cli::try_parse_from(["tagfix", "covers", "/music", "--source", "musicbrainz"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Covers {
                source: Some(CoverSource::MusicBrainz),
                ..
            }
        ));
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["tagfix", "show", "a.mp3", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_init_config_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagfix").join("config.toml");

        cmd_init_config(Some(&path), false).unwrap();
        assert!(load_config(Some(&path)).lyrics.strict_mode);

        std::fs::write(&path, "[lyrics]\nstrict_mode = false\n").unwrap();
        cmd_init_config(Some(&path), false).unwrap();
        assert!(!load_config(Some(&path)).lyrics.strict_mode);

        cmd_init_config(Some(&path), true).unwrap();
        assert!(load_config(Some(&path)).lyrics.strict_mode);
    }

    #[test]
    fn test_download_requires_target_file() {
        let result = Cli::try_parse_from([
            "tagfix",
            "search-releases",
            "--artist",
            "Portishead",
            "--album",
            "Dummy",
            "--download",
            "abc",
        ]);
        assert!(result.is_err());
    }
}
