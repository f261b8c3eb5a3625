//! Cover art commands.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Runtime;

use super::{cancel_on_ctrl_c, print_progress, print_summary};
use crate::batch::{BatchJob, BatchProcessor, CoverJob, ResizeJob};
use crate::config::Config;
use crate::providers::ProviderCascade;
use crate::scanner::collect_audio_files;
use crate::tags;

/// Fetch covers for every file that has none
pub fn cmd_covers(
    rt: &Runtime,
    config: &Config,
    path: &Path,
    recursive: bool,
) -> anyhow::Result<()> {
    let cascade = Arc::new(ProviderCascade::new(config)?);
    println!(
        "Cover source: {:?} first, {:?} artwork",
        config.covers.source,
        cascade.target()
    );
    run_batch(rt, config, path, recursive, Arc::new(CoverJob::new(cascade)))
}

/// Resize embedded covers to 500x500
pub fn cmd_resize_covers(
    rt: &Runtime,
    config: &Config,
    path: &Path,
    recursive: bool,
) -> anyhow::Result<()> {
    run_batch(rt, config, path, recursive, Arc::new(ResizeJob))
}

fn run_batch(
    rt: &Runtime,
    config: &Config,
    path: &Path,
    recursive: bool,
    job: Arc<dyn BatchJob>,
) -> anyhow::Result<()> {
    let files = collect_audio_files(path, recursive)?;
    if files.is_empty() {
        println!("No audio files found.");
        return Ok(());
    }
    println!("Processing {} file(s)...\n", files.len());

    let processor =
        BatchProcessor::new(config.network.workers).with_cancellation(cancel_on_ctrl_c(rt));
    let stats = rt.block_on(processor.run(job, files, print_progress));
    print_summary(&stats);
    Ok(())
}

/// List candidate releases; optionally embed one release's front cover
pub fn cmd_search_releases(
    rt: &Runtime,
    config: &Config,
    artist: &str,
    album: &str,
    download: Option<(&str, &Path)>,
) -> anyhow::Result<()> {
    let cascade = ProviderCascade::new(config)?;

    if let Some((release_id, target)) = download {
        // Open first so an unsupported target fails before the download
        tags::try_read(target)?;
        let Some(cover) = rt.block_on(cascade.cover_for_release(release_id)) else {
            println!("✗ No cover art for release {}", release_id);
            return Ok(());
        };
        tags::write_cover(target, &cover.data, &cover.mime_type)?;
        println!("✓ Cover from {} written to {:?}", cover.url, target);
        return Ok(());
    }

    let releases = rt.block_on(cascade.search_releases(artist, album));
    if releases.is_empty() {
        println!("✗ No releases found.");
        return Ok(());
    }

    for release in &releases {
        println!("{}  {} - {}", release.id, release.artist, release.title);
    }
    println!("\nUse --download <id> --into <file> to embed a release's front cover.");
    Ok(())
}
