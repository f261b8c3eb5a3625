//! Lyrics batch and search commands.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use tokio::runtime::Runtime;

use super::{cancel_on_ctrl_c, print_progress, print_summary};
use crate::batch::{self, BatchPolicy, BatchProcessor, BatchStats, LyricsJob};
use crate::config::Config;
use crate::providers::ProviderCascade;
use crate::scanner::collect_audio_files;
use crate::status::{self, LyricsStatus};
use crate::tags;

/// JSON written by `lyrics --report`
#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    generated_at: String,
    job: &'a str,
    strict_mode: bool,
    skip_existing: bool,
    #[serde(flatten)]
    stats: &'a BatchStats,
}

/// Batch fetch lyrics for one file or a directory
pub fn cmd_lyrics(
    rt: &Runtime,
    config: &Config,
    path: &Path,
    recursive: bool,
    policy: BatchPolicy,
    report: Option<&Path>,
) -> anyhow::Result<()> {
    let files = collect_audio_files(path, recursive)?;
    if files.is_empty() {
        println!("No audio files found.");
        return Ok(());
    }

    let known = known_statuses(&files);
    let plan = batch::plan(files, &known, &policy);
    if !plan.skipped.is_empty() {
        println!("{} file(s) already have lyrics", plan.skipped.len());
    }
    println!("Fetching lyrics for {} file(s)...\n", plan.process.len());

    let cascade = Arc::new(ProviderCascade::new(config)?);
    let job = Arc::new(LyricsJob::new(cascade, policy));
    let processor =
        BatchProcessor::new(config.network.workers).with_cancellation(cancel_on_ctrl_c(rt));

    let stats = rt.block_on(processor.run_plan(job, plan, print_progress));
    print_summary(&stats);

    if let Some(report_path) = report {
        write_report(report_path, &stats, &policy)?;
        println!("\nReport written to {:?}", report_path);
    }
    Ok(())
}

/// Lyrics tiers of every file, read in parallel.
///
/// Files that cannot be read are left out so the batch opens them again and
/// reports the read error.
fn known_statuses(files: &[PathBuf]) -> HashMap<PathBuf, LyricsStatus> {
    files
        .par_iter()
        .filter_map(|file| {
            let tag_set = tags::try_read(file).ok()?;
            Some((file.clone(), status::lyrics_status(&tag_set.lyrics)))
        })
        .collect()
}

fn write_report(path: &Path, stats: &BatchStats, policy: &BatchPolicy) -> anyhow::Result<()> {
    let report = BatchReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        job: "lyrics",
        strict_mode: policy.strict_mode,
        skip_existing: policy.skip_existing,
        stats,
    };
    std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

/// Search lyrics by artist and title
pub fn cmd_search_lyrics(
    rt: &Runtime,
    config: &Config,
    artist: &str,
    title: &str,
    album: &str,
) -> anyhow::Result<()> {
    let cascade = ProviderCascade::new(config)?;
    let candidates = rt.block_on(cascade.search_lyrics(artist, title, album));

    if candidates.is_empty() {
        println!("✗ No lyrics found.");
        return Ok(());
    }

    println!("{} result(s):\n", candidates.len());
    for (i, candidate) in candidates.iter().enumerate() {
        let kind = match (&candidate.synced_lyrics, &candidate.plain_lyrics) {
            (Some(_), _) => "synced",
            (None, Some(_)) => "plain",
            (None, None) => "instrumental",
        };
        println!(
            "{:>3}. {} - {} [{}] ({})",
            i + 1,
            candidate.artist,
            candidate.title,
            candidate.album,
            kind
        );
    }
    Ok(())
}
