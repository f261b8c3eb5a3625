//! Batch processing across many files.
//!
//! A batch runs one [`BatchJob`] per file on a bounded worker pool and folds
//! every per-file result into [`BatchStats`]. Nothing a unit does can fail the
//! batch: errors become a [`FetchOutcome`] at the unit boundary.

mod jobs;
mod runner;

pub use jobs::{BatchJob, CoverJob, LyricsJob, ResizeJob};
pub use runner::{BatchProcessor, UnitProgress};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::status::{LyricsStatus, needs_lyrics_fetch};

/// How a lyrics batch treats files and provider results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Leave files that already carry synced lyrics alone
    pub skip_existing: bool,
    /// Only accept synced lyrics
    pub strict_mode: bool,
    /// Write `<stem>.lrc` next to the audio file when synced lyrics are selected
    pub save_sidecar: bool,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            skip_existing: true,
            strict_mode: true,
            save_sidecar: false,
        }
    }
}

/// Result of one unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Skipped,
    NotFound,
    NoSyncedLyrics,
    ReadError,
    WriteError,
    Error(String),
    /// The unit never started because the batch was cancelled
    Cancelled,
}

impl FetchOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Success | Self::Skipped)
    }

    /// Failure reason shown to the user; `None` for saved and skipped units.
    ///
    /// `not_found` is the job-specific wording for [`FetchOutcome::NotFound`].
    pub fn failure_reason(&self, not_found: &str) -> Option<String> {
        Some(match self {
            Self::Success | Self::Skipped => return None,
            Self::NotFound => not_found.to_string(),
            Self::NoSyncedLyrics => "Only unsynced lyrics found".to_string(),
            Self::ReadError => "Read error".to_string(),
            Self::WriteError => "Write error".to_string(),
            Self::Error(detail) => format!("Error: {detail}"),
            Self::Cancelled => "Cancelled".to_string(),
        })
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("saved"),
            Self::Skipped => f.write_str("skipped"),
            Self::NotFound => f.write_str("not found"),
            Self::NoSyncedLyrics => f.write_str("no synced lyrics"),
            Self::ReadError => f.write_str("read error"),
            Self::WriteError => f.write_str("write error"),
            Self::Error(detail) => write!(f, "error: {detail}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// One failed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub filename: String,
    pub reason: String,
}

/// Aggregated batch result.
///
/// `saved + skipped + failed` equals `total` once every submitted file has
/// been recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    /// In completion order
    pub failures: Vec<FailureRecord>,
}

impl BatchStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, path: &Path, outcome: &FetchOutcome, not_found: &str) {
        match outcome {
            FetchOutcome::Success => self.saved += 1,
            FetchOutcome::Skipped => self.skipped += 1,
            _ => {
                self.failed += 1;
                self.failures.push(FailureRecord {
                    filename: display_name(path),
                    reason: outcome.failure_reason(not_found).unwrap_or_default(),
                });
            }
        }
    }

    /// Number of files recorded so far
    pub fn completed(&self) -> usize {
        self.saved + self.skipped + self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.completed() == self.total
    }
}

/// File name for reports; the full path if there is none
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Files a lyrics batch will open, and files it already knows to skip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    pub process: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl BatchPlan {
    /// A plan that opens every file
    pub fn all(paths: Vec<PathBuf>) -> Self {
        Self {
            process: paths,
            skipped: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.process.len() + self.skipped.len()
    }
}

/// Split `paths` using lyrics tiers the caller has already computed.
///
/// Files absent from `known` are always processed. Order is preserved within
/// each half.
pub fn plan(
    paths: Vec<PathBuf>,
    known: &HashMap<PathBuf, LyricsStatus>,
    policy: &BatchPolicy,
) -> BatchPlan {
    let (process, skipped) = paths.into_iter().partition(|path| {
        known
            .get(path)
            .is_none_or(|status| needs_lyrics_fetch(*status, policy))
    });
    BatchPlan { process, skipped }
}
