//! Per-file units of work.
//!
//! Tag I/O is blocking and runs on the blocking pool; provider calls run on
//! the async workers. Each job returns a [`FetchOutcome`] and never an error.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use super::{BatchPolicy, FetchOutcome};
use crate::error::ResultExt;
use crate::providers::{LyricsQuery, LyricsResult, ProviderCascade};
use crate::status::{self, LyricsStatus};
use crate::tags::{self, CoverArt, TagSet};

/// One kind of per-file batch work
#[async_trait]
pub trait BatchJob: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Failure reason reported for [`FetchOutcome::NotFound`]
    fn not_found_reason(&self) -> &'static str;

    async fn run(&self, path: &Path) -> FetchOutcome;
}

/// Run blocking tag I/O off the async workers.
///
/// A panic on the blocking pool is resumed here so the runner's unwind guard
/// sees it.
async fn blocking<T, F>(f: F) -> Result<T, FetchOutcome>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        if e.is_panic() {
            std::panic::resume_unwind(e.into_panic());
        }
        FetchOutcome::Error(e.to_string())
    })
}

async fn read_tags(path: &Path) -> Result<TagSet, FetchOutcome> {
    let path = path.to_path_buf();
    blocking(move || tags::try_read(&path))
        .await?
        .map_err(|e| {
            tracing::debug!("Read failed: {}", e);
            FetchOutcome::ReadError
        })
}

async fn read_cover(path: &Path) -> Result<Option<CoverArt>, FetchOutcome> {
    let path = path.to_path_buf();
    blocking(move || tags::read_cover(&path)).await
}

async fn write_cover(path: &Path, data: Vec<u8>, mime: String) -> FetchOutcome {
    let path = path.to_path_buf();
    match blocking(move || tags::write_cover(&path, &data, &mime)).await {
        Ok(Ok(())) => FetchOutcome::Success,
        Ok(Err(e)) => {
            tracing::warn!("Cover write failed: {}", e);
            FetchOutcome::WriteError
        }
        Err(outcome) => outcome,
    }
}

// ============================================================================
// Lyrics
// ============================================================================

/// Lyrics chosen from a provider result
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    Synced(String),
    Plain(String),
}

impl Selection {
    fn choose(result: LyricsResult, strict_mode: bool) -> Option<Self> {
        match (result.synced_lyrics, result.plain_lyrics) {
            (Some(synced), _) if !synced.is_empty() => Some(Self::Synced(synced)),
            (_, Some(plain)) if !strict_mode && !plain.is_empty() => Some(Self::Plain(plain)),
            _ => None,
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::Synced(text) | Self::Plain(text) => text,
        }
    }
}

/// `<stem>.lrc` beside the audio file
pub fn sidecar_path(path: &Path) -> PathBuf {
    path.with_extension("lrc")
}

/// Fetch lyrics for a file and embed them
pub struct LyricsJob {
    cascade: Arc<ProviderCascade>,
    policy: BatchPolicy,
}

impl LyricsJob {
    pub fn new(cascade: Arc<ProviderCascade>, policy: BatchPolicy) -> Self {
        Self { cascade, policy }
    }

    async fn process(&self, path: &Path) -> Result<FetchOutcome, FetchOutcome> {
        let mut tag_set = read_tags(path).await?;

        if self.policy.skip_existing
            && status::lyrics_status(&tag_set.lyrics) == LyricsStatus::Synced
        {
            return Ok(FetchOutcome::Skipped);
        }

        let Some(result) = self
            .cascade
            .fetch_lyrics(&LyricsQuery::from_tags(&tag_set))
            .await
        else {
            return Ok(FetchOutcome::NotFound);
        };

        let Some(selection) = Selection::choose(result, self.policy.strict_mode) else {
            return Ok(FetchOutcome::NoSyncedLyrics);
        };

        if let (true, Selection::Synced(text)) = (self.policy.save_sidecar, &selection) {
            let sidecar = sidecar_path(path);
            let contents = text.clone();
            blocking(move || {
                std::fs::write(&sidecar, contents)
                    .with_context(format!("writing {}", sidecar.display()))
            })
            .await?
            .map_err(|e| FetchOutcome::Error(e.to_string()))?;
        }

        tag_set.lyrics = selection.into_text();
        let target = path.to_path_buf();
        match blocking(move || tags::write(&target, &tag_set)).await? {
            Ok(_) => Ok(FetchOutcome::Success),
            Err(e) => {
                tracing::warn!("Lyrics write failed for {:?}: {}", path, e);
                Ok(FetchOutcome::WriteError)
            }
        }
    }
}

#[async_trait]
impl BatchJob for LyricsJob {
    fn name(&self) -> &'static str {
        "lyrics"
    }

    fn not_found_reason(&self) -> &'static str {
        "No lyrics found"
    }

    async fn run(&self, path: &Path) -> FetchOutcome {
        self.process(path).await.unwrap_or_else(|outcome| outcome)
    }
}

// ============================================================================
// Covers
// ============================================================================

/// Fetch a cover for files that have none
pub struct CoverJob {
    cascade: Arc<ProviderCascade>,
}

impl CoverJob {
    pub fn new(cascade: Arc<ProviderCascade>) -> Self {
        Self { cascade }
    }

    async fn process(&self, path: &Path) -> Result<FetchOutcome, FetchOutcome> {
        let tag_set = read_tags(path).await?;
        let cover = read_cover(path).await?;
        if !status::needs_cover_fetch(status::cover_status(cover.as_ref())) {
            return Ok(FetchOutcome::Skipped);
        }

        let Some(image) = self
            .cascade
            .fetch_cover(&tag_set.artist, &tag_set.album)
            .await
        else {
            return Ok(FetchOutcome::NotFound);
        };
        Ok(write_cover(path, image.data, image.mime_type).await)
    }
}

#[async_trait]
impl BatchJob for CoverJob {
    fn name(&self) -> &'static str {
        "covers"
    }

    fn not_found_reason(&self) -> &'static str {
        "No cover found"
    }

    async fn run(&self, path: &Path) -> FetchOutcome {
        self.process(path).await.unwrap_or_else(|outcome| outcome)
    }
}

/// Normalize embedded covers that are not 500x500
#[derive(Debug, Default)]
pub struct ResizeJob;

impl ResizeJob {
    async fn process(&self, path: &Path) -> Result<FetchOutcome, FetchOutcome> {
        read_tags(path).await?;
        let cover = match read_cover(path).await? {
            Some(cover) if status::needs_cover_resize(status::cover_status(Some(&cover))) => cover,
            Some(_) => return Ok(FetchOutcome::Skipped),
            None => return Ok(FetchOutcome::NotFound),
        };
        let jpeg = blocking(move || {
            tags::normalize_cover(cover.data()).with_context("resizing cover")
        })
        .await?
        .map_err(|e| FetchOutcome::Error(e.to_string()))?;

        Ok(write_cover(path, jpeg, "image/jpeg".to_string()).await)
    }
}

#[async_trait]
impl BatchJob for ResizeJob {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn not_found_reason(&self) -> &'static str {
        "No embedded cover"
    }

    async fn run(&self, path: &Path) -> FetchOutcome {
        self.process(path).await.unwrap_or_else(|outcome| outcome)
    }
}
