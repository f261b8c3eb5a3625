//! Bounded-concurrency batch runner.
//!
//! Every file gets its own task. A semaphore caps how many run at once, and
//! finished units are sent over a channel to the single consumer that owns
//! [`BatchStats`]. The progress callback runs on that consumer, once per file,
//! in completion order.

use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;

use super::{BatchJob, BatchPlan, BatchStats, FetchOutcome};

/// Progress report for one finished file
#[derive(Debug)]
pub struct UnitProgress<'a> {
    pub path: &'a Path,
    pub outcome: &'a FetchOutcome,
    /// Files recorded so far, including this one
    pub completed: usize,
    pub total: usize,
}

pub struct BatchProcessor {
    workers: usize,
    cancel: CancellationToken,
}

impl BatchProcessor {
    /// A runner with `workers` concurrent units (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops units which have not started yet
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(
        &self,
        job: Arc<dyn BatchJob>,
        paths: Vec<PathBuf>,
        progress: impl FnMut(UnitProgress<'_>),
    ) -> BatchStats {
        self.run_plan(job, BatchPlan::all(paths), progress).await
    }

    /// Run `plan.process`, counting `plan.skipped` without opening those files.
    pub async fn run_plan(
        &self,
        job: Arc<dyn BatchJob>,
        plan: BatchPlan,
        mut progress: impl FnMut(UnitProgress<'_>),
    ) -> BatchStats {
        let not_found = job.not_found_reason();
        let mut stats = BatchStats::new(plan.total());
        tracing::info!(
            "Starting {} batch: {} files ({} pre-filtered), {} workers",
            job.name(),
            stats.total,
            plan.skipped.len(),
            self.workers
        );

        let mut report = |stats: &mut BatchStats, path: &Path, outcome: &FetchOutcome| {
            stats.record(path, outcome, not_found);
            progress(UnitProgress {
                path,
                outcome,
                completed: stats.completed(),
                total: stats.total,
            });
        };

        for path in &plan.skipped {
            report(&mut stats, path, &FetchOutcome::Skipped);
        }

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let (tx, mut rx) = mpsc::channel::<(PathBuf, FetchOutcome)>(self.workers);

        for path in plan.process {
            let job = Arc::clone(&job);
            let semaphore = Arc::clone(&semaphore);
            let cancel = self.cancel.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let outcome = run_unit(job.as_ref(), &path, &semaphore, &cancel).await;
                // The receiver only goes away if the whole batch was dropped
                let _ = tx.send((path, outcome)).await;
            });
        }
        drop(tx);

        while let Some((path, outcome)) = rx.recv().await {
            tracing::debug!("{:?}: {}", path, outcome);
            report(&mut stats, &path, &outcome);
        }

        tracing::info!(
            "Finished {} batch: {} saved, {} skipped, {} failed",
            job.name(),
            stats.saved,
            stats.skipped,
            stats.failed
        );
        stats
    }
}

/// One file, start to finish. Never panics and never errors.
async fn run_unit(
    job: &dyn BatchJob,
    path: &Path,
    semaphore: &Semaphore,
    cancel: &CancellationToken,
) -> FetchOutcome {
    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return FetchOutcome::Cancelled,
        permit = semaphore.acquire() => match permit {
            Ok(permit) => permit,
            Err(e) => return FetchOutcome::Error(e.to_string()),
        },
    };
    if cancel.is_cancelled() {
        return FetchOutcome::Cancelled;
    }

    match AssertUnwindSafe(job.run(path)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::error!("Worker panicked on {:?}", path);
            FetchOutcome::Error("worker panicked".to_string())
        }
    }
}
