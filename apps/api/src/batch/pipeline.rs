//! Batch pipeline: unpack → normalize each entry → collect rows.
//!
//! Entries are read on the blocking pool and handed over one at a time
//! through a bounded channel, so the archive is never fully buffered and
//! extraction stays strictly sequential.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::bail;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::batch::archive::{ArchiveEntry, ArchiveError, ResumeArchive};
use crate::batch::exporter::ResultTable;
use crate::batch::normalizer::normalize_resume;
use crate::extract::{ExtractionError, ResumeExtractor};

/// What to do when a single entry cannot be processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole batch on the first bad entry.
    #[default]
    FailFast,
    /// Skip bad entries and report them alongside the rows that succeeded.
    BestEffort,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_fast" => Ok(Self::FailFast),
            "best_effort" => Ok(Self::BestEffort),
            other => bail!("unknown failure policy '{other}' (expected 'fail_fast' or 'best_effort')"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("archive reader stopped unexpectedly: {0}")]
    Unpacker(#[from] tokio::task::JoinError),

    #[error("entry '{entry}' failed: {source}")]
    Entry {
        entry: String,
        #[source]
        source: ExtractionError,
    },
}

/// An entry skipped under [`FailurePolicy::BestEffort`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub entry: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub table: ResultTable,
    pub failures: Vec<EntryFailure>,
}

/// Runs every file in the archive at `archive_path` through `extractor`, in
/// listing order.
pub async fn process_archive(
    archive_path: &Path,
    extractor: &dyn ResumeExtractor,
    staging_dir: &Path,
    policy: FailurePolicy,
) -> Result<BatchOutcome, BatchError> {
    let unpacker = Unpacker::open(archive_path.to_path_buf());
    run_batch(unpacker, extractor, staging_dir, policy).await
}

async fn run_batch(
    mut unpacker: Unpacker,
    extractor: &dyn ResumeExtractor,
    staging_dir: &Path,
    policy: FailurePolicy,
) -> Result<BatchOutcome, BatchError> {
    let mut outcome = BatchOutcome::default();
    let mut position = 0usize;

    while let Some(next) = unpacker.next().await? {
        position += 1;
        let entry = match next {
            Ok(entry) => entry,
            Err(ArchiveError::UnsafeEntryName(name)) if policy == FailurePolicy::BestEffort => {
                warn!(entry = %name, "Skipping archive entry with unsafe name");
                outcome.failures.push(EntryFailure {
                    reason: format!("entry name escapes the archive root: {name}"),
                    entry: name,
                });
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match normalize_resume(&entry.name, &entry.data, extractor, staging_dir).await {
            Ok(record) => outcome.table.push(record),
            Err(source) => match policy {
                FailurePolicy::FailFast => {
                    return Err(BatchError::Entry {
                        entry: entry.name,
                        source,
                    })
                }
                FailurePolicy::BestEffort => {
                    warn!(entry = %entry.name, position, error = %source, "Skipping resume");
                    outcome.failures.push(EntryFailure {
                        entry: entry.name,
                        reason: source.to_string(),
                    });
                }
            },
        }
    }

    info!(
        rows = outcome.table.len(),
        failures = outcome.failures.len(),
        backend = extractor.backend_name(),
        "Processed resume archive"
    );
    Ok(outcome)
}

type EntryResult = Result<ArchiveEntry, ArchiveError>;

/// Archive reader running on the blocking pool. The channel holds one entry,
/// so the reader stays at most one entry ahead; dropping the unpacker stops it.
struct Unpacker {
    entries: mpsc::Receiver<EntryResult>,
    task: Option<JoinHandle<()>>,
}

impl Unpacker {
    fn open(archive_path: PathBuf) -> Self {
        Self::spawn(move |emit| {
            let mut archive = match ResumeArchive::open(&archive_path) {
                Ok(archive) => archive,
                Err(e) => {
                    emit(Err(e));
                    return;
                }
            };
            info!(
                path = %archive_path.display(),
                listed = archive.len(),
                "Opened resume archive"
            );
            for entry in archive.entries() {
                let fatal = matches!(entry, Err(ArchiveError::Io(_) | ArchiveError::Invalid(_)));
                if !emit(entry) || fatal {
                    return;
                }
            }
        })
    }

    /// `produce` hands entries to `emit`, which returns false once the
    /// receiving side is gone.
    fn spawn<F>(produce: F) -> Self
    where
        F: FnOnce(&mut dyn FnMut(EntryResult) -> bool) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::task::spawn_blocking(move || {
            let mut emit = |entry: EntryResult| tx.blocking_send(entry).is_ok();
            produce(&mut emit);
        });
        Self {
            entries: rx,
            task: Some(task),
        }
    }

    /// Next entry, or `None` once the reader finished cleanly. A reader that
    /// died mid-archive is an error, never a short archive.
    async fn next(&mut self) -> Result<Option<EntryResult>, BatchError> {
        if let Some(entry) = self.entries.recv().await {
            return Ok(Some(entry));
        }
        if let Some(task) = self.task.take() {
            task.await?;
        }
        Ok(None)
    }
}
