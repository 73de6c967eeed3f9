//! Confirmation and removal of duplicate batches.

use std::fs;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::error::{Result, SweeperError};
use crate::progress::{ProgressNotifier, ProgressState};
use crate::scanner::format_size;

use super::batch::DuplicateBatch;

/// Decides whether a batch may be deleted.
///
/// Nothing is removed from disk without an `Ok(true)` answer.
pub trait Confirm: Send {
    fn confirm(&mut self, batch: &DuplicateBatch) -> Result<bool>;
}

/// What happened to one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Confirmed; removal attempted for every file.
    Deleted {
        files_deleted: usize,
        bytes_freed: u64,
        failures: usize,
    },
    /// Declined; nothing touched.
    Declined { files: usize },
}

/// Totals across every batch the deleter processed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeletionStats {
    pub batches_confirmed: usize,
    pub batches_declined: usize,
    pub files_deleted: usize,
    pub removal_failures: usize,
    pub bytes_freed: u64,
}

impl DeletionStats {
    pub fn record(&mut self, outcome: &BatchOutcome) {
        match outcome {
            BatchOutcome::Deleted {
                files_deleted,
                bytes_freed,
                failures,
            } => {
                self.batches_confirmed += 1;
                self.files_deleted += files_deleted;
                self.removal_failures += failures;
                self.bytes_freed += bytes_freed;
            }
            BatchOutcome::Declined { .. } => self.batches_declined += 1,
        }
    }
}

/// Processes duplicate batches strictly one at a time.
pub struct BatchDeleter {
    confirmer: Box<dyn Confirm>,
    state: Arc<ProgressState>,
    notifier: ProgressNotifier,
}

impl BatchDeleter {
    pub fn new(
        confirmer: Box<dyn Confirm>,
        state: Arc<ProgressState>,
        notifier: ProgressNotifier,
    ) -> Self {
        Self {
            confirmer,
            state,
            notifier,
        }
    }

    /// Show a batch, ask for confirmation, and remove its files if allowed.
    ///
    /// Removal failures are logged and skipped; files already removed stay
    /// removed. Only files actually removed count towards freed space.
    pub fn process(&mut self, batch: DuplicateBatch) -> BatchOutcome {
        let answer = self.notifier.suspend(|| {
            println!("{}", format_batch_table(&batch));
            self.confirmer.confirm(&batch)
        });

        let confirmed = answer.unwrap_or_else(|e| {
            tracing::warn!("Confirmation failed, keeping batch: {}", e);
            false
        });

        if !confirmed {
            tracing::info!(files = batch.len(), "Batch declined");
            return BatchOutcome::Declined { files: batch.len() };
        }

        let mut files_deleted = 0;
        let mut bytes_freed = 0u64;
        let mut failures = 0;

        for file in batch.files() {
            match fs::remove_file(file.path()) {
                Ok(()) => {
                    tracing::debug!(path = %file.path().display(), "Removed duplicate");
                    files_deleted += 1;
                    bytes_freed += file.size();
                }
                Err(source) => {
                    let err = SweeperError::Removal {
                        path: file.path().to_path_buf(),
                        source,
                    };
                    tracing::warn!("{}", err);
                    failures += 1;
                }
            }
        }

        if files_deleted > 0 {
            self.state.record_deletion(bytes_freed);
        }

        self.notifier.suspend(|| {
            println!(
                "Deleted {} files, freed {} of space!",
                files_deleted,
                format_size(bytes_freed)
            );
        });
        self.notifier.notify();

        BatchOutcome::Deleted {
            files_deleted,
            bytes_freed,
            failures,
        }
    }

    /// Drain `batches` until the sending side hangs up.
    pub fn run(mut self, batches: Receiver<DuplicateBatch>) -> DeletionStats {
        let mut stats = DeletionStats::default();

        for batch in batches {
            let outcome = self.process(batch);
            stats.record(&outcome);
        }

        stats
    }
}

/// Render a batch as a table of name, size in KB, kind and path.
pub fn format_batch_table(batch: &DuplicateBatch) -> String {
    const HEADERS: [&str; 4] = ["Name", "Size (KB)", "Kind", "Path"];

    let rows: Vec<[String; 4]> = batch
        .files()
        .iter()
        .map(|f| {
            [
                f.name().to_string(),
                (f.size() / 1024).to_string(),
                f.kind().to_string(),
                f.path().display().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::from("Found duplicates:\n");
    push_row(&mut output, &HEADERS, &widths);
    for row in &rows {
        let cells = [
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ];
        push_row(&mut output, &cells, &widths);
    }
    output.push_str(&format!(
        "Total reclaimable: {}",
        format_size(batch.total_size())
    ));

    output
}

fn push_row(output: &mut String, cells: &[&str; 4], widths: &[usize; 4]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    output.push_str(line.trim_end());
    output.push('\n');
}
