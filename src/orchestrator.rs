//! Runs a full sweep: optional cache purge, then the duplicate scan with a
//! deleter thread, all under one progress reporter.

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indicatif::ProgressDrawTarget;

use crate::cleaner::{CachePurger, PurgeOptions, PurgeSummary};
use crate::config::Config;
use crate::dedup::{
    BatchDeleter, Confirm, DedupOptions, DedupScanner, DeletionStats, DuplicateBatch, ScanStats,
    DEFAULT_BATCH_SIZE,
};
use crate::error::{Result, SweeperError};
use crate::progress::{ProgressNotifier, ProgressReporter, ProgressState};
use crate::scanner::WalkOptions;

/// Everything a sweep needs to know up front.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub root: PathBuf,
    /// Run the cache directory purge before deduplicating.
    pub purge_cache: bool,
    pub cache_dir_names: Vec<String>,
    /// Files smaller than this (bytes) are left out of the dedup scan.
    pub min_size: u64,
    pub batch_size: usize,
    pub walk: WalkOptions,
    /// Report what would be removed without removing anything.
    pub dry_run: bool,
    pub progress_interval: Duration,
    /// Draw the status line on stdout; otherwise it stays hidden.
    pub show_progress: bool,
}

impl SweepOptions {
    /// Options for `root` taking every tunable from `config`.
    pub fn from_config(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root: root.into(),
            purge_cache: config.sweep.purge_cache_dirs,
            cache_dir_names: config.sweep.cache_dir_names.clone(),
            min_size: config.sweep.min_size,
            batch_size: config.sweep.batch_size,
            walk: WalkOptions::default()
                .with_one_file_system(config.sweep.one_file_system)
                .with_follow_symlinks(config.sweep.follow_symlinks),
            dry_run: false,
            progress_interval: Duration::from_secs(config.progress.interval_secs),
            show_progress: true,
        }
    }
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            purge_cache: false,
            cache_dir_names: vec!["node_modules".to_string()],
            min_size: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            walk: WalkOptions::default(),
            dry_run: false,
            progress_interval: Duration::from_secs(5),
            show_progress: true,
        }
    }
}

/// Combined results of both phases.
#[derive(Debug, Clone, Default)]
pub struct SweepSummary {
    /// `None` when the purge phase didn't run.
    pub purge: Option<PurgeSummary>,
    pub scan: ScanStats,
    pub deletion: DeletionStats,
    /// Total freed across both phases.
    pub freed_bytes: u64,
    pub elapsed: Duration,
}

/// Drives the sweep phases in order.
pub struct Sweeper {
    options: SweepOptions,
}

impl Sweeper {
    pub fn new(options: SweepOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SweepOptions {
        &self.options
    }

    /// Run the sweep, asking `confirmer` before each batch is deleted.
    ///
    /// The reporter prints its final line before this returns, on success
    /// and on failure alike.
    pub fn run(&self, confirmer: Box<dyn Confirm>) -> Result<SweepSummary> {
        let state = Arc::new(ProgressState::new());
        let interval = self.options.progress_interval;
        let reporter = if self.options.show_progress {
            ProgressReporter::start_on_stdout(Arc::clone(&state), interval)
        } else {
            ProgressReporter::start(Arc::clone(&state), interval, ProgressDrawTarget::hidden())
        };

        let result = self.run_phases(confirmer, &state, reporter.notifier());

        reporter.finish();

        let (purge, scan, deletion) = result?;
        let summary = SweepSummary {
            purge,
            scan,
            deletion,
            freed_bytes: state.freed_bytes(),
            elapsed: state.elapsed(),
        };

        tracing::info!(freed = summary.freed_bytes, "Sweep finished");
        Ok(summary)
    }

    fn run_phases(
        &self,
        confirmer: Box<dyn Confirm>,
        state: &Arc<ProgressState>,
        notifier: ProgressNotifier,
    ) -> Result<(Option<PurgeSummary>, ScanStats, DeletionStats)> {
        let purge = if self.options.purge_cache {
            Some(self.purge_phase(state, &notifier)?)
        } else {
            None
        };

        let (scan, deletion) = self.dedup_phase(confirmer, state, notifier)?;

        Ok((purge, scan, deletion))
    }

    fn purge_phase(
        &self,
        state: &ProgressState,
        notifier: &ProgressNotifier,
    ) -> Result<PurgeSummary> {
        let purger = CachePurger::new(PurgeOptions {
            dir_names: self.options.cache_dir_names.clone(),
            dry_run: self.options.dry_run,
            walk: self.options.walk.clone(),
        });

        let results = purger.purge(&self.options.root, state, notifier)?;
        let summary = CachePurger::summarize(&results);

        if summary.found == 0 {
            let names = self.options.cache_dir_names.join(", ");
            notifier.suspend(|| println!("No {} directories were found.", names));
        }

        Ok(summary)
    }

    fn dedup_phase(
        &self,
        confirmer: Box<dyn Confirm>,
        state: &Arc<ProgressState>,
        notifier: ProgressNotifier,
    ) -> Result<(ScanStats, DeletionStats)> {
        let scanner = DedupScanner::new(DedupOptions {
            min_size: self.options.min_size,
            batch_size: self.options.batch_size,
            walk: self.options.walk.clone(),
        });

        // Zero capacity: the scan only hands over a batch once the deleter
        // is done with the previous one.
        let (tx, rx) = mpsc::sync_channel::<DuplicateBatch>(0);
        let deleter = BatchDeleter::new(confirmer, Arc::clone(state), notifier);
        let handle = thread::spawn(move || deleter.run(rx));

        let scanned = scanner.scan(&self.options.root, |batch| {
            tracing::debug!(files = batch.len(), "Handing batch to deleter");
            tx.send(batch).map_err(|_| SweeperError::DeleterStopped)
        });

        drop(tx);
        let deletion = handle.join().map_err(|_| SweeperError::DeleterStopped)?;

        Ok((scanned?, deletion))
    }
}
