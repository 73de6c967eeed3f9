//! Wholesale removal of dependency cache directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SweeperError};
use crate::progress::{ProgressNotifier, ProgressState};
use crate::scanner::{dir_size, format_size, walk, WalkDecision, WalkEntry, WalkOptions};

/// Result of handling one matched cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeResult {
    /// Directory removed.
    Removed { path: PathBuf, freed_bytes: u64 },
    /// Directory left in place after an error.
    Failed { path: PathBuf, error: String },
    /// Directory left in place on purpose (dry run).
    Skipped {
        path: PathBuf,
        size: u64,
        reason: String,
    },
}

/// Summary of a purge pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PurgeSummary {
    /// Number of matching directories encountered.
    pub found: usize,
    pub removed_count: usize,
    pub failed_count: usize,
    pub skipped_count: usize,
    /// Total bytes freed.
    pub total_freed: u64,
}

/// Options for the purge pass.
#[derive(Debug, Clone)]
pub struct PurgeOptions {
    /// Directory names removed wherever they appear.
    pub dir_names: Vec<String>,
    /// If true, report matches without deleting anything.
    pub dry_run: bool,
    pub walk: WalkOptions,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            dir_names: vec!["node_modules".to_string()],
            dry_run: false,
            walk: WalkOptions::default(),
        }
    }
}

/// Walks a tree removing every directory whose name matches a cache marker.
pub struct CachePurger {
    options: PurgeOptions,
}

impl CachePurger {
    pub fn new(options: PurgeOptions) -> Self {
        Self { options }
    }

    fn has_cache_name(&self, entry: &WalkEntry) -> bool {
        entry.is_dir && entry.depth > 0 && self.options.dir_names.iter().any(|n| *n == entry.name)
    }

    /// True for real directories below the root named like a cache directory.
    /// A link to a directory is never one.
    pub fn is_cache_dir(&self, entry: &WalkEntry) -> bool {
        self.has_cache_name(entry) && !entry.is_symlink
    }

    /// Remove every matching directory under `root`.
    ///
    /// Each removal is credited to `state` and announced through `notifier`.
    /// Matched directories are never descended into. A directory whose size
    /// can't be measured is left untouched.
    pub fn purge(
        &self,
        root: &Path,
        state: &ProgressState,
        notifier: &ProgressNotifier,
    ) -> Result<Vec<PurgeResult>> {
        let mut results = Vec::new();

        tracing::info!(root = %root.display(), names = ?self.options.dir_names, "Purging cache directories");

        walk(root, &self.options.walk, |item| {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("{}", err);
                    return WalkDecision::Continue;
                }
            };

            if !self.is_cache_dir(&entry) {
                if self.has_cache_name(&entry) {
                    tracing::debug!(path = %entry.path.display(), "Not following linked cache directory");
                    return WalkDecision::SkipSubtree;
                }
                return WalkDecision::Continue;
            }

            let result = self.purge_dir(&entry, state, notifier);
            if let PurgeResult::Failed { path, error } = &result {
                tracing::warn!("Leaving {} in place: {}", path.display(), error);
            }
            results.push(result);

            WalkDecision::SkipSubtree
        })?;

        Ok(results)
    }

    fn purge_dir(
        &self,
        entry: &WalkEntry,
        state: &ProgressState,
        notifier: &ProgressNotifier,
    ) -> PurgeResult {
        let path = entry.path.clone();

        let size = match dir_size(&path) {
            Ok(size) => size,
            Err(e) => {
                return PurgeResult::Failed {
                    path,
                    error: e.to_string(),
                }
            }
        };

        if self.options.dry_run {
            notifier.suspend(|| {
                println!(
                    "[DRY RUN] Would delete {} ({})",
                    path.display(),
                    format_size(size)
                );
            });
            return PurgeResult::Skipped {
                path,
                size,
                reason: "dry run".to_string(),
            };
        }

        if let Err(source) = fs::remove_dir_all(&path) {
            let err = SweeperError::Removal {
                path: path.clone(),
                source,
            };
            return PurgeResult::Failed {
                path,
                error: err.to_string(),
            };
        }

        state.record_deletion(size);
        notifier.suspend(|| {
            println!("{} deleted, freeing {} of space", entry.name, format_size(size));
        });
        notifier.notify();

        PurgeResult::Removed {
            path,
            freed_bytes: size,
        }
    }

    /// Get summary statistics from results.
    pub fn summarize(results: &[PurgeResult]) -> PurgeSummary {
        let mut summary = PurgeSummary {
            found: results.len(),
            ..Default::default()
        };

        for result in results {
            match result {
                PurgeResult::Removed { freed_bytes, .. } => {
                    summary.removed_count += 1;
                    summary.total_freed += freed_bytes;
                }
                PurgeResult::Failed { .. } => {
                    summary.failed_count += 1;
                }
                PurgeResult::Skipped { .. } => {
                    summary.skipped_count += 1;
                }
            }
        }

        summary
    }
}
