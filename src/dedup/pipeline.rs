//! Walk, hash and classify every file, cutting duplicate batches as they fill.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::kind::kind_of;
use crate::scanner::{hash_file, walk, WalkDecision, WalkOptions};

use super::batch::{BatchCollector, DuplicateBatch, DEFAULT_BATCH_SIZE};
use super::index::{Classification, DedupIndex};
use super::record::FileRecord;

/// Options for the dedup scan.
#[derive(Debug, Clone)]
pub struct DedupOptions {
    /// Files smaller than this are never hashed or reported.
    pub min_size: u64,
    /// Duplicates per batch.
    pub batch_size: usize,
    pub walk: WalkOptions,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            min_size: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            walk: WalkOptions::default(),
        }
    }
}

/// Counters collected while scanning.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    /// Regular files visited.
    pub files_scanned: usize,
    /// Files skipped for being below the size floor.
    pub files_below_min: usize,
    pub originals: usize,
    pub duplicates_found: usize,
    /// Same digest, different size; kept.
    pub collisions: usize,
    /// Same file reached again through a followed link; kept.
    pub aliases: usize,
    /// Files that couldn't be read for hashing.
    pub hash_failures: usize,
    /// Entries the walk couldn't access.
    pub entry_errors: usize,
    pub batches_flushed: usize,
}

/// Runs the classification pass over a directory tree.
pub struct DedupScanner {
    options: DedupOptions,
}

impl DedupScanner {
    pub fn new(options: DedupOptions) -> Self {
        Self { options }
    }

    /// Scan `root`, passing each full batch to `sink` as soon as it fills and
    /// the trailing partial batch once the walk ends.
    ///
    /// An error from `sink` aborts the walk.
    pub fn scan<S>(&self, root: &Path, mut sink: S) -> Result<ScanStats>
    where
        S: FnMut(DuplicateBatch) -> Result<()>,
    {
        let mut index = DedupIndex::new();
        let mut collector = BatchCollector::new(self.options.batch_size);
        let mut stats = ScanStats::default();

        tracing::info!(root = %root.display(), min_size = self.options.min_size, "Scanning for duplicates");

        walk(root, &self.options.walk, |item| {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("{}", err);
                    stats.entry_errors += 1;
                    return WalkDecision::Continue;
                }
            };

            if !entry.is_file {
                return WalkDecision::Continue;
            }
            stats.files_scanned += 1;

            if entry.size < self.options.min_size {
                stats.files_below_min += 1;
                return WalkDecision::Continue;
            }

            let digest = match hash_file(&entry.path) {
                Ok(digest) => digest,
                Err(err) => {
                    tracing::warn!("Skipping file: {}", err);
                    stats.hash_failures += 1;
                    return WalkDecision::Continue;
                }
            };

            let record = FileRecord::new(
                &entry.path,
                entry.name,
                entry.size,
                kind_of(&entry.path),
                digest,
            );

            match index.classify(&record) {
                Classification::Original => stats.originals += 1,
                Classification::Collision { original } => {
                    tracing::warn!(
                        "Digest of '{}' matches '{}' but sizes differ, keeping both",
                        record.path().display(),
                        original.display()
                    );
                    stats.collisions += 1;
                }
                Classification::Duplicate { original }
                    if is_same_file(&original, record.path()) =>
                {
                    tracing::debug!(
                        path = %record.path().display(),
                        original = %original.display(),
                        "Same file reached twice, keeping it"
                    );
                    stats.aliases += 1;
                }
                Classification::Duplicate { original } => {
                    tracing::debug!(
                        path = %record.path().display(),
                        original = %original.display(),
                        "Duplicate found"
                    );
                    stats.duplicates_found += 1;

                    if let Some(batch) = collector.push(record) {
                        stats.batches_flushed += 1;
                        if let Err(err) = sink(batch) {
                            return WalkDecision::Abort(err);
                        }
                    }
                }
            }

            WalkDecision::Continue
        })?;

        if let Some(batch) = collector.finish() {
            stats.batches_flushed += 1;
            sink(batch)?;
        }

        tracing::info!(
            files = stats.files_scanned,
            duplicates = stats.duplicates_found,
            "Duplicate scan finished"
        );

        Ok(stats)
    }
}

/// True when both paths resolve to the same file on disk.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
