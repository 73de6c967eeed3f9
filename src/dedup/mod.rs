//! Duplicate detection and removal.
//!
//! This module provides:
//! - Content-hash classification of scanned files (first seen is kept)
//! - Batching of duplicates in discovery order
//! - Confirmed, serialized deletion of each batch

mod batch;
mod deleter;
mod index;
mod pipeline;
mod record;

pub use batch::{BatchCollector, DuplicateBatch, DEFAULT_BATCH_SIZE};
pub use deleter::{format_batch_table, BatchDeleter, BatchOutcome, Confirm, DeletionStats};
pub use index::{Classification, DedupIndex};
pub use pipeline::{DedupOptions, DedupScanner, ScanStats};
pub use record::FileRecord;
