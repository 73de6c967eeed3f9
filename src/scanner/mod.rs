//! Filesystem traversal, size accounting and content hashing.

mod hasher;
mod options;
mod size;
mod walker;

pub use hasher::hash_file;
pub use options::{WalkOptions, LINUX_VIRTUAL_FS_PATHS};
pub use size::{dir_size, format_size, parse_size};
pub use walker::{walk, WalkDecision, WalkEntry};
