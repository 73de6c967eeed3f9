use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SweeperError};

use super::options::WalkOptions;

/// One filesystem entry handed to a walk callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path to the entry
    pub path: PathBuf,
    /// Entry name (last component of path)
    pub name: String,
    /// True if this is a directory
    pub is_dir: bool,
    /// True if this is a regular file reached without going through a link
    pub is_file: bool,
    /// True if the entry itself is a symbolic link, followed or not
    pub is_symlink: bool,
    /// Apparent size in bytes (0 for directories)
    pub size: u64,
    /// Depth below the walk root (root is 0)
    pub depth: usize,
}

/// What the walk should do after a callback has seen an entry.
#[derive(Debug)]
pub enum WalkDecision {
    /// Keep going.
    Continue,
    /// Don't descend into the current directory. Ignored for non-directories.
    SkipSubtree,
    /// Stop the whole walk and return the error to the caller.
    Abort(SweeperError),
}

impl WalkEntry {
    fn new(entry: &walkdir::DirEntry, metadata: &fs::Metadata) -> Self {
        let is_dir = metadata.is_dir();
        let is_symlink = entry.path_is_symlink();
        Self {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_file: metadata.is_file() && !is_symlink,
            is_symlink,
            size: if is_dir { 0 } else { metadata.len() },
            depth: entry.depth(),
        }
    }
}

/// Walk `root` depth-first, calling `visit` once per entry.
///
/// Entries within a directory are visited in file-name order. Per-entry
/// failures below the root reach the callback as `Err` and the walk carries
/// on unless the callback aborts. A missing or unreadable root is fatal.
pub fn walk<F>(root: &Path, options: &WalkOptions, mut visit: F) -> Result<()>
where
    F: FnMut(std::result::Result<WalkEntry, SweeperError>) -> WalkDecision,
{
    if let Err(e) = fs::symlink_metadata(root) {
        return Err(if e.kind() == std::io::ErrorKind::NotFound {
            SweeperError::PathNotFound(root.to_path_buf())
        } else {
            SweeperError::Io {
                path: root.to_path_buf(),
                source: e,
            }
        });
    }

    let mut it = WalkDir::new(root)
        .follow_links(options.follow_symlinks)
        .same_file_system(options.one_file_system)
        .sort_by_file_name()
        .into_iter();

    while let Some(result) = it.next() {
        let item = match result {
            Ok(entry) => {
                if entry.depth() > 0 && WalkOptions::is_linux_virtual_fs(entry.path()) {
                    if entry.file_type().is_dir() {
                        it.skip_current_dir();
                    }
                    continue;
                }

                match entry.metadata() {
                    Ok(metadata) => Ok(WalkEntry::new(&entry, &metadata)),
                    Err(source) if entry.depth() == 0 => {
                        return Err(SweeperError::Traversal {
                            path: root.to_path_buf(),
                            source,
                        });
                    }
                    Err(err) => Err(SweeperError::Entry {
                        path: entry.path().to_path_buf(),
                        message: err.to_string(),
                    }),
                }
            }
            Err(source) if source.depth() == 0 => {
                return Err(SweeperError::Traversal {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(err) => Err(SweeperError::Entry {
                path: err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                message: err.to_string(),
            }),
        };

        let is_dir = matches!(&item, Ok(entry) if entry.is_dir);

        match visit(item) {
            WalkDecision::Continue => {}
            WalkDecision::SkipSubtree if is_dir => it.skip_current_dir(),
            WalkDecision::SkipSubtree => {
                tracing::trace!("Ignoring skip request for non-directory entry");
            }
            WalkDecision::Abort(err) => return Err(err),
        }
    }

    Ok(())
}
