use std::path::{Path, PathBuf};

/// A regular file seen during the dedup scan.
///
/// Fields are fixed at construction; records are only ever cloned into
/// collections, never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    name: String,
    size: u64,
    kind: String,
    digest: String,
    path: PathBuf,
}

impl FileRecord {
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        size: u64,
        kind: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            kind: kind.into(),
            digest: digest.into(),
            path: path.into(),
        }
    }

    /// Base file name, for display.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes when the file was scanned.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Human-readable kind label.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Hex-encoded content digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Path used to delete the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
