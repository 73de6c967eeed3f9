use std::path::Path;

/// Configuration options for directory walks.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Stay on the same filesystem (don't cross mount points)
    pub one_file_system: bool,

    /// Follow symbolic links
    pub follow_symlinks: bool,
}

/// Linux virtual filesystem paths that are never walked.
/// These can report incorrect/huge sizes and cause scanning issues.
pub const LINUX_VIRTUAL_FS_PATHS: &[&str] = &["/proc", "/dev", "/sys", "/run"];

impl WalkOptions {
    /// Check if a path lies on a Linux virtual filesystem
    pub fn is_linux_virtual_fs(path: &Path) -> bool {
        LINUX_VIRTUAL_FS_PATHS
            .iter()
            .any(|vfs| path.starts_with(vfs))
    }

    /// Create a new WalkOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to stay on the same filesystem
    pub fn with_one_file_system(mut self, enabled: bool) -> Self {
        self.one_file_system = enabled;
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}
