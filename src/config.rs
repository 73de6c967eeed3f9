use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Directory name under the user config dir.
const APP_DIR: &str = "dupe-sweeper";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sweep: SweepConfig,
    pub progress: ProgressConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Files smaller than this many bytes are ignored by the dedup phase
    pub min_size: u64,
    /// Number of duplicates shown per confirmation prompt
    pub batch_size: usize,
    /// Remove cache directories before the dedup phase
    pub purge_cache_dirs: bool,
    /// Directory names removed wholesale by the purge phase
    pub cache_dir_names: Vec<String>,
    /// Don't cross filesystem boundaries
    pub one_file_system: bool,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Seconds between timer-driven status redraws
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_size: 0,
            batch_size: crate::dedup::DEFAULT_BATCH_SIZE,
            purge_cache_dirs: false,
            cache_dir_names: vec!["node_modules".to_string()],
            one_file_system: false,
            follow_symlinks: false,
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the per-user config file is
    /// read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Default config file location (`~/.config/dupe-sweeper/config.toml` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Read config file");
        Ok(config)
    }

    /// Reject values the sweep cannot run with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.sweep.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "sweep.batch_size must be at least 1".to_string(),
            ));
        }

        if self.progress.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "progress.interval_secs must be at least 1".to_string(),
            ));
        }

        for name in &self.sweep.cache_dir_names {
            if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                return Err(ConfigError::Invalid(format!(
                    "invalid cache directory name '{}'",
                    name
                )));
            }
        }

        Ok(())
    }
}
