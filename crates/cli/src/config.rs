//! Configuration for the shelf
//!
//! Loaded from a TOML file (default `~/.config/topshelf/config.toml`); every
//! field has a default so an absent file means "track Desktop by
//! modification time and Downloads by access time".

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use topshelf_core::{WatchedRoot, DEFAULT_CAPACITY};

/// Default seconds between full re-scans
pub const DEFAULT_RESCAN_INTERVAL_SECS: u64 = 300;

/// Floor for the re-scan interval
pub const MIN_RESCAN_INTERVAL_SECS: u64 = 10;

/// Ceiling for the shelf capacity
pub const MAX_CAPACITY: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directories to track, each with its timestamp policy
    #[serde(default = "default_roots")]
    pub roots: Vec<WatchedRoot>,

    /// Number of documents kept on the shelf
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Seconds between full re-scans
    #[serde(default = "default_rescan_interval_secs")]
    pub rescan_interval_secs: u64,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_rescan_interval_secs() -> u64 {
    DEFAULT_RESCAN_INTERVAL_SECS
}

/// Desktop ranked by modification time, Downloads by access time
///
/// A download's mtime is frozen at download time, so "recently relevant"
/// there means "recently opened".
fn default_roots() -> Vec<WatchedRoot> {
    let mut roots = Vec::new();
    if let Some(desktop) = dirs::desktop_dir() {
        roots.push(WatchedRoot::modified(desktop));
    }
    if let Some(downloads) = dirs::download_dir() {
        roots.push(WatchedRoot::accessed(downloads));
    }
    roots
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            capacity: default_capacity(),
            rescan_interval_secs: default_rescan_interval_secs(),
        }
    }
}

impl Config {
    /// Default config file location under the user config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("topshelf/config.toml"))
    }

    /// Load configuration
    ///
    /// An explicitly given path must exist; the default path falls back to
    /// built-in defaults when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::parse(&raw)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?
            }
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path).with_context(|| {
                        format!("Failed to read config file {}", path.display())
                    })?;
                    Self::parse(&raw).with_context(|| {
                        format!("Failed to parse config file {}", path.display())
                    })?
                }
                None => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reject configurations outside the supported ranges
    pub fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            bail!("No watched roots configured (and no Desktop/Downloads directory to default to)");
        }
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            bail!(
                "capacity must be between 1 and {MAX_CAPACITY} (got {})",
                self.capacity
            );
        }
        if self.rescan_interval_secs < MIN_RESCAN_INTERVAL_SECS {
            bail!(
                "rescan_interval_secs must be at least {MIN_RESCAN_INTERVAL_SECS} (got {})",
                self.rescan_interval_secs
            );
        }
        Ok(())
    }

    pub fn rescan_interval(&self) -> Duration {
        Duration::from_secs(self.rescan_interval_secs)
    }
}
