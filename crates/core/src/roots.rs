//! Watched roots and their timestamp policies

use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One directory being tracked, with its ranking policy
///
/// `use_access_time` picks which file timestamp ranks entries from this
/// root: a folder like Downloads is better ranked by when files were last
/// opened (a download's modification time is frozen at download time),
/// while a working folder like Desktop is better ranked by modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedRoot {
    /// Absolute path of the directory
    pub path: PathBuf,
    /// Rank by access time instead of modification time
    #[serde(default)]
    pub use_access_time: bool,
}

impl WatchedRoot {
    /// A root ranked by modification time
    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            use_access_time: false,
        }
    }

    /// A root ranked by access time
    pub fn accessed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            use_access_time: true,
        }
    }

    /// Whether `path` lives under this root
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.path)
    }

    /// Resolve the ranking timestamp for a file in this root
    ///
    /// Falls back to the modification time when the platform cannot report
    /// an access time.
    pub fn touched_at(&self, meta: &Metadata) -> io::Result<SystemTime> {
        if self.use_access_time {
            meta.accessed().or_else(|_| meta.modified())
        } else {
            meta.modified()
        }
    }
}

/// Find the root a path belongs to
///
/// Longest-prefix match, so a nested root wins over one of its ancestors.
pub fn owner_of<'a>(roots: &'a [WatchedRoot], path: &Path) -> Option<&'a WatchedRoot> {
    roots
        .iter()
        .filter(|root| root.contains(path))
        .max_by_key(|root| root.path.as_os_str().len())
}
