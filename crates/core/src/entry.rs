//! Shelf entries and the document allow-list

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// File extensions eligible for tracking (compared case-insensitively)
pub const TRACKED_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// Why a path could not become a shelf entry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    /// Extension is missing or not on the allow-list
    #[error("not a tracked document type: {0}")]
    NotADocument(PathBuf),
    /// Path has no final component to display
    #[error("path has no file name: {0}")]
    NoFileName(PathBuf),
}

/// One ranked document on the shelf
///
/// The file name (not the full path) is the identity: two entries with the
/// same name are the same logical document, wherever they live. `touched_at`
/// is the ranking key; whether it came from the file's modification time or
/// its access time is decided by the owning root before the entry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShelfEntry {
    /// Absolute path to the document
    pub path: PathBuf,
    /// Base name; the deduplication key
    pub name: String,
    /// Ranking timestamp, per the owning root's policy
    pub touched_at: SystemTime,
}

impl ShelfEntry {
    /// Build an entry for an allow-listed document path
    ///
    /// Fails for paths without a file name or with an extension outside
    /// [`TRACKED_EXTENSIONS`]; entries that would fail the filter are never
    /// constructed.
    pub fn from_path(path: PathBuf, touched_at: SystemTime) -> Result<Self, EntryError> {
        if !is_tracked_file(&path) {
            return Err(EntryError::NotADocument(path));
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return Err(EntryError::NoFileName(path)),
        };
        Ok(Self {
            path,
            name,
            touched_at,
        })
    }
}

/// Check whether a path carries one of the tracked document extensions
pub fn is_tracked_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            TRACKED_EXTENSIONS
                .iter()
                .any(|tracked| e.eq_ignore_ascii_case(tracked))
        })
        .unwrap_or(false)
}
