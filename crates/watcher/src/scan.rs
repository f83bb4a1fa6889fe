//! Bulk reconciliation scans
//!
//! Walks every watched root for allow-listed documents and feeds the best
//! candidates into the shelf. Runs once at startup and then on a fixed
//! interval, recovering anything the live feed missed (channel overflow,
//! events lost while the process was not running, access-time ranking).

use crate::events::is_transient_artifact;
use anyhow::Result;
use std::time::Duration;
use tokio::time::interval;
use topshelf_core::{is_tracked_file, SharedShelf, ShelfEntry, WatchedRoot};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Per-root cap on scanned candidates
///
/// Bounds the worst-case pass latency on directories with very large
/// membership; the walk stops as soon as this many allow-listed files have
/// been collected from one root.
pub const MAX_FILES_PER_ROOT: usize = 200;

/// Enumerate up to [`MAX_FILES_PER_ROOT`] documents under one root
///
/// A walk error discards the whole pass for this root; per-file stat
/// failures skip just that file.
pub fn scan_root(root: &WatchedRoot) -> Result<Vec<ShelfEntry>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(&root.path).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_tracked_file(path) || is_transient_artifact(path) {
            continue;
        }

        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(e) => {
                debug!("Skipping {}: {e}", path.display());
                continue;
            }
        };
        let touched_at = match root.touched_at(&meta) {
            Ok(t) => t,
            Err(e) => {
                debug!("Skipping {}: no usable timestamp ({e})", path.display());
                continue;
            }
        };
        if let Ok(entry) = ShelfEntry::from_path(path.to_path_buf(), touched_at) {
            found.push(entry);
        }

        if found.len() >= MAX_FILES_PER_ROOT {
            debug!(
                "Root {} hit the {MAX_FILES_PER_ROOT}-file scan cap",
                root.path.display()
            );
            break;
        }
    }

    Ok(found)
}

/// Scan every root, skipping ones that are missing or unreadable
///
/// A failed root never poisons the pass; partial results from the other
/// roots are still used.
pub fn collect_candidates(roots: &[WatchedRoot]) -> Vec<ShelfEntry> {
    let mut candidates = Vec::new();
    for root in roots {
        if !root.path.is_dir() {
            warn!("Skipping missing root {}", root.path.display());
            continue;
        }
        match scan_root(root) {
            Ok(found) => {
                debug!("Scanned {} documents under {}", found.len(), root.path.display());
                candidates.extend(found);
            }
            Err(e) => warn!("Skipping root {}: {e}", root.path.display()),
        }
    }
    candidates
}

/// Keep the `k` freshest candidates, globally across roots
///
/// Stable sort, so equal timestamps keep their per-root discovery order.
pub fn top_candidates(mut candidates: Vec<ShelfEntry>, k: usize) -> Vec<ShelfEntry> {
    candidates.sort_by(|a, b| b.touched_at.cmp(&a.touched_at));
    candidates.truncate(k);
    candidates
}

/// One full scan pass: enumerate, rank, and feed the shelf
///
/// Candidates are fed oldest-first so that when two roots hold a same-named
/// file, the freshest copy is the one upserted last and therefore the one
/// that keeps the slot. Returns the number of candidates fed.
pub fn scan_into(roots: &[WatchedRoot], shelf: &SharedShelf) -> usize {
    let top = top_candidates(collect_candidates(roots), shelf.capacity());
    let fed = top.len();
    for entry in top.into_iter().rev() {
        shelf.upsert(entry);
    }
    fed
}

/// Repeating scan task
///
/// The first interval tick fires immediately, so `run` doubles as the
/// startup scan. Each pass executes inside `spawn_blocking`: filesystem
/// latency lands on the blocking pool, never on the runtime threads the
/// presentation layer shares.
pub struct PeriodicScanner {
    roots: Vec<WatchedRoot>,
    shelf: SharedShelf,
    interval: Duration,
}

impl PeriodicScanner {
    pub fn new(roots: Vec<WatchedRoot>, shelf: SharedShelf, interval: Duration) -> Self {
        Self {
            roots,
            shelf,
            interval,
        }
    }

    /// Run the scan loop indefinitely; spawn from startup
    pub async fn run(self) {
        let mut timer = interval(self.interval);
        info!("Starting periodic shelf scan (interval: {:?})", self.interval);

        loop {
            timer.tick().await;

            let roots = self.roots.clone();
            let shelf = self.shelf.clone();
            match tokio::task::spawn_blocking(move || scan_into(&roots, &shelf)).await {
                Ok(fed) => debug!("Scan pass fed {fed} candidates"),
                Err(e) => warn!("Scan pass panicked: {e}"),
            }
        }
    }
}
