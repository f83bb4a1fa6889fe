//! Decoding raw filesystem notifications into shelf changes
//!
//! Everything `notify`-specific lives here: event-kind classification,
//! rename-pair splitting, the oversized-batch guard, and the filters that
//! keep non-documents and editor artifacts off the shelf. The rest of the
//! crate only ever sees plain [`ShelfChange`] values.

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::Event;
use std::path::{Path, PathBuf};
use topshelf_core::is_tracked_file;
use tracing::warn;

/// Maximum plausible path count for one raw notification
///
/// Real backends deliver events with one or two paths; an event reporting
/// more than this is treated as garbage and dropped whole rather than
/// partially processed.
pub const MAX_EVENT_PATHS: usize = 512;

/// What a notification says happened to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// One decoded, filtered change ready to apply to the shelf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Short-lived sibling files that carry document extensions
///
/// Office suites and editors leave `~$report.docx` owner files, hidden
/// `.`-prefixed copies, and `.tmp`/`~` temporaries next to real documents;
/// none of them belong on the shelf.
pub fn is_transient_artifact(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    name.starts_with("~$")
        || name.starts_with('.')
        || name.ends_with(".tmp")
        || name.ends_with('~')
}

/// Decode one raw notification into zero or more shelf changes
///
/// Paths outside the document allow-list and transient artifacts are
/// filtered out here, so downstream never touches them. Access events and
/// kinds no backend differentiates are ignored.
pub fn decode_event(event: &Event) -> Vec<ShelfChange> {
    if event.paths.len() > MAX_EVENT_PATHS {
        warn!(
            "Dropping implausible notification batch ({} paths)",
            event.paths.len()
        );
        return Vec::new();
    }

    // A rename pair carries both ends of the move in one event
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        if event.paths.len() != 2 {
            warn!(
                "Dropping malformed rename event ({} paths)",
                event.paths.len()
            );
            return Vec::new();
        }
        let mut changes = Vec::new();
        push_change(&mut changes, &event.paths[0], ChangeKind::Removed);
        push_change(&mut changes, &event.paths[1], ChangeKind::Created);
        return changes;
    }

    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => ChangeKind::Removed,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Removed,
        _ => return Vec::new(),
    };

    let mut changes = Vec::new();
    for path in &event.paths {
        push_change(&mut changes, path, kind);
    }
    changes
}

fn push_change(out: &mut Vec<ShelfChange>, path: &Path, kind: ChangeKind) {
    if !is_tracked_file(path) || is_transient_artifact(path) {
        return;
    }
    out.push(ShelfChange {
        path: path.to_path_buf(),
        kind,
    });
}
