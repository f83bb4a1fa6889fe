//! Shelf producers for Topshelf
//!
//! This crate provides the two writers that feed the shared shelf:
//! - The live change feed: `notify` events decoded into shelf mutations,
//!   applied on a dedicated thread
//! - The periodic scanner: a capped `walkdir` pass over every watched root,
//!   run at startup and on a fixed interval thereafter
//!
//! All `notify::Event` decoding is confined to the `events` module; the rest
//! of the crate only sees plain `(path, kind)` changes.

pub mod events;
pub mod scan;
pub mod watch;

// Re-exports
pub use events::{decode_event, is_transient_artifact, ChangeKind, ShelfChange, MAX_EVENT_PATHS};
pub use scan::{
    collect_candidates, scan_into, scan_root, top_candidates, PeriodicScanner, MAX_FILES_PER_ROOT,
};
pub use watch::ShelfWatcher;
