//! Recent-document tracking engine for Topshelf
//!
//! This crate provides:
//! - Shelf entries and the fixed document allow-list
//! - Watched roots with per-root timestamp policies
//! - The bounded, name-deduplicated, rank-ordered shelf
//! - A thread-safe handle with snapshot reads and change callbacks
//!
//! Producers (the live filesystem feed and the periodic scanner) and the
//! presentation layer all talk to one [`SharedShelf`]; nothing else holds a
//! reference into its storage.

pub mod entry;
pub mod roots;
pub mod shared;
pub mod shelf;

// Re-exports
pub use entry::{is_tracked_file, EntryError, ShelfEntry, TRACKED_EXTENSIONS};
pub use roots::{owner_of, WatchedRoot};
pub use shared::SharedShelf;
pub use shelf::{Shelf, DEFAULT_CAPACITY};
