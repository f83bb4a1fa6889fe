//! The shelf renderer
//!
//! `ShelfView` is the consumer side of the shelf's change callback. The
//! callback itself only queues a refresh; the render task pulls a fresh
//! snapshot and reprints on its own schedule. `Notify` keeps a pending
//! permit, so a change observed before the render task is polling is never
//! lost, and a burst of changes collapses into one reprint.

use crate::util;
use owo_colors::OwoColorize;
use std::sync::Arc;
use tokio::sync::Notify;
use topshelf_core::{SharedShelf, ShelfEntry};

pub struct ShelfView {
    shelf: SharedShelf,
    refresh: Arc<Notify>,
}

impl ShelfView {
    /// Register as the shelf's change consumer
    pub fn attach(shelf: SharedShelf) -> Self {
        let refresh = Arc::new(Notify::new());
        let waker = refresh.clone();
        // Safe to invoke from any producer thread; queuing never blocks
        shelf.set_on_change(move || waker.notify_one());
        Self { shelf, refresh }
    }

    /// Render loop: wait for a change, pull a snapshot, reprint
    pub async fn run(self) {
        loop {
            self.refresh.notified().await;
            print!("{}", render(&self.shelf.snapshot()));
        }
    }
}

/// Render the ranked list
pub fn render(entries: &[ShelfEntry]) -> String {
    let mut out = String::new();
    out.push('\n');
    if entries.is_empty() {
        out.push_str(&format!("{}\n", "No tracked documents yet".dimmed()));
        return out;
    }

    out.push_str(&format!(
        "{} ({} documents)\n",
        "Topshelf".bold(),
        entries.len()
    ));
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {}  {}  {}\n",
            i + 1,
            entry.name.bold(),
            util::format_relative_time(entry.touched_at).dimmed(),
            util::display_path(&entry.path).cyan(),
        ));
    }
    out
}
