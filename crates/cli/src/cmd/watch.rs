//! Live tracking until Ctrl-C

use crate::config::Config;
use crate::view::ShelfView;
use anyhow::{Context, Result};
use topshelf_core::SharedShelf;
use topshelf_watcher::{PeriodicScanner, ShelfWatcher};
use tracing::info;

pub async fn run(config: &Config) -> Result<()> {
    let shelf = SharedShelf::new(config.capacity);

    // The view must be attached before the producers start so no early
    // change goes unrendered
    let view = ShelfView::attach(shelf.clone());
    tokio::spawn(view.run());

    let _watcher = ShelfWatcher::start(&config.roots, shelf.clone())
        .context("Failed to start the filesystem watcher")?;

    // First tick is the startup scan
    let scanner = PeriodicScanner::new(
        config.roots.clone(),
        shelf.clone(),
        config.rescan_interval(),
    );
    tokio::spawn(scanner.run());

    info!(
        "Tracking {} roots, capacity {}",
        config.roots.len(),
        config.capacity
    );
    println!("Tracking documents; press Ctrl-C to stop.");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    println!("\nStopped.");
    Ok(())
}
