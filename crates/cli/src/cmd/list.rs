//! One-shot scan and print

use crate::config::Config;
use crate::view;
use anyhow::{Context, Result};
use topshelf_core::SharedShelf;
use topshelf_watcher::scan_into;

pub async fn run(config: &Config, json: bool) -> Result<()> {
    let shelf = SharedShelf::new(config.capacity);

    let roots = config.roots.clone();
    let scan_shelf = shelf.clone();
    tokio::task::spawn_blocking(move || scan_into(&roots, &scan_shelf))
        .await
        .context("Scan pass failed")?;

    let entries = shelf.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", view::render(&entries));
    }
    Ok(())
}
