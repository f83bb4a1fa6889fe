//! Show the configured roots and their policies

use crate::config::Config;
use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(config: &Config) -> Result<()> {
    println!("{}", "Watched roots".bold());
    for root in &config.roots {
        let policy = if root.use_access_time {
            "access time"
        } else {
            "modification time"
        };
        let state = if root.path.is_dir() {
            "ok".green().to_string()
        } else {
            "missing".yellow().to_string()
        };
        println!(
            "  {}  ranked by {}  [{}]",
            util::display_path(&root.path).cyan(),
            policy,
            state
        );
    }
    println!();
    println!(
        "Capacity: {}  Re-scan every {} seconds",
        config.capacity, config.rescan_interval_secs
    );
    Ok(())
}
