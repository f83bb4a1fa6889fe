//! Shared formatting helpers for CLI output

use std::path::Path;
use std::time::SystemTime;

/// Format a timestamp as relative time ("2 hours ago")
pub fn format_relative_time(at: SystemTime) -> String {
    if let Ok(elapsed) = SystemTime::now().duration_since(at) {
        let seconds = elapsed.as_secs();

        if seconds < 60 {
            format!("{} seconds ago", seconds)
        } else if seconds < 3600 {
            format!("{} minutes ago", seconds / 60)
        } else if seconds < 86400 {
            format!("{} hours ago", seconds / 3600)
        } else if seconds < 604800 {
            format!("{} days ago", seconds / 86400)
        } else {
            format!("{} weeks ago", seconds / 604800)
        }
    } else {
        "in the future".to_string()
    }
}

/// Render a path with the home directory abbreviated to `~`
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
