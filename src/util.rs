//! Shared utility functions used across the codebase.

use std::path::PathBuf;

/// Return the value of `$HOME`, falling back to `/root`.
pub fn home_dir() -> String {
    std::env::var("HOME").unwrap_or_else(|_| "/root".to_string())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        let mut home = PathBuf::from(home_dir());
        if !rest.is_empty() {
            home.push(rest);
        }
        return home;
    }
    PathBuf::from(path)
}
