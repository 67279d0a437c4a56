//! Activity feed tailer.
//!
//! The activity log is a JSONL file appended to by other tooling; the
//! dashboard only ever projects the most recent entries. Lines that are
//! blank or fail to parse are dropped silently, and a missing or unreadable
//! file is simply an empty feed.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

/// How many recent events the feed shows.
const TAIL_LEN: usize = 20;

/// One activity log entry. Writers are loose about types, so the fields
/// stay as raw JSON values and are stringified at render time; anything
/// missing defaults to null and renders as empty text.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityEvent {
    #[serde(default)]
    pub timestamp: Value,
    #[serde(default)]
    pub event: Value,
    #[serde(default)]
    pub detail: Value,
}

/// Read the last [`TAIL_LEN`] parseable events from the log, oldest first.
pub fn tail_activity(path: &Path) -> Vec<ActivityEvent> {
    if !path.exists() {
        return Vec::new();
    }
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("failed to read activity log {}: {}", path.display(), err);
            return Vec::new();
        }
    };
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(TAIL_LEN);
    lines[start..]
        .iter()
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect()
}
