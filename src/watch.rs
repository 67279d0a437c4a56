//! File-change watching with a single shared debounce window.
//!
//! Watches a fixed set of source files (the roadmap and the activity log)
//! and, once a burst of modifications has gone quiet for the debounce
//! window, pushes exactly one refresh to the live channel. All watched
//! paths share one timer: near-simultaneous edits to different files
//! collapse into a single downstream notification.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::live::LiveChannel;

/// Quiet period after the last detected change before the refresh fires.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Holds the OS watcher for the lifetime of the server.
///
/// Dropping this stops the watches and ends the debounce loop.
pub struct ChangeWatcher {
    _watcher: RecommendedWatcher,
}

impl ChangeWatcher {
    /// Start watching `paths`, pushing debounced refreshes to `live`.
    ///
    /// Paths that do not exist at startup are skipped; there is no retry to
    /// pick them up later. A path that fails to watch is logged and skipped
    /// as well: a file becoming unwatchable stops contributing refreshes
    /// but never brings the coordinator down.
    pub fn spawn(paths: &[PathBuf], live: Arc<LiveChannel>) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        // notify delivers events on its own thread; forward them into the
        // async debounce loop through the channel.
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        let _ = tx.send(());
                    }
                }
                Err(err) => warn!("watcher error: {err}"),
            }
        })?;

        for path in paths {
            if !path.exists() {
                debug!("not watching {} (does not exist)", path.display());
                continue;
            }
            match watcher.watch(path, RecursiveMode::NonRecursive) {
                Ok(()) => debug!("watching {}", path.display()),
                Err(err) => warn!("failed to watch {}: {err}", path.display()),
            }
        }

        tokio::spawn(debounce_loop(rx, move || live.notify_refresh()));

        Ok(Self { _watcher: watcher })
    }
}

/// Coalesce bursts of change events into single notifications.
///
/// Waits for a first event, then keeps absorbing events until the channel
/// has been quiet for [`DEBOUNCE_WINDOW`], and only then invokes `notify`.
/// Ends when all senders are gone.
async fn debounce_loop(mut rx: mpsc::UnboundedReceiver<()>, notify: impl Fn()) {
    while rx.recv().await.is_some() {
        loop {
            match tokio::time::timeout(DEBOUNCE_WINDOW, rx.recv()).await {
                // Another event inside the window: the timer restarts.
                Ok(Some(())) => continue,
                // Senders gone mid-burst; deliver the pending notification.
                Ok(None) => {
                    notify();
                    return;
                }
                // Quiet period elapsed.
                Err(_) => {
                    notify();
                    break;
                }
            }
        }
    }
}
