//! Live viewer channel: subscriber set, capacity ceiling, refresh fan-out.
//!
//! One `LiveChannel` instance is created at boot and shared between the
//! router (which turns subscriptions into SSE streams) and the change
//! watcher (which triggers refreshes). Notifications are contentless "go
//! re-fetch" signals; nothing structured is ever pushed, and missed
//! signals are not replayed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Maximum number of concurrently connected viewers.
pub const MAX_SUBSCRIBERS: usize = 5;

/// Maximum lifetime of one subscription, regardless of activity. The
/// server closes the stream when it elapses; clients reconnect.
pub const MAX_SUBSCRIPTION_LIFETIME: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("too many connected clients (limit {MAX_SUBSCRIBERS})")]
    AtCapacity,
}

/// Fan-out hub for refresh notifications.
pub struct LiveChannel {
    subscribers: Mutex<HashMap<Uuid, mpsc::UnboundedSender<&'static str>>>,
}

impl LiveChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            subscribers: Mutex::new(HashMap::new()),
        })
    }

    /// Admit a new viewer, or reject it if the channel is at capacity.
    ///
    /// Capacity is checked only here, at admission time; rejection affects
    /// nothing but this one attempt.
    pub fn subscribe(self: &Arc<Self>) -> Result<Subscription, SubscribeError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        {
            let mut subscribers = self.subscribers.lock().expect("subscriber set poisoned");
            if subscribers.len() >= MAX_SUBSCRIBERS {
                return Err(SubscribeError::AtCapacity);
            }
            subscribers.insert(id, tx);
        }
        debug!("viewer {} subscribed ({} live)", id, self.subscriber_count());
        Ok(Subscription {
            id,
            rx,
            channel: Arc::clone(self),
        })
    }

    /// Deliver a `refresh` payload to every live subscriber, best effort.
    ///
    /// Delivery iterates over a snapshot of the set; a subscriber whose
    /// receiving side is gone is pruned on the spot without interrupting
    /// delivery to the rest.
    pub fn notify_refresh(&self) {
        let snapshot: Vec<(Uuid, mpsc::UnboundedSender<&'static str>)> = {
            let subscribers = self.subscribers.lock().expect("subscriber set poisoned");
            subscribers.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };
        for (id, tx) in snapshot {
            if tx.send("refresh").is_err() {
                debug!("pruning dead viewer {}", id);
                self.remove(id);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().expect("subscriber set poisoned").len()
    }

    fn remove(&self, id: Uuid) {
        self.subscribers.lock().expect("subscriber set poisoned").remove(&id);
    }
}

/// One viewer's membership in the channel. Dropping it (the transport
/// closed, or the lifetime expired and the stream ended) removes the
/// viewer from the set.
pub struct Subscription {
    id: Uuid,
    rx: mpsc::UnboundedReceiver<&'static str>,
    channel: Arc<LiveChannel>,
}

impl Subscription {
    /// Receive the next notification payload. `None` once the channel has
    /// pruned this subscriber.
    pub async fn recv(&mut self) -> Option<&'static str> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.channel.remove(self.id);
        debug!(
            "viewer {} unsubscribed ({} live)",
            self.id,
            self.channel.subscriber_count()
        );
    }
}
