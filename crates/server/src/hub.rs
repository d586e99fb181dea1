use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use shared::protocol::Event;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

#[derive(Debug, Default)]
struct SubscriberSet {
    next_id: u64,
    handles: BTreeMap<SubscriberId, UnboundedSender<Arc<str>>>,
}

/// Fan-out point for semantic events.
///
/// Each subscriber owns an unbounded queue drained by its connection task,
/// so a sweep never blocks on a slow peer; a handle whose queue is gone is
/// dropped after the sweep, never retried. Every event queued by one
/// `publish` reaches exactly the handles present when the sweep began.
#[derive(Debug, Default)]
pub struct Hub {
    subscribers: Mutex<SubscriberSet>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> (SubscriberId, UnboundedReceiver<Arc<str>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut set = self.subscribers.lock().expect("hub lock poisoned");
        let id = SubscriberId(set.next_id);
        set.next_id += 1;
        set.handles.insert(id, tx);
        (id, rx)
    }

    /// Removing an already-absent handle is a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers
            .lock()
            .expect("hub lock poisoned")
            .handles
            .remove(&id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .expect("hub lock poisoned")
            .handles
            .len()
    }

    /// Serialize once, then queue the line to every current subscriber.
    /// Handles that fail are collected during the sweep and removed after it.
    pub fn publish(&self, event: &Event) {
        let line: Arc<str> = match serde_json::to_string(event) {
            Ok(mut json) => {
                json.push('\n');
                Arc::from(json)
            }
            Err(error) => {
                warn!(%error, "failed to serialize event, nothing sent");
                return;
            }
        };

        let mut set = self.subscribers.lock().expect("hub lock poisoned");
        let mut dead = Vec::new();
        for (id, handle) in &set.handles {
            if handle.send(Arc::clone(&line)).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            set.handles.remove(&id);
            warn!(subscriber = id.0, "dropping unreachable subscriber");
        }
    }
}

#[cfg(test)]
#[path = "tests/hub_tests.rs"]
mod tests;
