use std::collections::HashMap;
use std::sync::Mutex;

use shared::domain::{SessionId, TrackedObject};

/// Latest known state of every marker currently on the table, keyed by
/// session id. Scans work on a [`snapshot`](Registry::snapshot) copy, so the
/// registry lock is never held while the caller touches anything else.
#[derive(Debug, Default)]
pub struct Registry {
    objects: Mutex<HashMap<SessionId, TrackedObject>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, object: TrackedObject) {
        self.objects
            .lock()
            .expect("registry lock poisoned")
            .insert(object.session, object);
    }

    /// Removing an unknown session is a no-op.
    pub fn remove(&self, session: SessionId) -> bool {
        self.objects
            .lock()
            .expect("registry lock poisoned")
            .remove(&session)
            .is_some()
    }

    pub fn snapshot(&self) -> Vec<TrackedObject> {
        self.objects
            .lock()
            .expect("registry lock poisoned")
            .values()
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::SymbolId;

    fn object(session: i64, x: f64) -> TrackedObject {
        TrackedObject {
            symbol: SymbolId(0),
            session: SessionId(session),
            x,
            y: 0.5,
            angle: 0.0,
        }
    }

    #[test]
    fn upsert_keeps_only_the_latest_pose_per_session() {
        let registry = Registry::new();
        registry.upsert(object(1, 0.1));
        registry.upsert(object(1, 0.9));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].x, 0.9);
    }

    #[test]
    fn removed_sessions_never_reappear_in_snapshots() {
        let registry = Registry::new();
        registry.upsert(object(1, 0.1));
        registry.upsert(object(2, 0.2));

        assert!(registry.remove(SessionId(1)));
        assert!(registry
            .snapshot()
            .iter()
            .all(|o| o.session != SessionId(1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removing_an_unknown_session_is_a_no_op() {
        let registry = Registry::new();
        registry.upsert(object(1, 0.1));

        assert!(!registry.remove(SessionId(42)));
        assert_eq!(registry.len(), 1);
    }
}
