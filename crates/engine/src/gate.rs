use tokio::sync::watch;

/// Shared switch between the interaction engine (which toggles gesture
/// detection) and the time-adjustment controller (which obeys it). Readers
/// may observe a value up to one polling interval stale; the watch channel
/// additionally wakes the controller on every change.
#[derive(Debug, Clone)]
pub struct GestureGate {
    state: watch::Sender<bool>,
}

impl GestureGate {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self { state }
    }

    pub fn enable(&self) {
        self.state.send_replace(true);
    }

    pub fn disable(&self) {
        self.state.send_replace(false);
    }

    pub fn is_enabled(&self) -> bool {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

impl Default for GestureGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disabled_and_toggles() {
        let gate = GestureGate::new();
        assert!(!gate.is_enabled());

        gate.enable();
        assert!(gate.is_enabled());

        gate.disable();
        assert!(!gate.is_enabled());
    }

    #[tokio::test]
    async fn subscribers_are_notified_of_changes() {
        let gate = GestureGate::new();
        let mut watcher = gate.subscribe();

        gate.enable();
        watcher.changed().await.expect("gate change");
        assert!(*watcher.borrow());
    }
}
