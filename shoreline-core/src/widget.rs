use std::sync::Arc;

use tokio::sync::watch;

use crate::model::WidgetState;

/// The single cell the weather widget renders into.
///
/// Clones share the same cell. Every write replaces the whole state and wakes
/// subscribers; whichever write lands last is what stays on screen.
#[derive(Debug, Clone)]
pub struct WidgetContainer {
    tx: Arc<watch::Sender<WidgetState>>,
}

impl Default for WidgetContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetContainer {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(WidgetState::Loading);
        Self { tx: Arc::new(tx) }
    }

    pub fn set(&self, state: WidgetState) {
        self.tx.send_replace(state);
    }

    pub fn current(&self) -> WidgetState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.tx.subscribe()
    }
}
