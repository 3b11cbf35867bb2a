use crate::models::SessionKind;
use tokio::sync::broadcast;

/// System events published by the console for audit and live consumers.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    UserLoggedIn {
        user_id: String,
        timestamp: String, // ISO 8601
    },
    UserLoggedOut {
        user_id: String,
        timestamp: String, // ISO 8601
    },
    MessagePosted {
        message_id: String,
        channel_id: String,
        author_kind: SessionKind,
        timestamp: String, // ISO 8601
    },
    TabulationRecorded {
        tabulation_id: String,
        operator_id: String,
        product: String,
        promise_date: String, // YYYY-MM-DD
        timestamp: String,    // ISO 8601
    },
}

/// Event bus for publishing and subscribing to system events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SystemEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all subscribers (non-blocking, fire-and-forget).
    pub fn publish(&self, event: SystemEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("Event dropped (no subscribers): {}", e);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SystemEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}
