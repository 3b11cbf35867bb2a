use crate::models::SessionKind;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc::Sender, Mutex};

/// A chat message as delivered to live channel subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct ChatEvent {
    pub message_id: String,
    pub channel_id: String,
    pub author_name: String,
    pub author_kind: SessionKind,
    pub body: String,
    pub created_at: String,
}

impl From<&crate::models::Message> for ChatEvent {
    fn from(message: &crate::models::Message) -> Self {
        Self {
            message_id: message.id.clone(),
            channel_id: message.channel_id.clone(),
            author_name: message.author_name.clone(),
            author_kind: message.author_kind,
            body: message.body.clone(),
            created_at: message.created_at.clone(),
        }
    }
}

/// Trait for managing live chat subscriptions and fanning messages out to
/// them. One subscriber is one open stream.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// Register a subscriber on a channel.
    async fn subscribe(&self, channel_id: &str, subscriber_id: &str, sender: Sender<ChatEvent>);

    /// Drop a subscriber from a channel.
    async fn unsubscribe(&self, channel_id: &str, subscriber_id: &str);

    /// Deliver an event to every live subscriber of a channel. Returns the
    /// number of subscribers reached; dead subscribers are pruned.
    async fn broadcast(&self, channel_id: &str, event: ChatEvent) -> usize;

    /// Number of live subscribers on a channel.
    async fn subscriber_count(&self, channel_id: &str) -> usize;
}

/// In-memory implementation backed by a nested HashMap.
pub struct InMemoryConnectionManager {
    channels: Arc<Mutex<HashMap<String, HashMap<String, Sender<ChatEvent>>>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn subscribe(&self, channel_id: &str, subscriber_id: &str, sender: Sender<ChatEvent>) {
        let mut channels = self.channels.lock().await;
        channels
            .entry(channel_id.to_string())
            .or_default()
            .insert(subscriber_id.to_string(), sender);
    }

    async fn unsubscribe(&self, channel_id: &str, subscriber_id: &str) {
        let mut channels = self.channels.lock().await;
        if let Some(subscribers) = channels.get_mut(channel_id) {
            subscribers.remove(subscriber_id);
            if subscribers.is_empty() {
                channels.remove(channel_id);
            }
        }
    }

    async fn broadcast(&self, channel_id: &str, event: ChatEvent) -> usize {
        let mut channels = self.channels.lock().await;
        let Some(subscribers) = channels.get_mut(channel_id) else {
            return 0;
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (subscriber_id, sender) in subscribers.iter() {
            if sender.send(event.clone()).await.is_ok() {
                delivered += 1;
            } else {
                dead.push(subscriber_id.clone());
            }
        }

        for subscriber_id in dead {
            subscribers.remove(&subscriber_id);
        }
        if subscribers.is_empty() {
            channels.remove(channel_id);
        }

        delivered
    }

    async fn subscriber_count(&self, channel_id: &str) -> usize {
        let channels = self.channels.lock().await;
        channels.get(channel_id).map_or(0, |s| s.len())
    }
}

/// Mock implementation for tests: records broadcasts instead of delivering.
pub struct MockConnectionManager {
    broadcasts: Arc<Mutex<Vec<(String, ChatEvent)>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            broadcasts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn recorded_broadcasts(&self) -> Vec<(String, ChatEvent)> {
        self.broadcasts.lock().await.clone()
    }
}

impl Default for MockConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn subscribe(&self, _channel_id: &str, _subscriber_id: &str, _sender: Sender<ChatEvent>) {}

    async fn unsubscribe(&self, _channel_id: &str, _subscriber_id: &str) {}

    async fn broadcast(&self, channel_id: &str, event: ChatEvent) -> usize {
        let mut broadcasts = self.broadcasts.lock().await;
        broadcasts.push((channel_id.to_string(), event));
        1
    }

    async fn subscriber_count(&self, _channel_id: &str) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn event(channel_id: &str) -> ChatEvent {
        ChatEvent {
            message_id: "msg-1".to_string(),
            channel_id: channel_id.to_string(),
            author_name: "Ana".to_string(),
            author_kind: SessionKind::Operator,
            body: "bom dia".to_string(),
            created_at: "2026-02-02T12:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn subscribe_and_count() {
        let manager = InMemoryConnectionManager::new();
        let (tx, _rx) = mpsc::channel(10);

        manager.subscribe("geral", "sub-1", tx).await;
        assert_eq!(manager.subscriber_count("geral").await, 1);
        assert_eq!(manager.subscriber_count("suporte").await, 0);
    }

    #[tokio::test]
    async fn unsubscribe_removes_subscriber() {
        let manager = InMemoryConnectionManager::new();
        let (tx, _rx) = mpsc::channel(10);

        manager.subscribe("geral", "sub-1", tx).await;
        manager.unsubscribe("geral", "sub-1").await;
        assert_eq!(manager.subscriber_count("geral").await, 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_channel_subscribers_only() {
        let manager = InMemoryConnectionManager::new();
        let (tx1, mut rx1) = mpsc::channel(10);
        let (tx2, mut rx2) = mpsc::channel(10);

        manager.subscribe("geral", "sub-1", tx1).await;
        manager.subscribe("suporte", "sub-2", tx2).await;

        let delivered = manager.broadcast("geral", event("geral")).await;
        assert_eq!(delivered, 1);

        let received = rx1.recv().await.unwrap();
        assert_eq!(received.channel_id, "geral");
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_prunes_dead_subscribers() {
        let manager = InMemoryConnectionManager::new();
        let (tx, rx) = mpsc::channel(10);

        manager.subscribe("geral", "sub-1", tx).await;
        drop(rx);

        let delivered = manager.broadcast("geral", event("geral")).await;
        assert_eq!(delivered, 0);
        assert_eq!(manager.subscriber_count("geral").await, 0);
    }

    #[tokio::test]
    async fn mock_records_broadcasts() {
        let manager = MockConnectionManager::new();

        manager.broadcast("geral", event("geral")).await;
        manager.broadcast("suporte", event("suporte")).await;

        let recorded = manager.recorded_broadcasts().await;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].0, "geral");
        assert_eq!(recorded[1].1.channel_id, "suporte");
    }
}
