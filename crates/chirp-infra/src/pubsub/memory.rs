//! In-memory notification publisher.
//!
//! This is a fallback when Redis is not available.
//! Works within a single process only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use chirp_core::ports::{PublishError, Publisher};

/// In-memory publisher backed by tokio broadcast channels.
pub struct InMemoryPublisher {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<String>>>>,
    buffer_size: usize,
}

impl InMemoryPublisher {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            buffer_size,
        }
    }

    /// Open a receiver on a channel. Intended for tests and in-process
    /// consumers; messages published without any receiver are dropped.
    pub async fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        let mut channels = self.channels.write().await;
        channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }
}

impl Default for InMemoryPublisher {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl Publisher for InMemoryPublisher {
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), PublishError> {
        let channels = self.channels.read().await;

        if let Some(sender) = channels.get(channel) {
            // Ignore send errors (no subscribers)
            let _ = sender.send(payload.to_string());
            tracing::debug!(channel = %channel, "Message published");
        } else {
            tracing::debug!(channel = %channel, "No subscribers for channel");
        }

        Ok(())
    }
}
