//! Notification port - best-effort publish of raw create requests.

use async_trait::async_trait;

/// Fire-and-forget notification channel.
///
/// The create path publishes through this port without awaiting the result
/// on its own future; delivery ordering and durability are the channel's
/// responsibility, and a failed publish must never fail the create.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a payload to a named channel.
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), PublishError>;
}

/// Publisher errors.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to publish: {0}")]
    Publish(String),

    #[error("Connection error: {0}")]
    Connection(String),
}
