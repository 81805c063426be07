//! Outbound message sender trait and implementations.
//!
//! The chat transport is an external collaborator; the dispatcher only
//! produces [`OutgoingMessage`]s and the embedding binary pushes them
//! through a `MessageSender`.

use async_trait::async_trait;
use bot_core::OutgoingMessage;

use crate::error::DispatchError;

/// Trait for delivering outbound messages.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DispatchError>;

    /// Deliver a batch in order, stopping at the first failure.
    async fn send_all(&self, messages: &[OutgoingMessage]) -> Result<(), DispatchError> {
        for message in messages {
            self.send(message).await?;
        }
        Ok(())
    }
}

/// A no-op sender for testing that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send(&self, _message: &OutgoingMessage) -> Result<(), DispatchError> {
        Ok(())
    }
}

/// A sender that logs every message, for debugging and the console
/// example.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DispatchError> {
        if let Some(ref url) = message.picture_url {
            tracing::info!("-> {} [picture: {}]", message.recipient, url);
        }
        if !message.body.is_empty() {
            tracing::info!("-> {}: {}", message.recipient, message.body);
        }
        if !message.keyboard.is_empty() {
            tracing::info!("   suggested: {}", message.keyboard.join(" | "));
        }
        Ok(())
    }
}
