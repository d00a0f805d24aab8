//! Error types for the message-bus seam.

use thiserror::Error;

/// Errors reported by a [`Publisher`](crate::bus::Publisher) or
/// [`MessageBus`](crate::bus::MessageBus).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusError {
    /// The message could not be handed to the bus.
    #[error("Publish to {topic} failed: {reason}")]
    PublishFailure { topic: String, reason: String },

    #[error("Subscribe to {topic} failed: {reason}")]
    SubscribeFailure { topic: String, reason: String },

    #[error("Bus disconnected")]
    Disconnected,
}
