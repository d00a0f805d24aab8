//! # Message Bus Seam
//!
//! The relay never talks to a broker directly. It sees the bus through two narrow traits:
//!
//! - [`Publisher`]: fire a payload at a topic. This is all a fulfillment task needs.
//! - [`MessageBus`]: a publisher that can also subscribe. This is what `main` wires up.
//!
//! Inbound messages travel the other way, through a plain callback
//! (`Fn(&str, &[u8])`) that the bus invokes on its own I/O thread; see
//! [`InboundBridge::on_message`](crate::bridge::InboundBridge::on_message).
//!
//! Implementations here:
//!
//! - [`LineBus`]: a stdin/stdout transport for running the relay by hand.
//! - [`mock::RecordingPublisher`]: an in-memory publisher for tests.

pub mod error;
pub mod line_bus;
pub mod mock;

pub use error::*;
pub use line_bus::LineBus;

use async_trait::async_trait;

/// Default inbound channel.
pub const ORDER_TOPIC: &str = "ORDER";
/// Default outbound channel.
pub const FOOD_TOPIC: &str = "FOOD";

/// Outbound half of the bus.
///
/// Implementations must not block the calling task for longer than it takes to hand the
/// payload to their transport.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError>;
}

/// A full bus client: publish plus subscription management.
#[async_trait]
pub trait MessageBus: Publisher {
    async fn subscribe(&self, topic: &str) -> Result<(), BusError>;
}
