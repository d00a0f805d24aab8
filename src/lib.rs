//! # Order Relay
//!
//! > **Bridges a kitchen's order topic to its delivery topic.**
//!
//! Customers publish orders such as `{"food": "pizza", "table": 5}` to the `ORDER` topic.
//! The relay validates each one, "prepares" it for a random 3 to 10 seconds, then publishes
//! the same order to the `FOOD` topic to announce delivery. Orders are handled
//! concurrently and independently: a slow dish never holds up a fast one, and a bad
//! payload never affects its neighbours.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Entry Point ([`bridge`])
//! The bus delivers messages on its own I/O thread. [`InboundBridge`](bridge::InboundBridge)
//! is the callback: it filters by topic and hands the payload to the scheduler without
//! blocking.
//!
//! ### 2. The Engine ([`relay_runtime`])
//! A cooperative scheduler that owns every in-flight order, accepts submissions from any
//! thread, and cancels everything on stop.
//!
//! ### 3. The Domain ([`validation`], [`fulfillment`], [`model`])
//! - [`validate`](validation::validate) turns bytes into an [`Order`](model::Order) or a
//!   [`RejectReason`](validation::RejectReason).
//! - [`FulfillmentTask`](fulfillment::FulfillmentTask) waits out the preparation delay and
//!   publishes the delivery.
//!
//! ### 4. The Edges ([`bus`], [`config`], [`lifecycle`])
//! - [`Publisher`](bus::Publisher) / [`MessageBus`](bus::MessageBus) are the transport seam;
//!   [`LineBus`](bus::LineBus) speaks `<topic> <payload>` lines over stdio.
//! - [`RelayConfig`](config::RelayConfig) holds topics, delay bounds and broker settings.
//! - [`RelaySystem`](lifecycle::RelaySystem) starts and stops the whole thing.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Feed orders on stdin, read deliveries on stdout
//! echo 'ORDER {"food": "pizza", "table": 5}' | RUST_LOG=info cargo run
//! ```
//!
//! ## 🧪 Testing
//!
//! See [`bus::mock`] for a recording publisher. Tests run on tokio's paused clock, so
//! ten-second preparations finish instantly and deterministically.

pub mod bridge;
pub mod bus;
pub mod config;
pub mod fulfillment;
pub mod lifecycle;
pub mod model;
pub mod validation;
