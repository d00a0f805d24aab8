//! # System Lifecycle
//!
//! Wires the relay together and tears it down again.
//!
//! ## Startup
//!
//! [`RelaySystem::start`] builds everything from a [`RelayConfig`](crate::config::RelayConfig)
//! and a [`Publisher`](crate::bus::Publisher):
//!
//! 1. **Scheduler** - create the [`TaskScheduler`](relay_runtime::TaskScheduler) and spawn its
//!    loop on the current runtime
//! 2. **Fulfillment context** - delay source, publisher and outbound topic, shared by every order
//! 3. **Bridge** - the [`InboundBridge`](crate::bridge::InboundBridge) the bus callback calls
//!
//! The bus itself is not owned here. The caller subscribes it and points its callback at
//! `system.bridge`:
//!
//! ```rust,ignore
//! let bus = Arc::new(LineBus::stdout());
//! bus.subscribe(&config.inbound_topic).await?;
//! let system = RelaySystem::start(&config, bus.clone())?;
//!
//! let bridge = system.bridge.clone();
//! bus.spawn_reader(input, move |topic, payload| bridge.on_message(topic, payload))?;
//! ```
//!
//! ## Shutdown
//!
//! [`RelaySystem::shutdown`] stops the scheduler, which cancels orders still being prepared
//! and rejects anything the bus delivers afterwards, then waits for the loop to exit.
//! Orders cancelled this way are never published.

pub mod relay_system;

pub use relay_system::*;
