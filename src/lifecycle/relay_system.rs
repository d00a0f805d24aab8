use crate::bridge::InboundBridge;
use crate::bus::Publisher;
use crate::config::{ConfigError, RelayConfig};
use crate::fulfillment::{DelaySource, FulfillmentContext};
use relay_runtime::{SchedulerHandle, TaskScheduler};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Scheduler loop failed: {0}")]
    SchedulerLoop(#[from] tokio::task::JoinError),
}

/// A running relay: the scheduler loop plus the bridge that feeds it.
///
/// Must be started from within a tokio runtime.
pub struct RelaySystem {
    /// The bus callback target. Clone it into the bus client's handler.
    pub bridge: InboundBridge,

    scheduler: SchedulerHandle,

    /// The scheduler loop, awaited on shutdown.
    handle: JoinHandle<()>,
}

impl RelaySystem {
    /// Starts the relay with the uniform delay configured in `config`.
    pub fn start(
        config: &RelayConfig,
        publisher: Arc<dyn Publisher>,
    ) -> Result<Self, LifecycleError> {
        config.validate()?;
        let delays = config
            .delay_source()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Self::start_with(config, publisher, Arc::new(delays))
    }

    /// Starts the relay with an explicit delay source.
    pub fn start_with(
        config: &RelayConfig,
        publisher: Arc<dyn Publisher>,
        delays: Arc<dyn DelaySource>,
    ) -> Result<Self, LifecycleError> {
        config.validate()?;

        let (scheduler, handle) = TaskScheduler::with_capacity(config.queue_capacity);
        let loop_handle = tokio::spawn(scheduler.run());

        let context = FulfillmentContext::new(delays, publisher, config.outbound_topic.as_str());
        let bridge = InboundBridge::new(handle.clone(), config.inbound_topic.as_str(), context);

        info!(
            inbound = %config.inbound_topic,
            outbound = %config.outbound_topic,
            capacity = ?config.queue_capacity,
            "Relay started"
        );

        Ok(Self {
            bridge,
            scheduler: handle,
            handle: loop_handle,
        })
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    /// Stops the scheduler and waits for its loop to exit.
    ///
    /// Bridge clones held elsewhere (for example by a bus thread) stay usable, but every
    /// message they dispatch from now on is rejected.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down relay...");

        self.scheduler.stop();
        drop(self.bridge);

        if let Err(e) = self.handle.await {
            error!(error = %e, "Scheduler loop failed");
            return Err(e.into());
        }

        info!("Relay shutdown complete.");
        Ok(())
    }
}
