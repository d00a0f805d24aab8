//! # Inbound Bridge
//!
//! The callback a bus client invokes on its own I/O thread for every inbound message.
//! It does the minimum on that thread (topic check, UTF-8 check, one queue push) and
//! leaves the rest to a job on the scheduler:
//!
//! ```text
//! bus I/O thread                      scheduler
//! --------------                      ---------
//! on_message(topic, payload)
//!   topic != inbound   -> ignore
//!   not UTF-8          -> log, drop
//!   submit(job) ------------------->  process_order(payload)
//!   return                              validate -> Rejected (logged)
//!                                       FulfillmentTask::run -> Delivered / Cancelled / Failed
//! ```
//!
//! The scheduler handle is injected at construction. Nothing here touches global state.

pub mod error;

pub use error::*;

use crate::fulfillment::{FulfillmentContext, FulfillmentState, FulfillmentTask};
use crate::validation::validate;
use relay_runtime::{SchedulerHandle, TaskContext, TaskHandle};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

#[derive(Clone)]
pub struct InboundBridge {
    scheduler: SchedulerHandle,
    inbound_topic: Arc<str>,
    context: Arc<FulfillmentContext>,
}

impl InboundBridge {
    pub fn new(
        scheduler: SchedulerHandle,
        inbound_topic: impl Into<Arc<str>>,
        context: FulfillmentContext,
    ) -> Self {
        Self {
            scheduler,
            inbound_topic: inbound_topic.into(),
            context: Arc::new(context),
        }
    }

    pub fn inbound_topic(&self) -> &str {
        &self.inbound_topic
    }

    /// Bus callback. Never blocks and never panics; every failure is logged and the
    /// message dropped.
    pub fn on_message(&self, topic: &str, payload: &[u8]) {
        match self.dispatch(topic, payload) {
            Ok(_) => {}
            Err(BridgeError::DecodeError(e)) => {
                error!(topic, error = %e, payload = ?payload, "Failed to decode message payload");
            }
            Err(BridgeError::Scheduler(e)) => {
                warn!(topic, error = %e, "Failed to schedule order handling");
            }
        }
    }

    /// Like [`on_message`](Self::on_message), but reports the outcome.
    ///
    /// Returns `Ok(None)` for messages on other topics and `Ok(Some(handle))` once the job
    /// is queued.
    pub fn dispatch(&self, topic: &str, payload: &[u8]) -> Result<Option<TaskHandle>, BridgeError> {
        if topic != &*self.inbound_topic {
            debug!(topic, "Ignoring message on unrecognized topic");
            return Ok(None);
        }
        let text = std::str::from_utf8(payload)?;
        info!(topic, payload = text, "Received");

        let payload = payload.to_vec();
        let context = Arc::clone(&self.context);
        let handle = self
            .scheduler
            .submit(move |task| async move {
                process_order(payload, task, context).await;
            })?;
        Ok(Some(handle))
    }
}

/// The scheduled half of the bridge: validate, then fulfill.
///
/// Returns the terminal state of the order. Rejections and delivery failures end here;
/// they are logged and never propagate to other tasks.
#[instrument(name = "order", skip_all, fields(task_id = %task.id()))]
pub async fn process_order(
    payload: Vec<u8>,
    task: TaskContext,
    context: Arc<FulfillmentContext>,
) -> FulfillmentState {
    let order = match validate(&payload) {
        Ok(order) => order,
        Err(reason) => {
            warn!(
                %reason,
                payload = %String::from_utf8_lossy(&payload),
                "Invalid order received"
            );
            return FulfillmentState::Rejected;
        }
    };
    info!(food = order.food(), table = order.table(), "Order received");

    let mut fulfillment = FulfillmentTask::new(order);
    match fulfillment.run(&task, &context).await {
        Ok(delivery) => debug!(prep_time = ?delivery.prep_time, "Order complete"),
        Err(e) => debug!(error = %e, "Order ended without delivery"),
    }
    fulfillment.state()
}
