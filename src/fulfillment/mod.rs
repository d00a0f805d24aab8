//! # Order Fulfillment
//!
//! A [`FulfillmentTask`] carries one validated [`Order`] from acceptance to delivery:
//!
//! 1. sample a preparation delay from the [`DelaySource`],
//! 2. suspend on the scheduler's timer for that long ([`TaskContext::sleep`]),
//! 3. publish the delivery notification to the outbound topic.
//!
//! The task is owned by exactly one scheduled job and is never shared. Its
//! [`FulfillmentState`] only moves forward:
//!
//! ```text
//! Pending -> Preparing -> Delivered
//!                      -> Cancelled   (scheduler stopped during preparation)
//!                      -> Failed      (publish refused; not retried)
//! ```
//!
//! `Rejected` is never reached by a task: payloads that fail validation never become one.
//! The state exists so callers can report all outcomes in one vocabulary.

pub mod delay;
pub mod error;

pub use delay::*;
pub use error::*;

use crate::bus::Publisher;
use crate::model::Order;
use relay_runtime::TaskContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

/// Lifecycle of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentState {
    Pending,
    Preparing,
    Delivered,
    Rejected,
    Cancelled,
    Failed,
}

impl FulfillmentState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Preparing)
    }
}

/// The dependencies every fulfillment needs, injected once at startup.
#[derive(Clone)]
pub struct FulfillmentContext {
    pub delays: Arc<dyn DelaySource>,
    pub publisher: Arc<dyn Publisher>,
    pub outbound_topic: Arc<str>,
}

impl FulfillmentContext {
    pub fn new(
        delays: Arc<dyn DelaySource>,
        publisher: Arc<dyn Publisher>,
        outbound_topic: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            delays,
            publisher,
            outbound_topic: outbound_topic.into(),
        }
    }
}

/// A successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub order: Order,
    pub prep_time: Duration,
    /// From task creation to the publish returning.
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct FulfillmentTask {
    order: Order,
    submitted_at: Instant,
    state: FulfillmentState,
}

impl FulfillmentTask {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            submitted_at: Instant::now(),
            state: FulfillmentState::Pending,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn state(&self) -> FulfillmentState {
        self.state
    }

    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    /// Prepares and delivers the order.
    ///
    /// Runs at most once: on a task that has already left `Pending` it returns
    /// [`FulfillmentError::AlreadyFinished`] without sampling a delay or publishing.
    ///
    /// The task only suspends in `task.sleep`; if the scheduler stops there, nothing is
    /// published and the task ends `Cancelled`. A publish that has started is not
    /// interrupted.
    #[instrument(
        name = "fulfillment",
        skip_all,
        fields(food = %self.order.food(), table = self.order.table())
    )]
    pub async fn run(
        &mut self,
        task: &TaskContext,
        cx: &FulfillmentContext,
    ) -> Result<Delivery, FulfillmentError> {
        if self.state != FulfillmentState::Pending {
            warn!(state = ?self.state, "Fulfillment already ran, not repeating");
            return Err(FulfillmentError::AlreadyFinished(self.state));
        }

        let prep_time = cx.delays.next_delay(&self.order);
        self.state = FulfillmentState::Preparing;
        let delay_secs = (prep_time.as_secs_f64() * 10.0).round() / 10.0;
        info!(delay_secs, "Preparing order");

        if task.sleep(prep_time).await.is_err() {
            self.state = FulfillmentState::Cancelled;
            info!("Preparation cancelled, not delivering");
            return Err(FulfillmentError::Cancelled);
        }

        let payload = match self.order.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.state = FulfillmentState::Failed;
                error!(error = %e, "Could not encode delivery");
                return Err(FulfillmentError::Encode(e.to_string()));
            }
        };

        if let Err(e) = cx.publisher.publish(&cx.outbound_topic, payload).await {
            self.state = FulfillmentState::Failed;
            error!(error = %e, topic = %cx.outbound_topic, "Delivery failed");
            return Err(e.into());
        }

        self.state = FulfillmentState::Delivered;
        let elapsed = self.submitted_at.elapsed();
        info!(topic = %cx.outbound_topic, ?elapsed, "Delivered");
        Ok(Delivery {
            order: self.order.clone(),
            prep_time,
            elapsed,
        })
    }
}
