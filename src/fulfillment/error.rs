//! Error types for order fulfillment.

use crate::bus::BusError;
use crate::fulfillment::FulfillmentState;
use thiserror::Error;

/// Why a fulfillment task ended without delivering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FulfillmentError {
    /// The scheduler stopped while the order was being prepared.
    #[error("Fulfillment cancelled before delivery")]
    Cancelled,

    /// `run` was called on a task that already finished. Nothing is published.
    #[error("Fulfillment already finished ({0:?})")]
    AlreadyFinished(FulfillmentState),

    /// The delivery could not be encoded.
    #[error("Delivery encoding error: {0}")]
    Encode(String),

    /// The bus refused the delivery. Not retried.
    #[error(transparent)]
    Publish(#[from] BusError),
}

/// Preparation delay bounds that do not form a valid interval.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("Invalid preparation delay bounds: min={min}s, max={max}s")]
pub struct InvalidDelayBounds {
    pub min: f64,
    pub max: f64,
}
