//! # Mock Bus
//!
//! Utilities for testing the relay without a transport.
//!
//! [`RecordingPublisher`] keeps every publish in memory, stamped with the (pausable)
//! tokio clock, so tests can assert what was sent, where, and when.
//!
//! ```ignore
//! let publisher = RecordingPublisher::new();
//! let system = RelaySystem::start_with(&config, Arc::new(publisher.clone()), delays);
//! // ... drive the system ...
//! assert_eq!(publisher.payloads_on("FOOD"), vec![r#"{"food": "pizza", "table": 5}"#]);
//! ```

use crate::bus::{BusError, Publisher};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// One recorded publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub payload: Vec<u8>,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct Recorded {
    published: Vec<Published>,
    failing: bool,
    attempts: usize,
}

/// An in-memory [`Publisher`] that records instead of sending.
///
/// Clones share the same record, so keep one clone in the test and hand the other to
/// the system under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher whose every publish fails with [`BusError::PublishFailure`].
    pub fn failing() -> Self {
        let publisher = Self::new();
        publisher.set_failing(true);
        publisher
    }

    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    pub fn published(&self) -> Vec<Published> {
        self.lock().published.clone()
    }

    /// Payloads sent to `topic`, decoded as UTF-8, in publish order.
    pub fn payloads_on(&self, topic: &str) -> Vec<String> {
        self.lock()
            .published
            .iter()
            .filter(|p| p.topic == topic)
            .map(|p| String::from_utf8_lossy(&p.payload).into_owned())
            .collect()
    }

    /// Publishes attempted, including failed ones.
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        // A test that panicked while holding the lock already failed; keep the record readable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        let mut recorded = self.lock();
        recorded.attempts += 1;
        if recorded.failing {
            return Err(BusError::PublishFailure {
                topic: topic.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        recorded.published.push(Published {
            topic: topic.to_string(),
            payload,
            at: Instant::now(),
        });
        Ok(())
    }
}
