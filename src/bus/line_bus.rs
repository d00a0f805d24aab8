//! # Line Bus
//!
//! A line-oriented stand-in for a broker connection. Each input line is one message,
//! `<topic> <payload>`, and each publish writes one line in the same format:
//!
//! ```text
//! ORDER {"food": "pizza", "table": 5}
//! FOOD {"food": "pizza", "table": 5}
//! ```
//!
//! Like a real bus client, the reader runs on its own OS thread and delivers messages
//! through a callback. The relay core gets no say in how that thread is scheduled.

use crate::bus::{BusError, MessageBus, Publisher};
use async_trait::async_trait;
use std::collections::HashSet;
use std::io::{self, BufRead};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub struct LineBus<W = tokio::io::Stdout> {
    subscriptions: Arc<RwLock<HashSet<String>>>,
    output: Mutex<W>,
}

impl LineBus<tokio::io::Stdout> {
    /// A bus that publishes to stdout.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> LineBus<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(output: W) -> Self {
        Self {
            subscriptions: Arc::new(RwLock::new(HashSet::new())),
            output: Mutex::new(output),
        }
    }

    /// Starts the I/O thread. `handler` is called once per message on a subscribed topic.
    ///
    /// The thread exits at end of input or on a read error.
    pub fn spawn_reader<R, H>(&self, input: R, handler: H) -> io::Result<JoinHandle<()>>
    where
        R: BufRead + Send + 'static,
        H: Fn(&str, &[u8]) + Send + 'static,
    {
        let subscriptions = Arc::clone(&self.subscriptions);
        std::thread::Builder::new()
            .name("line-bus-io".to_string())
            .spawn(move || read_messages(input, &subscriptions, handler))
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

fn read_messages<R, H>(mut input: R, subscriptions: &RwLock<HashSet<String>>, handler: H)
where
    R: BufRead,
    H: Fn(&str, &[u8]),
{
    info!("Bus reader started");
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Bus read failed");
                break;
            }
        }

        let line = buf.trim_ascii_end();
        if line.is_empty() {
            continue;
        }
        let Some(split) = line.iter().position(|b| *b == b' ') else {
            warn!(line = %String::from_utf8_lossy(line), "Expected `<topic> <payload>`");
            continue;
        };
        let topic = String::from_utf8_lossy(&line[..split]);
        let payload = &line[split + 1..];

        let subscribed = subscriptions
            .read()
            .map(|topics| topics.contains(topic.as_ref()))
            .unwrap_or(false);
        if !subscribed {
            debug!(%topic, "No subscription, dropped");
            continue;
        }
        handler(&topic, payload);
    }
    info!("Bus input closed");
}

#[async_trait]
impl<W> Publisher for LineBus<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BusError> {
        let mut line = Vec::with_capacity(topic.len() + payload.len() + 2);
        line.extend_from_slice(topic.as_bytes());
        line.push(b' ');
        line.extend_from_slice(&payload);
        line.push(b'\n');

        let mut output = self.output.lock().await;
        let written = async {
            output.write_all(&line).await?;
            output.flush().await
        }
        .await;
        written.map_err(|e| BusError::PublishFailure {
            topic: topic.to_string(),
            reason: e.to_string(),
        })?;

        debug!(topic, bytes = payload.len(), "Published");
        Ok(())
    }
}

#[async_trait]
impl<W> MessageBus for LineBus<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn subscribe(&self, topic: &str) -> Result<(), BusError> {
        let mut topics = self
            .subscriptions
            .write()
            .map_err(|e| BusError::SubscribeFailure {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;
        topics.insert(topic.to_string());
        info!(topic, "Subscribed");
        Ok(())
    }
}
