//! # Configuration
//!
//! [`RelayConfig`] gathers every setting the relay and its bus connection need. Defaults
//! reproduce the deployed kitchen setup; any of them can be overridden through `RELAY_*`
//! environment variables, optionally from a `.env` file:
//!
//! | Variable                 | Default             |
//! |--------------------------|---------------------|
//! | `RELAY_BROKER_HOST`      | `mosquitto`         |
//! | `RELAY_BROKER_PORT`      | `9001`              |
//! | `RELAY_CLIENT_ID`        | `food_order_server` |
//! | `RELAY_INBOUND_TOPIC`    | `ORDER`             |
//! | `RELAY_OUTBOUND_TOPIC`   | `FOOD`              |
//! | `RELAY_PREP_MIN_SECS`    | `3.0`               |
//! | `RELAY_PREP_MAX_SECS`    | `10.0`              |
//! | `RELAY_BACKOFF_MIN_SECS` | `1`                 |
//! | `RELAY_BACKOFF_MAX_SECS` | `30`                |
//! | `RELAY_QUEUE_CAPACITY`   | unbounded           |
//! | `RELAY_LOG_FILE`         | none (stderr only)  |
//!
//! Broker, client id and backoff settings belong to the bus connection; the relay core
//! only reads topics, delay bounds and the queue capacity. `RELAY_LOG_FILE` is read by
//! `main` when it installs the subscriber.

use crate::bus::{FOOD_TOPIC, ORDER_TOPIC};
use crate::fulfillment::{UniformDelay, DEFAULT_MAX_PREP_SECS, DEFAULT_MIN_PREP_SECS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "RELAY_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub client_id: String,
    pub inbound_topic: String,
    pub outbound_topic: String,
    pub prep_min_secs: f64,
    pub prep_max_secs: f64,
    pub backoff_min_secs: u64,
    pub backoff_max_secs: u64,
    /// `None` keeps the submission queue unbounded.
    pub queue_capacity: Option<usize>,
    /// Log lines are also appended here when set.
    pub log_file: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            broker_host: "mosquitto".to_string(),
            broker_port: 9001,
            client_id: "food_order_server".to_string(),
            inbound_topic: ORDER_TOPIC.to_string(),
            outbound_topic: FOOD_TOPIC.to_string(),
            prep_min_secs: DEFAULT_MIN_PREP_SECS,
            prep_max_secs: DEFAULT_MAX_PREP_SECS,
            backoff_min_secs: 1,
            backoff_max_secs: 30,
            queue_capacity: None,
            log_file: None,
        }
    }
}

impl RelayConfig {
    /// Loads `.env` if present, then applies `RELAY_*` overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded env file"),
            Err(dotenvy::Error::Io(_)) => {}
            Err(e) => return Err(e.into()),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults plus whatever `lookup` returns for each `RELAY_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .map(|raw| (key, raw))
        };

        if let Some((_, v)) = var("BROKER_HOST") {
            config.broker_host = v;
        }
        if let Some((k, v)) = var("BROKER_PORT") {
            config.broker_port = parse(&k, &v)?;
        }
        if let Some((_, v)) = var("CLIENT_ID") {
            config.client_id = v;
        }
        if let Some((_, v)) = var("INBOUND_TOPIC") {
            config.inbound_topic = v;
        }
        if let Some((_, v)) = var("OUTBOUND_TOPIC") {
            config.outbound_topic = v;
        }
        if let Some((k, v)) = var("PREP_MIN_SECS") {
            config.prep_min_secs = parse(&k, &v)?;
        }
        if let Some((k, v)) = var("PREP_MAX_SECS") {
            config.prep_max_secs = parse(&k, &v)?;
        }
        if let Some((k, v)) = var("BACKOFF_MIN_SECS") {
            config.backoff_min_secs = parse(&k, &v)?;
        }
        if let Some((k, v)) = var("BACKOFF_MAX_SECS") {
            config.backoff_max_secs = parse(&k, &v)?;
        }
        if let Some((k, v)) = var("QUEUE_CAPACITY") {
            config.queue_capacity = Some(parse(&k, &v)?);
        }
        if let Some((_, v)) = var("LOG_FILE") {
            config.log_file = Some(PathBuf::from(v));
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delay_source()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.backoff_min_secs > self.backoff_max_secs {
            return Err(ConfigError::Invalid(format!(
                "reconnect backoff min {}s exceeds max {}s",
                self.backoff_min_secs, self.backoff_max_secs
            )));
        }
        if self.queue_capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if let Some(path) = &self.log_file {
            if path.file_name().is_none() {
                return Err(ConfigError::Invalid(format!(
                    "log file {} does not name a file",
                    path.display()
                )));
            }
        }
        if self.inbound_topic == self.outbound_topic {
            return Err(ConfigError::Invalid(format!(
                "inbound and outbound topics must differ (both {:?})",
                self.inbound_topic
            )));
        }
        Ok(())
    }

    pub fn delay_source(&self) -> Result<UniformDelay, crate::fulfillment::InvalidDelayBounds> {
        UniformDelay::new(self.prep_min_secs, self.prep_max_secs)
    }

    pub fn broker_addr(&self) -> String {
        format!("{}:{}", self.broker_host, self.broker_port)
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
