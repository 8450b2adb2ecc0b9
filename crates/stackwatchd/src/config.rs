//! Environment-variable configuration.
//!
//! Read once at startup; a missing required variable or an unparseable
//! numeric is fatal before any subsystem starts.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_LISTEN_PORT: u16 = 9010;
const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// Errors that prevent the process from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the orchestrator API, e.g. `http://orchestrator:8080/v1`.
    pub api_url: String,
    pub access_key: String,
    pub secret_key: String,
    /// Port the metrics server listens on. Default: 9010.
    pub listen_port: u16,
    /// Delay between poll ticks. Default: 5000 ms.
    pub poll_interval: Duration,
    /// Per-request timeout for upstream fetches. Default: 30 s, safely
    /// above the default poll interval.
    pub fetch_timeout: Duration,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: required(&lookup, "STACKWATCH_API_URL")?,
            access_key: required(&lookup, "STACKWATCH_ACCESS_KEY")?,
            secret_key: required(&lookup, "STACKWATCH_SECRET_KEY")?,
            listen_port: parsed(&lookup, "STACKWATCH_LISTEN_PORT", DEFAULT_LISTEN_PORT)?,
            poll_interval: Duration::from_millis(parsed(
                &lookup,
                "STACKWATCH_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )?),
            fetch_timeout: Duration::from_millis(parsed(
                &lookup,
                "STACKWATCH_FETCH_TIMEOUT_MS",
                DEFAULT_FETCH_TIMEOUT_MS,
            )?),
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
