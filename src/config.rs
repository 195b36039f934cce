//! Runtime configuration: where the router lives and how long to wait on it.
//!
//! Values come from CLI flags; `PIPELINER_*` environment variables override them when set.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_API_ADDR: &str = "127.0.0.1:5555";
pub const DEFAULT_BROADCAST_URL: &str = "redis://127.0.0.1:6379/";
pub const DEFAULT_POLL_TIME_MS: u64 = 50;
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 30_000;

pub const ENV_API_ADDR: &str = "PIPELINER_API_ADDR";
pub const ENV_BROADCAST_URL: &str = "PIPELINER_BROADCAST_URL";
pub const ENV_POLL_TIME_MS: &str = "PIPELINER_POLL_TIME_MS";
pub const ENV_REPLY_TIMEOUT_MS: &str = "PIPELINER_REPLY_TIMEOUT_MS";

/// Pipeliner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinerConfig {
  /// `host:port` of the router's request/reply API.
  pub api_addr: String,
  /// Redis URL of the router's broadcast channel.
  pub broadcast_url: String,
  /// Bounded wait for each broadcast poll.
  pub poll_time: Duration,
  /// Bound on each router reply; `None` waits forever.
  pub reply_timeout: Option<Duration>,
}

impl Default for PipelinerConfig {
  fn default() -> Self {
    Self {
      api_addr: DEFAULT_API_ADDR.to_string(),
      broadcast_url: DEFAULT_BROADCAST_URL.to_string(),
      poll_time: Duration::from_millis(DEFAULT_POLL_TIME_MS),
      reply_timeout: Some(Duration::from_millis(DEFAULT_REPLY_TIMEOUT_MS)),
    }
  }
}

impl PipelinerConfig {
  /// A reply timeout of 0 ms means wait forever.
  pub fn reply_timeout_from_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
  }

  /// Applies `PIPELINER_*` overrides found through `lookup` (e.g. `std::env::var`).
  pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(addr) = lookup(ENV_API_ADDR) {
      self.api_addr = addr;
    }
    if let Some(url) = lookup(ENV_BROADCAST_URL) {
      self.broadcast_url = url;
    }
    if let Some(ms) = lookup(ENV_POLL_TIME_MS) {
      self.poll_time = Duration::from_millis(parse_millis(ENV_POLL_TIME_MS, &ms)?);
    }
    if let Some(ms) = lookup(ENV_REPLY_TIMEOUT_MS) {
      self.reply_timeout = Self::reply_timeout_from_millis(parse_millis(ENV_REPLY_TIMEOUT_MS, &ms)?);
    }
    Ok(self)
  }
}

fn parse_millis(var: &str, value: &str) -> Result<u64, ConfigError> {
  value
    .trim()
    .parse()
    .map_err(|_| ConfigError::InvalidNumber {
      var: var.to_string(),
      value: value.to_string(),
    })
}
