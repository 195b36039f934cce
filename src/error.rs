//! Error types for the pipeliner.
//!
//! Transport failures surface as [PipelinerError] and end the main loop. Definition
//! problems surface as [GraphError] and only ever reject the pipeline that caused them.

use std::time::Duration;

use thiserror::Error;

/// Result alias used across the scheduler and transports.
pub type Result<T> = std::result::Result<T, PipelinerError>;

/// Failures talking to the router or the broadcast channel.
#[derive(Debug, Error)]
pub enum PipelinerError {
  #[error("router I/O failed: {0}")]
  Io(#[from] std::io::Error),

  #[error("router did not reply within {0:?}")]
  ReplyTimeout(Duration),

  #[error("router closed the connection")]
  RouterClosed,

  #[error("router sent a reply that is not JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("broadcast channel failed: {0}")]
  Redis(#[from] redis::RedisError),

  #[error("broadcast channel closed")]
  BroadcastClosed,
}

/// A worker definition that cannot be turned into a [crate::types::WorkerGraph].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  #[error("malformed worker definition: {0}")]
  Malformed(String),

  #[error("worker definition has an empty name")]
  EmptyName,
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("{var} must be a whole number of milliseconds, got {value:?}")]
  InvalidNumber { var: String, value: String },
}
