//! Collaborators the scheduler talks to: the router's request/reply API and its
//! broadcast channel.
//!
//! - [TcpRouterApi]: newline-delimited JSON requests and replies over TCP.
//! - [RedisBroadcast]: broadcast topics as Redis pub/sub channels.
//! - [MemoryBroadcast]: in-process broadcast fed by a [MemoryPublisher].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::protocol::{BroadcastMessage, RouterRequest, Topic};

mod memory;
mod redis_pubsub;
mod tcp;

pub use memory::{MemoryBroadcast, MemoryPublisher, memory_broadcast};
pub use redis_pubsub::RedisBroadcast;
pub use tcp::TcpRouterApi;

/// Request/reply channel to the router. One request is outstanding at a time.
#[async_trait]
pub trait RouterApi: Send {
  /// Sends `request` and waits for the router's reply.
  async fn request(&mut self, request: &RouterRequest) -> Result<Value>;

  async fn disconnect(&mut self) -> Result<()> {
    Ok(())
  }
}

/// Subscription side of the router's broadcast channel.
#[async_trait]
pub trait Broadcast: Send {
  async fn subscribe(&mut self, topic: &Topic) -> Result<()>;

  /// Unsubscribing from a topic that is not subscribed is a no-op.
  async fn unsubscribe(&mut self, topic: &Topic) -> Result<()>;

  /// Waits up to `wait` for the next message on a subscribed topic.
  async fn next_message(&mut self, wait: Duration) -> Result<Option<BroadcastMessage>>;

  async fn disconnect(&mut self) -> Result<()> {
    Ok(())
  }
}
