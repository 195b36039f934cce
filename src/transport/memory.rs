//! In-process broadcast channel.
//!
//! Subscriptions are prefix filters applied when a message is consumed, so a message
//! published just before its topic is subscribed is still delivered.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::Broadcast;
use crate::error::{PipelinerError, Result};
use crate::protocol::{BroadcastMessage, Topic};

/// Creates a connected publisher/subscriber pair.
pub fn memory_broadcast() -> (MemoryPublisher, MemoryBroadcast) {
  let (tx, rx) = mpsc::unbounded_channel();
  (
    MemoryPublisher { tx },
    MemoryBroadcast {
      rx,
      filters: HashSet::new(),
    },
  )
}

/// Publishing end of a [MemoryBroadcast].
#[derive(Debug, Clone)]
pub struct MemoryPublisher {
  tx: mpsc::UnboundedSender<String>,
}

impl MemoryPublisher {
  /// Publishes broadcast text. Returns false once the subscriber is gone.
  pub fn publish(&self, text: impl Into<String>) -> bool {
    self.tx.send(text.into()).is_ok()
  }
}

/// Subscribing end of an in-process broadcast channel.
#[derive(Debug)]
pub struct MemoryBroadcast {
  rx: mpsc::UnboundedReceiver<String>,
  filters: HashSet<String>,
}

impl MemoryBroadcast {
  pub fn is_subscribed(&self, topic: &Topic) -> bool {
    self.filters.contains(&topic.to_string())
  }

  pub fn subscriptions(&self) -> impl Iterator<Item = &str> {
    self.filters.iter().map(String::as_str)
  }

  fn accepts(&self, text: &str) -> bool {
    self.filters.iter().any(|f| text.starts_with(f.as_str()))
  }
}

#[async_trait]
impl Broadcast for MemoryBroadcast {
  async fn subscribe(&mut self, topic: &Topic) -> Result<()> {
    self.filters.insert(topic.to_string());
    Ok(())
  }

  async fn unsubscribe(&mut self, topic: &Topic) -> Result<()> {
    self.filters.remove(&topic.to_string());
    Ok(())
  }

  async fn next_message(&mut self, wait: Duration) -> Result<Option<BroadcastMessage>> {
    let deadline = Instant::now() + wait;
    loop {
      match tokio::time::timeout_at(deadline, self.rx.recv()).await {
        Err(_) => return Ok(None),
        Ok(None) => return Err(PipelinerError::BroadcastClosed),
        Ok(Some(text)) if self.accepts(&text) => {
          debug!(text = %text, "received from broadcast");
          return Ok(Some(BroadcastMessage::parse(&text)));
        }
        Ok(Some(text)) => trace!(text = %text, "no subscription, dropped"),
      }
    }
  }

  async fn disconnect(&mut self) -> Result<()> {
    self.filters.clear();
    self.rx.close();
    Ok(())
  }
}
