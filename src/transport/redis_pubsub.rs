//! Broadcast channel on Redis pub/sub: each topic is a channel, each payload is the
//! broadcast text.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, instrument};

use super::Broadcast;
use crate::error::{PipelinerError, Result};
use crate::protocol::{BroadcastMessage, Topic};

/// Redis pub/sub subscriber.
pub struct RedisBroadcast {
  pubsub: redis::aio::PubSub,
  channels: HashSet<String>,
}

impl RedisBroadcast {
  pub async fn connect(url: &str) -> Result<Self> {
    let client = redis::Client::open(url)?;
    let pubsub = client.get_async_pubsub().await?;
    Ok(Self {
      pubsub,
      channels: HashSet::new(),
    })
  }
}

#[async_trait]
impl Broadcast for RedisBroadcast {
  #[instrument(level = "trace", skip(self))]
  async fn subscribe(&mut self, topic: &Topic) -> Result<()> {
    let channel = topic.to_string();
    self.pubsub.subscribe(channel.as_str()).await?;
    self.channels.insert(channel);
    Ok(())
  }

  #[instrument(level = "trace", skip(self))]
  async fn unsubscribe(&mut self, topic: &Topic) -> Result<()> {
    let channel = topic.to_string();
    if self.channels.remove(&channel) {
      self.pubsub.unsubscribe(channel.as_str()).await?;
    }
    Ok(())
  }

  async fn next_message(&mut self, wait: Duration) -> Result<Option<BroadcastMessage>> {
    let mut messages = std::pin::pin!(self.pubsub.on_message());
    match tokio::time::timeout(wait, messages.next()).await {
      Err(_) => Ok(None),
      Ok(None) => Err(PipelinerError::BroadcastClosed),
      Ok(Some(msg)) => {
        let text: String = msg.get_payload()?;
        debug!(channel = msg.get_channel_name(), text = %text, "received from broadcast");
        Ok(Some(BroadcastMessage::parse(&text)))
      }
    }
  }

  async fn disconnect(&mut self) -> Result<()> {
    for channel in self.channels.drain() {
      self.pubsub.unsubscribe(channel.as_str()).await?;
    }
    Ok(())
  }
}
