//! Router API over TCP, one JSON document per line in each direction.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{instrument, trace};

use super::RouterApi;
use crate::error::{PipelinerError, Result};
use crate::protocol::RouterRequest;

/// Router API client over a TCP stream.
///
/// Each reply wait is bounded by `reply_timeout` when set; an elapsed wait is
/// [PipelinerError::ReplyTimeout].
#[derive(Debug)]
pub struct TcpRouterApi {
  reader: BufReader<OwnedReadHalf>,
  writer: OwnedWriteHalf,
  reply_timeout: Option<Duration>,
}

impl TcpRouterApi {
  pub async fn connect(addr: &str, reply_timeout: Option<Duration>) -> Result<Self> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    Ok(Self::from_stream(stream, reply_timeout))
  }

  pub fn from_stream(stream: TcpStream, reply_timeout: Option<Duration>) -> Self {
    let (reader, writer) = stream.into_split();
    Self {
      reader: BufReader::new(reader),
      writer,
      reply_timeout,
    }
  }

  async fn read_reply(&mut self) -> Result<Value> {
    let mut line = String::new();
    let read = self.reader.read_line(&mut line);
    let n = match self.reply_timeout {
      Some(limit) => tokio::time::timeout(limit, read)
        .await
        .map_err(|_| PipelinerError::ReplyTimeout(limit))??,
      None => read.await?,
    };
    if n == 0 {
      return Err(PipelinerError::RouterClosed);
    }
    trace!(reply = %line.trim_end(), "router reply");
    Ok(serde_json::from_str(line.trim_end())?)
  }
}

#[async_trait]
impl RouterApi for TcpRouterApi {
  #[instrument(level = "trace", skip(self))]
  async fn request(&mut self, request: &RouterRequest) -> Result<Value> {
    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    self.writer.write_all(line.as_bytes()).await?;
    self.writer.flush().await?;
    self.read_reply().await
  }

  async fn disconnect(&mut self) -> Result<()> {
    self.writer.shutdown().await?;
    Ok(())
  }
}
