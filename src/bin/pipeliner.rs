//! CLI: run the pipeliner against a router.
//!
//! Connects to the router's request/reply API (TCP, one JSON document per line) and to
//! its broadcast channel (Redis pub/sub), then claims and runs pipelines until SIGINT.
//!
//! Usage: `pipeliner [OPTIONS]`
//! Example: pipeliner --api-addr 127.0.0.1:5555 --broadcast-url redis://127.0.0.1/
//!
//! Set RUST_LOG=pipeliner=debug for per-message events.

use std::env;
use std::process;
use std::time::Duration;

use clap::Parser;
use pipeliner::config::{
  DEFAULT_API_ADDR, DEFAULT_BROADCAST_URL, DEFAULT_POLL_TIME_MS, DEFAULT_REPLY_TIMEOUT_MS,
};
use pipeliner::{
  PipelinerConfig, RedisBroadcast, Scheduler, SchedulerOptions, TcpRouterApi,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run pipelines handed out by a router.
#[derive(Parser, Debug)]
#[command(name = "pipeliner")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  PIPELINER_API_ADDR          Router API address (host:port).
  PIPELINER_BROADCAST_URL     Router broadcast channel (Redis URL).
  PIPELINER_POLL_TIME_MS      Broadcast poll wait in milliseconds.
  PIPELINER_REPLY_TIMEOUT_MS  Router reply timeout in milliseconds (0 waits forever).

Examples:
  pipeliner
  pipeliner --api-addr 10.0.0.5:5555 --broadcast-url redis://10.0.0.5/"#
)]
struct Args {
  /// Router API address (host:port).
  #[arg(long, value_name = "ADDR", default_value = DEFAULT_API_ADDR)]
  api_addr: String,

  /// Router broadcast channel (Redis URL).
  #[arg(long, value_name = "URL", default_value = DEFAULT_BROADCAST_URL)]
  broadcast_url: String,

  /// How long each broadcast poll waits, in milliseconds.
  #[arg(long, value_name = "MS", default_value_t = DEFAULT_POLL_TIME_MS)]
  poll_time_ms: u64,

  /// Router reply timeout in milliseconds; 0 waits forever.
  #[arg(long, value_name = "MS", default_value_t = DEFAULT_REPLY_TIMEOUT_MS)]
  reply_timeout_ms: u64,
}

impl Args {
  fn into_config(self) -> PipelinerConfig {
    PipelinerConfig {
      api_addr: self.api_addr,
      broadcast_url: self.broadcast_url,
      poll_time: Duration::from_millis(self.poll_time_ms),
      reply_timeout: PipelinerConfig::reply_timeout_from_millis(self.reply_timeout_ms),
    }
  }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();
  let config = match args.into_config().with_env_overrides(|k| env::var(k).ok()) {
    Ok(c) => c,
    Err(e) => {
      eprintln!("Error in configuration: {}", e);
      process::exit(1);
    }
  };
  info!(
    api_addr = %config.api_addr,
    broadcast_url = %config.broadcast_url,
    poll_time = ?config.poll_time,
    reply_timeout = ?config.reply_timeout,
    "options (env or flags)"
  );

  let router = match TcpRouterApi::connect(&config.api_addr, config.reply_timeout).await {
    Ok(r) => r,
    Err(e) => {
      eprintln!("Error connecting to router API at {}: {}", config.api_addr, e);
      process::exit(1);
    }
  };
  let broadcast = match RedisBroadcast::connect(&config.broadcast_url).await {
    Ok(b) => b,
    Err(e) => {
      eprintln!(
        "Error connecting to broadcast channel at {}: {}",
        config.broadcast_url, e
      );
      process::exit(1);
    }
  };

  let options = SchedulerOptions {
    poll_time: config.poll_time,
  };
  let mut scheduler = Scheduler::new(router, broadcast, options);
  let shutdown = async {
    if tokio::signal::ctrl_c().await.is_ok() {
      info!("got SIGINT, exiting");
    }
  };

  if let Err(e) = scheduler.run_until(shutdown).await {
    eprintln!("Pipeliner error: {}", e);
    process::exit(1);
  }
}
