//! # pipeliner
//!
//! Pipeline runner: claims pipeline definitions (graphs of workers) from a router,
//! submits each ready worker as a job and advances the graph as `job finished`
//! notifications arrive on the router's broadcast channel.
//!
//! ## Architecture
//!
//! - [types]: worker graphs, run state, admission counter.
//! - [protocol]: router requests/replies and broadcast messages.
//! - [registry]: running pipelines and in-flight jobs.
//! - [scheduler]: the single actor tying it together.
//! - [transport]: router API and broadcast channel implementations.

pub mod clock;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
#[cfg(test)]
mod registry_test;
pub mod scheduler;
pub mod transport;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PipelinerConfig;
pub use error::{ConfigError, GraphError, PipelinerError, Result};
pub use scheduler::{ClaimOutcome, Scheduler, SchedulerOptions};
pub use transport::{
  Broadcast, MemoryBroadcast, MemoryPublisher, RedisBroadcast, RouterApi, TcpRouterApi,
  memory_broadcast,
};
pub use types::{AdmissionCounter, JobId, PipelineId, WorkerGraph};
