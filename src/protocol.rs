//! Messages exchanged with the router.
//!
//! Requests go out as JSON objects tagged by `command`. Replies come back as loose
//! JSON and are classified here once. Broadcast text is parsed into
//! [BroadcastMessage] at the transport boundary so the scheduler never matches strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{JobId, PipelineId};

/// Broadcast text announcing that the router has queued a pipeline.
pub const NEW_PIPELINE: &str = "new pipeline";

/// Prefix of the broadcast text announcing a finished job.
pub const JOB_FINISHED_PREFIX: &str = "job finished: ";

/// Request sent on the router API channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum RouterRequest {
  #[serde(rename = "get pipeline")]
  GetPipeline,
  #[serde(rename = "add job")]
  AddJob { worker: String, data: Value },
  #[serde(rename = "pipeline finished")]
  PipelineFinished {
    #[serde(rename = "pipeline id")]
    pipeline_id: PipelineId,
    /// Wall time from claim to last job completion, in seconds.
    duration: f64,
  },
}

/// A pipeline handed out by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDefinition {
  pub pipeline_id: PipelineId,
  /// Nested worker definition, parsed later by [crate::types::WorkerGraph::from_json].
  pub workers: Value,
  /// Input payload for the root worker.
  pub data: Value,
}

/// Reply to [RouterRequest::GetPipeline].
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimReply {
  Pipeline(PipelineDefinition),
  /// The router has nothing queued.
  NoneAvailable,
  /// Neither known shape; carries the raw reply for logging.
  Malformed(Value),
}

impl ClaimReply {
  /// Classifies a claim reply.
  ///
  /// `{workers, data, "pipeline id"}` with non-null `data` is a pipeline; null `data`
  /// or `{"pipeline": null}` means none available; anything else is malformed.
  pub fn classify(reply: Value) -> Self {
    match reply {
      Value::Object(map) => Self::classify_object(map),
      other => Self::Malformed(other),
    }
  }

  fn classify_object(mut map: Map<String, Value>) -> Self {
    if map.contains_key("workers") && map.contains_key("data") {
      if map.get("data").is_some_and(Value::is_null) {
        return Self::NoneAvailable;
      }
      let Some(pipeline_id) = map.get("pipeline id").and_then(PipelineId::from_json) else {
        return Self::Malformed(Value::Object(map));
      };
      let workers = map.remove("workers").unwrap_or(Value::Null);
      let data = map.remove("data").unwrap_or(Value::Null);
      return Self::Pipeline(PipelineDefinition {
        pipeline_id,
        workers,
        data,
      });
    }
    if map.get("pipeline").is_some_and(Value::is_null) {
      return Self::NoneAvailable;
    }
    Self::Malformed(Value::Object(map))
  }
}

/// Job id from a reply to [RouterRequest::AddJob], if the reply has one.
pub fn job_id_from_reply(reply: &Value) -> Option<JobId> {
  reply.get("job id").and_then(JobId::from_json)
}

/// Broadcast subscription topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
  NewPipeline,
  JobFinished(JobId),
}

impl fmt::Display for Topic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Topic::NewPipeline => f.write_str(NEW_PIPELINE),
      Topic::JobFinished(job_id) => write!(f, "{}{}", JOB_FINISHED_PREFIX, job_id),
    }
  }
}

/// A message received on the broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastMessage {
  NewPipeline,
  JobFinished { job_id: JobId },
  /// Text matching no known form.
  Unrecognized(String),
}

impl BroadcastMessage {
  /// Parses broadcast text: `new pipeline...` or `job finished: <id>[ <rest>]`.
  pub fn parse(text: &str) -> Self {
    if text.starts_with(NEW_PIPELINE) {
      return Self::NewPipeline;
    }
    if let Some(rest) = text.strip_prefix(JOB_FINISHED_PREFIX) {
      let id = rest.split(' ').next().unwrap_or_default();
      if !id.is_empty() {
        return Self::JobFinished {
          job_id: JobId::new(id),
        };
      }
    }
    Self::Unrecognized(text.to_string())
  }
}
