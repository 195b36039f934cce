//! Run-scoped values attached to a dispatched worker.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{NodeIndex, PipelineId, WorkerGraph};

/// A graph node tagged with the run it belongs to and the payload it was sent with.
///
/// The root gets the pipeline's input payload; every successor inherits `data`,
/// `pipeline_id` and `pipeline_started_at` unchanged from the node that completed.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerAssignment {
  pub pipeline_id: PipelineId,
  pub node: NodeIndex,
  pub data: Value,
  pub pipeline_started_at: DateTime<Utc>,
}

impl WorkerAssignment {
  pub fn root(pipeline_id: PipelineId, data: Value, pipeline_started_at: DateTime<Utc>) -> Self {
    Self {
      pipeline_id,
      node: WorkerGraph::ROOT,
      data,
      pipeline_started_at,
    }
  }

  /// Assignment for `node`, propagating this assignment's payload and pipeline tags.
  pub fn successor(&self, node: NodeIndex) -> Self {
    Self {
      pipeline_id: self.pipeline_id.clone(),
      node,
      data: self.data.clone(),
      pipeline_started_at: self.pipeline_started_at,
    }
  }
}
