//! One claimed pipeline and the jobs it has in flight.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{JobId, NodeIndex, PipelineId, WorkerGraph};

/// A running pipeline: its graph, claim time and frontier.
///
/// The frontier maps each outstanding job to the node it runs. A run is created with
/// its root job already in the frontier, so a fresh run is never empty.
#[derive(Debug, Clone)]
pub struct PipelineRun {
  pipeline_id: PipelineId,
  started_at: DateTime<Utc>,
  graph: Arc<WorkerGraph>,
  frontier: BTreeMap<JobId, NodeIndex>,
}

impl PipelineRun {
  pub fn new(
    pipeline_id: PipelineId,
    started_at: DateTime<Utc>,
    graph: Arc<WorkerGraph>,
    root_job: JobId,
  ) -> Self {
    let mut frontier = BTreeMap::new();
    frontier.insert(root_job, graph.root());
    Self {
      pipeline_id,
      started_at,
      graph,
      frontier,
    }
  }

  pub fn pipeline_id(&self) -> &PipelineId {
    &self.pipeline_id
  }

  pub fn started_at(&self) -> DateTime<Utc> {
    self.started_at
  }

  pub fn graph(&self) -> &Arc<WorkerGraph> {
    &self.graph
  }

  pub fn frontier(&self) -> &BTreeMap<JobId, NodeIndex> {
    &self.frontier
  }

  /// True once every dispatched job has completed.
  pub fn is_finished(&self) -> bool {
    self.frontier.is_empty()
  }

  pub fn add_job(&mut self, job_id: JobId, node: NodeIndex) {
    self.frontier.insert(job_id, node);
  }

  /// Removes `job_id` from the frontier, returning the node it ran.
  pub fn complete_job(&mut self, job_id: &JobId) -> Option<NodeIndex> {
    self.frontier.remove(job_id)
  }

  /// Seconds from claim to `now`, never negative.
  pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
    let micros = (now - self.started_at).num_microseconds().unwrap_or(i64::MAX);
    (micros as f64 / 1_000_000.0).max(0.0)
  }
}
