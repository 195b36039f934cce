//! Bookkeeping for running pipelines and outstanding jobs.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::types::{JobId, PipelineId, PipelineRun, WorkerAssignment};

/// Running pipelines by id.
#[derive(Debug, Default)]
pub struct PipelineRegistry {
  runs: HashMap<PipelineId, PipelineRun>,
}

impl PipelineRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a run, returning any run it displaced under the same id.
  pub fn insert(&mut self, run: PipelineRun) -> Option<PipelineRun> {
    self.runs.insert(run.pipeline_id().clone(), run)
  }

  pub fn contains(&self, pipeline_id: &PipelineId) -> bool {
    self.runs.contains_key(pipeline_id)
  }

  pub fn get(&self, pipeline_id: &PipelineId) -> Option<&PipelineRun> {
    self.runs.get(pipeline_id)
  }

  pub fn get_mut(&mut self, pipeline_id: &PipelineId) -> Option<&mut PipelineRun> {
    self.runs.get_mut(pipeline_id)
  }

  pub fn remove(&mut self, pipeline_id: &PipelineId) -> Option<PipelineRun> {
    self.runs.remove(pipeline_id)
  }

  pub fn len(&self) -> usize {
    self.runs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.runs.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &PipelineRun> {
    self.runs.values()
  }
}

/// Maps router job ids back to the worker they run.
#[derive(Debug, Default)]
pub struct JobCorrelator {
  jobs: HashMap<JobId, WorkerAssignment>,
}

impl JobCorrelator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a dispatched job. A job id that is already live is refused and the
  /// assignment handed back.
  pub fn insert(
    &mut self,
    job_id: JobId,
    assignment: WorkerAssignment,
  ) -> Result<(), WorkerAssignment> {
    match self.jobs.entry(job_id) {
      Entry::Occupied(_) => Err(assignment),
      Entry::Vacant(slot) => {
        slot.insert(assignment);
        Ok(())
      }
    }
  }

  pub fn contains(&self, job_id: &JobId) -> bool {
    self.jobs.contains_key(job_id)
  }

  pub fn get(&self, job_id: &JobId) -> Option<&WorkerAssignment> {
    self.jobs.get(job_id)
  }

  pub fn remove(&mut self, job_id: &JobId) -> Option<WorkerAssignment> {
    self.jobs.remove(job_id)
  }

  pub fn len(&self) -> usize {
    self.jobs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.jobs.is_empty()
  }
}
