//! Tests for `PipelineRegistry` and `JobCorrelator`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::registry::{JobCorrelator, PipelineRegistry};
use crate::types::{JobId, PipelineId, PipelineRun, WorkerAssignment, WorkerDefinition, WorkerGraph};

fn run(id: &str, job: &str) -> PipelineRun {
  let graph = Arc::new(WorkerGraph::build(&WorkerDefinition::leaf("A")));
  let started = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
  PipelineRun::new(PipelineId::new(id), started, graph, JobId::new(job))
}

fn assignment(id: &str) -> WorkerAssignment {
  let started = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
  WorkerAssignment::root(PipelineId::new(id), json!("payload"), started)
}

#[test]
fn registry_insert_get_remove() {
  let mut reg = PipelineRegistry::new();
  assert!(reg.is_empty());
  assert!(reg.insert(run("p1", "j1")).is_none());
  assert!(reg.contains(&PipelineId::new("p1")));
  assert_eq!(reg.len(), 1);
  assert_eq!(
    reg.get(&PipelineId::new("p1")).map(|r| r.frontier().len()),
    Some(1)
  );
  let removed = reg.remove(&PipelineId::new("p1")).expect("removed");
  assert_eq!(removed.pipeline_id(), &PipelineId::new("p1"));
  assert!(reg.is_empty());
}

#[test]
fn registry_insert_returns_displaced_run() {
  let mut reg = PipelineRegistry::new();
  reg.insert(run("p1", "j1"));
  let displaced = reg.insert(run("p1", "j2")).expect("displaced");
  assert!(displaced.frontier().contains_key(&JobId::new("j1")));
  let current = reg.get(&PipelineId::new("p1")).expect("current");
  assert!(current.frontier().contains_key(&JobId::new("j2")));
  assert_eq!(reg.len(), 1);
}

#[test]
fn registry_get_mut_updates_frontier() {
  let mut reg = PipelineRegistry::new();
  reg.insert(run("p1", "j1"));
  let r = reg.get_mut(&PipelineId::new("p1")).expect("run");
  r.complete_job(&JobId::new("j1"));
  assert!(reg.iter().all(PipelineRun::is_finished));
}

#[test]
fn correlator_refuses_live_job_id() {
  let mut jobs = JobCorrelator::new();
  jobs.insert(JobId::new("j1"), assignment("p1")).expect("insert");
  let refused = jobs.insert(JobId::new("j1"), assignment("p2")).unwrap_err();
  assert_eq!(refused.pipeline_id, PipelineId::new("p2"));
  assert_eq!(
    jobs.get(&JobId::new("j1")).map(|a| a.pipeline_id.clone()),
    Some(PipelineId::new("p1"))
  );
  assert_eq!(jobs.len(), 1);
}

#[test]
fn correlator_remove_frees_job_id() {
  let mut jobs = JobCorrelator::new();
  jobs.insert(JobId::new("j1"), assignment("p1")).expect("insert");
  assert!(jobs.remove(&JobId::new("j1")).is_some());
  assert!(!jobs.contains(&JobId::new("j1")));
  assert!(jobs.is_empty());
  jobs.insert(JobId::new("j1"), assignment("p2")).expect("reuse");
}
