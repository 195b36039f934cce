//! Pipeline scheduler: claims pipelines from the router, dispatches their jobs and
//! advances each pipeline's frontier as completions arrive on the broadcast channel.
//!
//! One [Scheduler] owns all run state (registry, correlator, admission counter) and
//! drives it from a single task. The only waits are router replies and the bounded
//! broadcast poll.
//!
//! Main loop:
//!
//! ```text
//! claim drain ──► ┌─► broadcast poll ─► counter > 0 ? claim drain
//!                 └── completion pass ◄─┘
//! ```

use std::future::Future;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::protocol::{
  BroadcastMessage, ClaimReply, PipelineDefinition, RouterRequest, Topic, job_id_from_reply,
};
use crate::registry::{JobCorrelator, PipelineRegistry};
use crate::transport::{Broadcast, RouterApi};
use crate::types::{
  AdmissionCounter, JobId, PipelineId, PipelineRun, WorkerAssignment, WorkerGraph,
};

/// Default bounded wait for one broadcast poll.
pub const DEFAULT_POLL_TIME: Duration = Duration::from_millis(50);

/// Options for [Scheduler::new].
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
  /// How long each broadcast poll waits for a first message.
  pub poll_time: Duration,
}

impl Default for SchedulerOptions {
  fn default() -> Self {
    Self {
      poll_time: DEFAULT_POLL_TIME,
    }
  }
}

/// Result of one claim request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
  /// A pipeline was claimed and its root job dispatched.
  Claimed(PipelineId),
  /// A pipeline was handed out but dropped (bad definition, duplicate id, root job
  /// not accepted).
  Rejected,
  /// Nothing to claim, or the reply was malformed.
  Empty,
}

/// The pipeline runner's single actor.
pub struct Scheduler<R, B> {
  router: R,
  broadcast: B,
  clock: Arc<dyn Clock>,
  options: SchedulerOptions,
  admission: AdmissionCounter,
  registry: PipelineRegistry,
  correlator: JobCorrelator,
  /// Job ids announced finished, waiting for the next completion pass.
  finished_jobs: Vec<JobId>,
}

impl<R, B> Scheduler<R, B>
where
  R: RouterApi,
  B: Broadcast,
{
  pub fn new(router: R, broadcast: B, options: SchedulerOptions) -> Self {
    Self {
      router,
      broadcast,
      clock: Arc::new(SystemClock),
      options,
      admission: AdmissionCounter::new(),
      registry: PipelineRegistry::new(),
      correlator: JobCorrelator::new(),
      finished_jobs: Vec::new(),
    }
  }

  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  pub fn router(&self) -> &R {
    &self.router
  }

  pub fn broadcast(&self) -> &B {
    &self.broadcast
  }

  pub fn admission(&self) -> &AdmissionCounter {
    &self.admission
  }

  pub fn registry(&self) -> &PipelineRegistry {
    &self.registry
  }

  pub fn correlator(&self) -> &JobCorrelator {
    &self.correlator
  }

  /// Subscribes to pipeline announcements.
  pub async fn start(&mut self) -> Result<()> {
    self.broadcast.subscribe(&Topic::NewPipeline).await?;
    info!("pipeliner started");
    Ok(())
  }

  /// Runs the main loop. Only returns on a transport error.
  pub async fn run(&mut self) -> Result<()> {
    self.start().await?;
    info!("entering main loop");
    self.claim_pipelines().await?;
    loop {
      if self.has_new_pipeline().await? {
        self.claim_pipelines().await?;
      }
      self.process_notifications().await?;
    }
  }

  /// Runs the main loop until `shutdown` resolves, then disconnects. Jobs still in
  /// flight are abandoned, not cancelled at the router.
  pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
  where
    F: Future<Output = ()>,
  {
    let stopped = tokio::select! {
      result = self.run() => Some(result),
      () = shutdown => None,
    };
    match stopped {
      Some(result) => result,
      None => {
        info!(
          pipelines = self.registry.len(),
          jobs = self.correlator.len(),
          "shutting down"
        );
        self.disconnect().await
      }
    }
  }

  pub async fn disconnect(&mut self) -> Result<()> {
    self.broadcast.disconnect().await?;
    self.router.disconnect().await
  }

  /// Polls the broadcast channel once (bounded by `poll_time`), then takes every
  /// message already buffered.
  pub async fn update_broadcast(&mut self) -> Result<()> {
    let mut wait = self.options.poll_time;
    while let Some(message) = self.broadcast.next_message(wait).await? {
      wait = Duration::ZERO;
      match message {
        BroadcastMessage::NewPipeline => {
          self.admission.announce();
          debug!(pending = ?self.admission.value(), "new pipeline announced");
        }
        BroadcastMessage::JobFinished { job_id } => self.finished_jobs.push(job_id),
        BroadcastMessage::Unrecognized(text) => {
          debug!(text = %text, "ignoring broadcast message");
        }
      }
    }
    Ok(())
  }

  /// Whether announced pipelines are waiting to be claimed.
  pub async fn has_new_pipeline(&mut self) -> Result<bool> {
    self.update_broadcast().await?;
    Ok(self.admission.has_pending())
  }

  /// Claims pipelines until the router has none left. Returns how many started.
  pub async fn claim_pipelines(&mut self) -> Result<usize> {
    let mut started = 0;
    loop {
      match self.claim_pipeline().await? {
        ClaimOutcome::Claimed(_) => started += 1,
        ClaimOutcome::Rejected => {}
        ClaimOutcome::Empty => return Ok(started),
      }
    }
  }

  /// Asks the router for one pipeline and starts it.
  #[instrument(level = "trace", skip(self))]
  pub async fn claim_pipeline(&mut self) -> Result<ClaimOutcome> {
    let reply = self.router.request(&RouterRequest::GetPipeline).await?;
    match ClaimReply::classify(reply) {
      ClaimReply::Pipeline(definition) => {
        self.admission.claimed();
        info!(pipeline_id = %definition.pipeline_id, "got pipeline");
        self.start_pipeline(definition).await
      }
      ClaimReply::NoneAvailable => {
        self.admission.reset();
        debug!("no pipeline available");
        Ok(ClaimOutcome::Empty)
      }
      ClaimReply::Malformed(reply) => {
        warn!(reply = %reply, "ignoring malformed pipeline");
        Ok(ClaimOutcome::Empty)
      }
    }
  }

  async fn start_pipeline(&mut self, definition: PipelineDefinition) -> Result<ClaimOutcome> {
    let PipelineDefinition {
      pipeline_id,
      workers,
      data,
    } = definition;
    if self.registry.contains(&pipeline_id) {
      warn!(pipeline_id = %pipeline_id, "rejecting pipeline: already running");
      return Ok(ClaimOutcome::Rejected);
    }
    let graph = match WorkerGraph::from_json(&workers) {
      Ok(graph) => Arc::new(graph),
      Err(e) => {
        warn!(pipeline_id = %pipeline_id, error = %e, "rejecting pipeline");
        return Ok(ClaimOutcome::Rejected);
      }
    };

    let started_at = self.clock.now();
    let root = WorkerAssignment::root(pipeline_id.clone(), data, started_at);
    let Some(job_id) = self.dispatch(graph.root_node().name(), root).await? else {
      warn!(pipeline_id = %pipeline_id, "dropping pipeline: root job was not accepted");
      return Ok(ClaimOutcome::Rejected);
    };

    let run = PipelineRun::new(pipeline_id.clone(), started_at, graph, job_id);
    self.registry.insert(run);
    info!(pipeline_id = %pipeline_id, "started pipeline");
    Ok(ClaimOutcome::Claimed(pipeline_id))
  }

  /// Submits one job and subscribes to its completion. `None` when the router's reply
  /// carries no usable job id; that job is dropped.
  #[instrument(level = "trace", skip(self, assignment), fields(pipeline_id = %assignment.pipeline_id))]
  async fn dispatch(&mut self, worker: &str, assignment: WorkerAssignment) -> Result<Option<JobId>> {
    let request = RouterRequest::AddJob {
      worker: worker.to_string(),
      data: assignment.data.clone(),
    };
    let reply = self.router.request(&request).await?;

    let Some(job_id) = job_id_from_reply(&reply) else {
      warn!(worker, reply = %reply, "dropping job: malformed job reply");
      return Ok(None);
    };
    if let Err(assignment) = self.correlator.insert(job_id.clone(), assignment) {
      warn!(
        worker,
        job_id = %job_id,
        pipeline_id = %assignment.pipeline_id,
        "dropping job: job id is already in flight"
      );
      return Ok(None);
    }
    self
      .broadcast
      .subscribe(&Topic::JobFinished(job_id.clone()))
      .await?;
    info!(worker, job_id = %job_id, "sent job");
    Ok(Some(job_id))
  }

  /// Polls the broadcast channel, then handles every queued job completion in
  /// delivery order.
  pub async fn process_notifications(&mut self) -> Result<()> {
    self.update_broadcast().await?;
    for job_id in mem::take(&mut self.finished_jobs) {
      self.complete_job(job_id).await?;
    }
    Ok(())
  }

  /// Removes a finished job from its pipeline's frontier and dispatches its
  /// successors. A job id that is not in flight only costs an unsubscribe.
  #[instrument(level = "trace", skip(self))]
  async fn complete_job(&mut self, job_id: JobId) -> Result<()> {
    let topic = Topic::JobFinished(job_id.clone());
    let Some(assignment) = self.correlator.remove(&job_id) else {
      debug!(job_id = %job_id, "ignoring completion of unknown job");
      return self.broadcast.unsubscribe(&topic).await;
    };
    self.broadcast.unsubscribe(&topic).await?;

    // The run leaves the registry while its frontier is rebuilt, so the registry
    // never holds an empty frontier.
    let Some(mut run) = self.registry.remove(&assignment.pipeline_id) else {
      warn!(job_id = %job_id, pipeline_id = %assignment.pipeline_id, "finished job has no running pipeline");
      return Ok(());
    };
    run.complete_job(&job_id);
    info!(job_id = %job_id, pipeline_id = %assignment.pipeline_id, "job finished");

    let graph = Arc::clone(run.graph());
    for (node, worker) in graph.successor_nodes(assignment.node) {
      debug!(worker = worker.name(), "dispatching successor");
      if let Some(next_job) = self.dispatch(worker.name(), assignment.successor(node)).await? {
        run.add_job(next_job, node);
      }
    }

    if run.is_finished() {
      self.finish_pipeline(run).await
    } else {
      self.registry.insert(run);
      Ok(())
    }
  }

  /// Reports a completed pipeline, then claims whatever became available meanwhile.
  async fn finish_pipeline(&mut self, run: PipelineRun) -> Result<()> {
    let duration = run.elapsed_secs(self.clock.now());
    info!(pipeline_id = %run.pipeline_id(), duration, "finished pipeline");
    let ack = self
      .router
      .request(&RouterRequest::PipelineFinished {
        pipeline_id: run.pipeline_id().clone(),
        duration,
      })
      .await?;
    debug!(ack = %ack, "pipeline finished acknowledged");
    self.claim_pipelines().await?;
    Ok(())
  }
}
