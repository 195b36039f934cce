//! Pipeline runner types: worker graphs, run state and the values that tag dispatched jobs.

mod admission_counter;
mod ids;
mod pipeline_run;
mod worker_assignment;
mod worker_definition;
#[cfg(test)]
mod worker_definition_test;
mod worker_graph;
#[cfg(test)]
mod worker_graph_test;

pub use admission_counter::AdmissionCounter;
pub use ids::{JobId, PipelineId};
pub use pipeline_run::PipelineRun;
pub use worker_assignment::WorkerAssignment;
pub use worker_definition::WorkerDefinition;
pub use worker_graph::{NodeIndex, WorkerGraph, WorkerNode};
