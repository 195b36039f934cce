//! Immutable worker graph, stored as an arena with index-based successor edges.
//!
//! A graph is a template: it carries no pipeline id and no payload, so one graph can
//! back several runs. Run-scoped values live in [super::WorkerAssignment].

use serde_json::Value;

use super::WorkerDefinition;
use crate::error::GraphError;

/// Position of a node inside its [WorkerGraph].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
  pub fn index(self) -> usize {
    self.0
  }
}

/// One worker of the graph: the job kind to run and the workers that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerNode {
  name: String,
  successors: Vec<NodeIndex>,
}

impl WorkerNode {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn successors(&self) -> &[NodeIndex] {
    &self.successors
  }

  pub fn is_leaf(&self) -> bool {
    self.successors.is_empty()
  }
}

/// Job graph of one pipeline definition. The root is always [WorkerGraph::ROOT] and
/// every successor index points into the same graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerGraph {
  nodes: Vec<WorkerNode>,
}

impl WorkerGraph {
  pub const ROOT: NodeIndex = NodeIndex(0);

  /// Flattens the whole definition eagerly, in pre-order, keeping successor order.
  pub fn build(definition: &WorkerDefinition) -> Self {
    let mut nodes = Vec::new();
    push_node(&mut nodes, definition);
    Self { nodes }
  }

  /// Parses the `workers` value of a claim reply and builds the graph.
  pub fn from_json(value: &Value) -> Result<Self, GraphError> {
    WorkerDefinition::from_json(value).map(|def| Self::build(&def))
  }

  pub fn root(&self) -> NodeIndex {
    Self::ROOT
  }

  pub fn root_node(&self) -> &WorkerNode {
    &self.nodes[Self::ROOT.0]
  }

  pub fn node(&self, index: NodeIndex) -> Option<&WorkerNode> {
    self.nodes.get(index.0)
  }

  /// Successors of `index`; empty for leaves and for indexes outside this graph.
  pub fn successors(&self, index: NodeIndex) -> &[NodeIndex] {
    self.node(index).map(WorkerNode::successors).unwrap_or(&[])
  }

  /// Successors of `index` with their nodes, in definition order.
  pub fn successor_nodes(
    &self,
    index: NodeIndex,
  ) -> impl Iterator<Item = (NodeIndex, &WorkerNode)> + '_ {
    self
      .successors(index)
      .iter()
      .map(|s| (*s, &self.nodes[s.0]))
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &WorkerNode)> {
    self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
  }
}

fn push_node(nodes: &mut Vec<WorkerNode>, definition: &WorkerDefinition) -> NodeIndex {
  let index = NodeIndex(nodes.len());
  nodes.push(WorkerNode {
    name: definition.name.clone(),
    successors: Vec::with_capacity(definition.after.len()),
  });
  let successors: Vec<NodeIndex> = definition
    .after
    .iter()
    .map(|child| push_node(nodes, child))
    .collect();
  nodes[index.0].successors = successors;
  index
}
