//! Tests for `WorkerGraph`.

use proptest::prelude::*;
use serde_json::json;

use super::{WorkerDefinition, WorkerGraph};
use crate::error::GraphError;

fn names(graph: &WorkerGraph, idx: &[super::NodeIndex]) -> Vec<String> {
  idx
    .iter()
    .map(|i| graph.node(*i).expect("node").name().to_string())
    .collect()
}

#[test]
fn builds_root_with_ordered_successors() {
  let graph = WorkerGraph::from_json(&json!({
    "name": "A",
    "after": [{"name": "B"}, {"name": "C", "after": [{"name": "D"}]}]
  }))
  .expect("graph");

  assert_eq!(graph.len(), 4);
  let root = graph.root();
  assert_eq!(graph.node(root).expect("root").name(), "A");
  assert_eq!(names(&graph, graph.successors(root)), vec!["B", "C"]);

  let c = graph.successors(root)[1];
  assert_eq!(names(&graph, graph.successors(c)), vec!["D"]);
  let b = graph.successors(root)[0];
  assert!(graph.node(b).expect("b").is_leaf());
}

#[test]
fn successor_nodes_pair_indexes_with_nodes() {
  let graph = WorkerGraph::build(&WorkerDefinition::new(
    "A",
    vec![WorkerDefinition::leaf("B"), WorkerDefinition::leaf("C")],
  ));
  assert_eq!(graph.root_node().name(), "A");
  let pairs: Vec<_> = graph
    .successor_nodes(graph.root())
    .map(|(i, n)| (i, n.name().to_string()))
    .collect();
  assert_eq!(pairs.len(), 2);
  assert_eq!(pairs[0].1, "B");
  assert_eq!(pairs[1].1, "C");
  assert_eq!(pairs[0].0, graph.successors(graph.root())[0]);
}

#[test]
fn single_worker_graph_is_a_leaf_root() {
  let graph = WorkerGraph::build(&WorkerDefinition::leaf("solo"));
  assert_eq!(graph.len(), 1);
  assert!(!graph.is_empty());
  assert!(graph.successors(graph.root()).is_empty());
}

#[test]
fn reconverging_names_are_separate_nodes() {
  // No join semantics: a worker listed under two parents appears twice.
  let graph = WorkerGraph::build(&WorkerDefinition::new(
    "A",
    vec![
      WorkerDefinition::new("B", vec![WorkerDefinition::leaf("Z")]),
      WorkerDefinition::new("C", vec![WorkerDefinition::leaf("Z")]),
    ],
  ));
  let zs = graph.nodes().filter(|(_, n)| n.name() == "Z").count();
  assert_eq!(zs, 2);
}

#[test]
fn successors_of_foreign_index_is_empty() {
  let small = WorkerGraph::build(&WorkerDefinition::leaf("a"));
  let big = WorkerGraph::build(&WorkerDefinition::new(
    "a",
    vec![WorkerDefinition::leaf("b")],
  ));
  let (b_idx, _) = big.nodes().nth(1).expect("b");
  assert!(small.successors(b_idx).is_empty());
  assert!(small.node(b_idx).is_none());
}

#[test]
fn malformed_definition_is_an_error() {
  let err = WorkerGraph::from_json(&json!({"workers": []})).unwrap_err();
  assert!(matches!(err, GraphError::Malformed(_)));
}

fn definition_strategy() -> impl Strategy<Value = WorkerDefinition> {
  let leaf = "[a-z]{1,8}".prop_map(WorkerDefinition::leaf);
  leaf.prop_recursive(4, 32, 4, |inner| {
    ("[a-z]{1,8}", prop::collection::vec(inner, 0..4))
      .prop_map(|(name, after)| WorkerDefinition::new(name, after))
  })
}

fn count(def: &WorkerDefinition) -> usize {
  1 + def.after.iter().map(count).sum::<usize>()
}

proptest! {
  #[test]
  fn every_definition_node_becomes_one_graph_node(def in definition_strategy()) {
    let graph = WorkerGraph::build(&def);
    prop_assert_eq!(graph.len(), count(&def));
    let edges: usize = graph.nodes().map(|(_, n)| n.successors().len()).sum();
    prop_assert_eq!(edges, graph.len() - 1);
  }
}
