//! Tests for `WorkerDefinition`.

use serde_json::json;

use super::WorkerDefinition;
use crate::error::GraphError;

#[test]
fn parses_nested_definition_in_order() {
  let def = WorkerDefinition::from_json(&json!({
    "name": "A",
    "after": [{"name": "B"}, {"name": "C", "after": [{"name": "D"}]}]
  }))
  .expect("definition");
  assert_eq!(
    def,
    WorkerDefinition::new(
      "A",
      vec![
        WorkerDefinition::leaf("B"),
        WorkerDefinition::new("C", vec![WorkerDefinition::leaf("D")]),
      ]
    )
  );
}

#[test]
fn missing_after_means_leaf() {
  let def = WorkerDefinition::from_json(&json!({"name": "only"})).expect("definition");
  assert!(def.after.is_empty());
}

#[test]
fn unknown_keys_are_ignored() {
  let def = WorkerDefinition::from_json(&json!({"name": "A", "data": {"x": 1}})).expect("def");
  assert_eq!(def.name, "A");
}

#[test]
fn missing_name_is_malformed() {
  let err = WorkerDefinition::from_json(&json!({"after": []})).unwrap_err();
  assert!(matches!(err, GraphError::Malformed(_)));
}

#[test]
fn non_array_after_is_malformed() {
  let err = WorkerDefinition::from_json(&json!({"name": "A", "after": "B"})).unwrap_err();
  assert!(matches!(err, GraphError::Malformed(_)));
}

#[test]
fn non_object_is_malformed() {
  let err = WorkerDefinition::from_json(&json!("A")).unwrap_err();
  assert!(matches!(err, GraphError::Malformed(_)));
}

#[test]
fn empty_name_deep_in_tree_is_rejected() {
  let err = WorkerDefinition::from_json(&json!({
    "name": "A",
    "after": [{"name": "B", "after": [{"name": "  "}]}]
  }))
  .unwrap_err();
  assert_eq!(err, GraphError::EmptyName);
}
