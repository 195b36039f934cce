//! Nested worker definition as sent by the router inside a claimed pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;

/// One worker of a pipeline definition and the workers that run after it.
///
/// Wire form: `{"name": "tokenizer", "after": [{"name": "pos"}]}`. Keys other than
/// `name` and `after` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDefinition {
  pub name: String,
  #[serde(default)]
  pub after: Vec<WorkerDefinition>,
}

impl WorkerDefinition {
  pub fn new(name: impl Into<String>, after: Vec<WorkerDefinition>) -> Self {
    Self {
      name: name.into(),
      after,
    }
  }

  pub fn leaf(name: impl Into<String>) -> Self {
    Self::new(name, vec![])
  }

  /// Parses and validates the `workers` value of a claim reply.
  pub fn from_json(value: &Value) -> Result<Self, GraphError> {
    let definition =
      WorkerDefinition::deserialize(value).map_err(|e| GraphError::Malformed(e.to_string()))?;
    definition.validate()?;
    Ok(definition)
  }

  /// Every node in the tree must carry a non-empty name.
  fn validate(&self) -> Result<(), GraphError> {
    let mut stack = vec![self];
    while let Some(def) = stack.pop() {
      if def.name.trim().is_empty() {
        return Err(GraphError::EmptyName);
      }
      stack.extend(def.after.iter());
    }
    Ok(())
  }
}
