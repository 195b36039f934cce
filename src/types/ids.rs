//! Identifiers handed out by the router.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reads an identifier that the router may send as a string or a number.
fn id_from_json(value: &Value) -> Option<String> {
  match value {
    Value::String(s) if !s.is_empty() => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

/// Identifier of one pipeline run, assigned by the router at claim time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineId(String);

impl PipelineId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  /// Accepts a non-empty JSON string or a JSON number.
  pub fn from_json(value: &Value) -> Option<Self> {
    id_from_json(value).map(Self)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for PipelineId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Identifier of one dispatched job, assigned by the router in reply to `add job`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  /// Accepts a non-empty JSON string or a JSON number.
  pub fn from_json(value: &Value) -> Option<Self> {
    id_from_json(value).map(Self)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for JobId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
