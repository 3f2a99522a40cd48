//! Engine-wide options.

use serde::{Deserialize, Serialize};

/// What an unconnected input without a fallback resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
  /// Hand `process` an absent value (`None`).
  #[default]
  Absent,
  /// Fail the resolution with `UnresolvedInput`.
  Fail,
}

/// Options for a [crate::Graph].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
  pub unresolved_input: UnresolvedPolicy,
}
