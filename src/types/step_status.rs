//! Outcome of visiting one node during a resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of visiting one node during a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
  /// `process` ran and its values were returned.
  Computed,
  /// The requested output was served from its cache.
  Cached,
  /// `process` ran and failed.
  Failed,
  /// `process` never ran: an upstream failed, or the context was cancelled before it could.
  Skipped,
  /// `process` was started but the context was cancelled first; no result was kept.
  Discarded,
}

impl fmt::Display for StepStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StepStatus::Computed => write!(f, "computed"),
      StepStatus::Cached => write!(f, "cached"),
      StepStatus::Failed => write!(f, "failed"),
      StepStatus::Skipped => write!(f, "skipped"),
      StepStatus::Discarded => write!(f, "discarded"),
    }
  }
}
