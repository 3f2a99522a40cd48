//! DTOs for execution logs: one entry per node visited by a resolution context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{NodeId, StepStatus};

/// One recorded node visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
  /// 1-based step index within the context.
  pub step: u64,
  pub node: NodeId,
  pub status: StepStatus,
  /// Failure or discard reason.
  pub message: Option<String>,
  pub at: DateTime<Utc>,
}

/// All node visits of one resolution context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLog {
  pub context_id: Uuid,
  /// Graph epoch when the context was created.
  pub epoch: u64,
  pub started_at: DateTime<Utc>,
  pub steps: Vec<ExecutionStep>,
}

impl ExecutionLog {
  /// Number of steps for `node` with the given status.
  pub fn count(&self, node: &str, status: StepStatus) -> usize {
    self
      .steps
      .iter()
      .filter(|s| s.node.as_str() == node && s.status == status)
      .count()
  }
}
