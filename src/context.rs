//! Resolution context: per-request memo, cancellation token and execution log.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use futures::channel::oneshot;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::error::ResolveError;
use crate::types::{ExecutionLog, ExecutionStep, NodeId, StepStatus};

/// Settled result of one node: one value per output tether.
pub(crate) type NodeResult = Result<Rc<[Value]>, ResolveError>;

enum MemoEntry {
  /// Being computed; waiters are woken with the result.
  InFlight(Vec<oneshot::Sender<NodeResult>>),
  Settled(NodeResult),
}

/// What a resolver should do about a node it wants.
pub(crate) enum Claim {
  /// The caller now owns the computation and must settle or abandon it.
  Owner,
  /// Another branch is computing it; await the receiver.
  Wait(oneshot::Receiver<NodeResult>),
  Settled(NodeResult),
}

/// Bookkeeping for one top-level value request.
///
/// Guarantees every node's `process` runs at most once per context, even when several
/// branches reach it. Reuse a context across requests to share that memo.
pub struct ResolutionContext {
  id: Uuid,
  epoch: u64,
  started_at: DateTime<Utc>,
  cancel: CancellationToken,
  memo: RefCell<HashMap<NodeId, MemoEntry>>,
  steps: RefCell<Vec<ExecutionStep>>,
}

impl ResolutionContext {
  pub(crate) fn new(epoch: u64) -> Self {
    Self {
      id: Uuid::new_v4(),
      epoch,
      started_at: Utc::now(),
      cancel: CancellationToken::new(),
      memo: RefCell::new(HashMap::new()),
      steps: RefCell::new(Vec::new()),
    }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  /// Graph epoch when the context was opened.
  pub fn epoch(&self) -> u64 {
    self.epoch
  }

  /// Token that cancels this context. Safe to hand to other tasks.
  pub fn cancellation_token(&self) -> CancellationToken {
    self.cancel.clone()
  }

  pub fn cancel(&self) {
    self.cancel.cancel();
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancel.is_cancelled()
  }

  /// Number of times `process` was invoked for `node` in this context.
  pub fn executions(&self, node: &str) -> usize {
    self
      .steps
      .borrow()
      .iter()
      .filter(|s| s.node.as_str() == node)
      .filter(|s| {
        matches!(
          s.status,
          StepStatus::Computed | StepStatus::Failed | StepStatus::Discarded
        )
      })
      .count()
  }

  pub fn execution_log(&self) -> ExecutionLog {
    ExecutionLog {
      context_id: self.id,
      epoch: self.epoch,
      started_at: self.started_at,
      steps: self.steps.borrow().clone(),
    }
  }

  pub(crate) fn record(&self, node: &NodeId, status: StepStatus, message: Option<String>) {
    let mut steps = self.steps.borrow_mut();
    let step = steps.len() as u64 + 1;
    debug!(context = %self.id, node = %node, %status, step, "step");
    steps.push(ExecutionStep {
      step,
      node: node.clone(),
      status,
      message,
      at: Utc::now(),
    });
  }

  pub(crate) fn claim(&self, node: &NodeId) -> Claim {
    match self.memo.borrow_mut().entry(node.clone()) {
      Entry::Occupied(mut entry) => match entry.get_mut() {
        MemoEntry::Settled(result) => Claim::Settled(result.clone()),
        MemoEntry::InFlight(waiters) => {
          let (tx, rx) = oneshot::channel();
          waiters.push(tx);
          Claim::Wait(rx)
        }
      },
      Entry::Vacant(entry) => {
        entry.insert(MemoEntry::InFlight(Vec::new()));
        Claim::Owner
      }
    }
  }

  pub(crate) fn settle(&self, node: &NodeId, result: NodeResult) {
    let previous = self
      .memo
      .borrow_mut()
      .insert(node.clone(), MemoEntry::Settled(result.clone()));
    if let Some(MemoEntry::InFlight(waiters)) = previous {
      for tx in waiters {
        let _ = tx.send(result.clone());
      }
    }
  }

  /// Drops an unsettled claim. Waiters see their channel close and retry.
  pub(crate) fn abandon(&self, node: &NodeId) {
    let mut memo = self.memo.borrow_mut();
    if matches!(memo.get(node), Some(MemoEntry::InFlight(_))) {
      memo.remove(node);
    }
  }
}

impl std::fmt::Debug for ResolutionContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ResolutionContext")
      .field("id", &self.id)
      .field("epoch", &self.epoch)
      .field("cancelled", &self.is_cancelled())
      .finish_non_exhaustive()
  }
}
