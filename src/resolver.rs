//! Depth-first, memoizing resolution of output tethers.
//!
//! Each upstream dependency is awaited through a boxed local future, so a slow node only
//! suspends its own branch; sibling inputs keep making progress on the same thread. Every
//! suspension also races the context's cancellation token.

use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::context::{Claim, NodeResult, ResolutionContext};
use crate::error::ResolveError;
use crate::graph::Graph;
use crate::types::{InputTether, Node, NodeId, NodeInputs, StepStatus, TetherRef, UnresolvedPolicy};

/// Ancestors of the node currently being resolved.
pub(crate) struct PathLink {
  node: NodeId,
  parent: Path,
}

pub(crate) type Path = Option<Rc<PathLink>>;

/// `path` with `node` pushed as the innermost ancestor.
pub(crate) fn extend(path: &Path, node: &NodeId) -> Path {
  Some(Rc::new(PathLink {
    node: node.clone(),
    parent: path.clone(),
  }))
}

fn on_path(path: &Path, id: &NodeId) -> bool {
  let mut cursor = path.as_deref();
  while let Some(link) = cursor {
    if &link.node == id {
      return true;
    }
    cursor = link.parent.as_deref();
  }
  false
}

/// Awaits `fut` unless the context is cancelled first. Returns `None` on cancellation, dropping
/// `fut` at its current suspension point.
async fn unless_cancelled<F: Future>(ctx: &ResolutionContext, fut: F) -> Option<F::Output> {
  let token = ctx.cancellation_token();
  tokio::select! {
    biased;
    _ = token.cancelled() => None,
    output = fut => Some(output),
  }
}

/// Resolves one output tether: cache first, then the owning node.
pub(crate) fn resolve_output<'g>(
  graph: &'g Graph,
  ctx: &'g ResolutionContext,
  output: TetherRef,
  path: Path,
) -> LocalBoxFuture<'g, Result<Value, ResolveError>> {
  async move {
    let node = graph
      .node(output.node.as_str())
      .ok_or_else(|| ResolveError::UnknownNode(output.node.clone()))?;
    let index = node
      .output_index(&output.tether)
      .ok_or_else(|| ResolveError::UnknownOutput {
        node: output.node.clone(),
        tether: output.tether.clone(),
      })?;
    if let Some(value) = node.outputs()[index].cached() {
      debug!(output = %output, "cache hit");
      ctx.record(node.id(), StepStatus::Cached, None);
      return Ok(value);
    }
    trace!(output = %output, "cache miss");
    let values = resolve_node(graph, ctx, node, path).await?;
    Ok(values[index].clone())
  }
  .boxed_local()
}

/// Releases an unsettled claim if the owning future is dropped midway.
struct ClaimGuard<'a> {
  ctx: &'a ResolutionContext,
  node: &'a NodeId,
  settled: bool,
}

impl ClaimGuard<'_> {
  fn settle(mut self, result: NodeResult) {
    self.ctx.settle(self.node, result);
    self.settled = true;
  }
}

impl Drop for ClaimGuard<'_> {
  fn drop(&mut self) {
    if !self.settled {
      self.ctx.abandon(self.node);
    }
  }
}

/// Produces all output values of `node`, computing at most once per context.
async fn resolve_node<'g>(
  graph: &'g Graph,
  ctx: &'g ResolutionContext,
  node: &'g Node,
  path: Path,
) -> NodeResult {
  if on_path(&path, node.id()) {
    return Err(ResolveError::Cycle(node.id().clone()));
  }
  loop {
    match ctx.claim(node.id()) {
      Claim::Settled(result) => return result,
      Claim::Wait(rx) => match unless_cancelled(ctx, rx).await {
        None => return Err(ResolveError::Cancelled),
        Some(Ok(result)) => return result,
        // Owner was dropped before settling; try to claim it ourselves.
        Some(Err(_)) => continue,
      },
      Claim::Owner => break,
    }
  }
  let guard = ClaimGuard {
    ctx,
    node: node.id(),
    settled: false,
  };
  let result = compute(graph, ctx, node, path).await;
  guard.settle(result.clone());
  result
}

async fn compute<'g>(
  graph: &'g Graph,
  ctx: &'g ResolutionContext,
  node: &'g Node,
  path: Path,
) -> NodeResult {
  let id = node.id();
  if ctx.is_cancelled() {
    ctx.record(id, StepStatus::Skipped, Some("cancelled before start".to_string()));
    return Err(ResolveError::Cancelled);
  }
  // Captured before any await so invalidations landing mid-flight are detected.
  let epochs: Vec<u64> = node.outputs().iter().map(|o| o.epoch()).collect();
  let path = extend(&path, id);

  let pending = node
    .inputs()
    .iter()
    .map(|input| resolve_input(graph, ctx, node, input, path.clone()));
  let Some(resolved) = unless_cancelled(ctx, join_all(pending)).await else {
    ctx.record(id, StepStatus::Skipped, Some("cancelled while resolving inputs".to_string()));
    return Err(ResolveError::Cancelled);
  };

  let mut entries = Vec::with_capacity(resolved.len());
  for (input, result) in node.inputs().iter().zip(resolved) {
    match result {
      Ok(value) => entries.push((input.name().to_string(), value)),
      Err(e) => {
        let status = if e.origin() == Some(id) {
          StepStatus::Failed
        } else {
          StepStatus::Skipped
        };
        ctx.record(id, status, Some(e.to_string()));
        return Err(e);
      }
    }
  }

  debug!(node = %id, kind = node.kind(), inputs = entries.len(), "invoking process");
  let processing = node
    .processor()
    .process(NodeInputs::new(entries), node.config());
  let outcome = match unless_cancelled(ctx, processing).await {
    Some(outcome) if !ctx.is_cancelled() => outcome,
    _ => {
      warn!(node = %id, "context cancelled while processing; result discarded");
      ctx.record(id, StepStatus::Discarded, Some("cancelled".to_string()));
      return Err(ResolveError::Cancelled);
    }
  };

  let values = match outcome {
    Ok(values) if values.len() == node.outputs().len() => values,
    Ok(values) => {
      let message = format!(
        "process produced {} value(s) for {} output(s)",
        values.len(),
        node.outputs().len()
      );
      ctx.record(id, StepStatus::Failed, Some(message.clone()));
      return Err(ResolveError::Process {
        node: id.clone(),
        message,
      });
    }
    Err(e) => {
      ctx.record(id, StepStatus::Failed, Some(e.to_string()));
      return Err(ResolveError::Process {
        node: id.clone(),
        message: e.message().to_string(),
      });
    }
  };

  for ((output, value), epoch) in node.outputs().iter().zip(&values).zip(epochs) {
    if !output.store(value.clone(), epoch) {
      warn!(node = %id, output = output.name(), "invalidated while processing; not cached");
    }
  }
  ctx.record(id, StepStatus::Computed, None);
  Ok(values.into())
}

async fn resolve_input<'g>(
  graph: &'g Graph,
  ctx: &'g ResolutionContext,
  node: &'g Node,
  input: &'g InputTether,
  path: Path,
) -> Result<Option<Value>, ResolveError> {
  let target = TetherRef::new(node.id().clone(), input.name());
  match graph.source_of(&target) {
    Some(source) => resolve_output(graph, ctx, source.clone(), path)
      .await
      .map(Some),
    None => fallback(graph, node, input),
  }
}

fn fallback(
  graph: &Graph,
  node: &Node,
  input: &InputTether,
) -> Result<Option<Value>, ResolveError> {
  if let Some(value) = input.fallback() {
    return Ok(Some(value.clone()));
  }
  match graph.options().unresolved_input {
    UnresolvedPolicy::Absent => Ok(None),
    UnresolvedPolicy::Fail => Err(ResolveError::UnresolvedInput {
      node: node.id().clone(),
      input: input.name().to_string(),
    }),
  }
}
