//! Document runner: compile a graph document and resolve outputs in one shared context.
//!
//! - [run_graph]: resolve outputs of an already built graph.
//! - [run_document]: compile a document then run it, optionally writing the execution log.

use std::path::PathBuf;

use futures::future::join_all;
use serde_json::Value;
use tracing::{info, instrument};

use crate::compiler::compile_graph_document;
use crate::error::RunError;
use crate::execution_log_io::write_execution_log;
use crate::graph::Graph;
use crate::registry::NodeRegistry;
use crate::types::{ExecutionLog, GraphDocument, TetherRef};

/// Options for [run_document].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  /// Outputs to resolve. When empty, every output that feeds no input is resolved.
  pub outputs: Vec<TetherRef>,
  /// If set, the execution log is written here, whether or not resolution succeeded.
  pub execution_log_path: Option<PathBuf>,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
  /// Resolved values in request order.
  pub values: Vec<(TetherRef, Value)>,
  pub log: ExecutionLog,
}

impl RunReport {
  pub fn value(&self, output: &TetherRef) -> Option<&Value> {
    self
      .values
      .iter()
      .find(|(r, _)| r == output)
      .map(|(_, v)| v)
  }
}

/// Resolves `outputs` (or all sink outputs) of `graph` in one resolution context.
///
/// Returns the log alongside the result so callers can persist it on failure too.
#[instrument(level = "trace", skip(graph, outputs))]
pub async fn run_graph(
  graph: &Graph,
  outputs: &[TetherRef],
) -> (Result<Vec<(TetherRef, Value)>, RunError>, ExecutionLog) {
  let requested: Vec<TetherRef> = if outputs.is_empty() {
    graph.sink_outputs()
  } else {
    outputs.to_vec()
  };
  let ctx = graph.context();
  let results = join_all(requested.iter().map(|r| graph.resolve_in(&ctx, r))).await;
  let mut values = Vec::with_capacity(requested.len());
  for (tether, result) in requested.into_iter().zip(results) {
    match result {
      Ok(value) => values.push((tether, value)),
      Err(source) => return (Err(RunError::Resolve { tether, source }), ctx.execution_log()),
    }
  }
  (Ok(values), ctx.execution_log())
}

/// Compiles `doc` with `registry` and resolves the requested outputs.
#[instrument(level = "trace", skip(doc, registry, options))]
pub async fn run_document(
  doc: &GraphDocument,
  registry: &NodeRegistry,
  options: RunOptions,
) -> Result<RunReport, RunError> {
  let graph = compile_graph_document(doc, registry)?;
  let (result, log) = run_graph(&graph, &options.outputs).await;
  if let Some(path) = &options.execution_log_path {
    write_execution_log(path, &log)?;
  }
  let values = result?;
  info!(outputs = values.len(), steps = log.steps.len(), "run completed");
  Ok(RunReport { values, log })
}
