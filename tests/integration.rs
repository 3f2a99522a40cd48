//! Integration tests that compile and run the graph documents in tests/integration/ through
//! the public library API.

use std::path::{Path, PathBuf};

use serde_json::json;
use tether_graph::document_io::{load_document, save_document};
use tether_graph::execution_log_io::load_execution_log;
use tether_graph::types::StepStatus;
use tether_graph::{
  CompileError, GraphDocument, GraphError, NodeRegistry, ResolveError, RunError, RunOptions,
  TetherRef, compile_graph_document, run_document,
};

fn integration_dir() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("integration")
}

fn fixture(name: &str) -> GraphDocument {
  load_document(&integration_dir().join(name)).unwrap()
}

fn r(s: &str) -> TetherRef {
  s.parse().unwrap()
}

#[tokio::test]
async fn doubling_document_resolves_its_sink() {
  let report = run_document(
    &fixture("doubling.json"),
    &NodeRegistry::with_builtins(),
    RunOptions::default(),
  )
  .await
  .unwrap();
  assert_eq!(report.values, vec![(r("b.out"), json!(10))]);
}

#[tokio::test]
async fn diamond_document_runs_the_shared_source_once() {
  let report = run_document(
    &fixture("diamond.json"),
    &NodeRegistry::with_builtins(),
    RunOptions::default(),
  )
  .await
  .unwrap();
  assert_eq!(report.value(&r("d.sum")), Some(&json!(10)));
  assert_eq!(report.log.count("a", StepStatus::Computed), 1);
  assert_eq!(report.log.count("d", StepStatus::Computed), 1);
}

#[tokio::test]
async fn edits_after_compilation_are_picked_up() {
  let graph = compile_graph_document(&fixture("doubling.json"), &NodeRegistry::with_builtins())
    .unwrap();
  assert_eq!(graph.resolve(&r("b.out")).await, Ok(json!(10)));
  assert_eq!(graph.resolve(&r("b.out")).await, Ok(json!(10)));

  graph
    .set_config(&"a".into(), json!({ "value": 7 }))
    .unwrap();
  assert_eq!(graph.cached(&r("b.out")), None);
  assert_eq!(graph.resolve(&r("b.out")).await, Ok(json!(14)));
}

#[tokio::test]
async fn failing_document_reports_origin_and_logs_skips() {
  let dir = tempfile::tempdir().unwrap();
  let log_path = dir.path().join("execution.log.json");
  let err = run_document(
    &fixture("failing.json"),
    &NodeRegistry::with_builtins(),
    RunOptions {
      outputs: vec![r("c.out")],
      execution_log_path: Some(log_path.clone()),
    },
  )
  .await
  .unwrap_err();
  match err {
    RunError::Resolve { source, .. } => {
      assert!(matches!(source, ResolveError::Process { ref node, .. } if node.as_str() == "a"));
    }
    other => panic!("expected a resolve error, got {other}"),
  }

  let log = load_execution_log(&log_path).unwrap();
  assert_eq!(log.count("a", StepStatus::Failed), 1);
  assert_eq!(log.count("b", StepStatus::Skipped), 1);
  assert_eq!(log.count("c", StepStatus::Skipped), 1);
}

#[test]
fn cycle_document_fails_to_compile() {
  let err = compile_graph_document(&fixture("cycle.json"), &NodeRegistry::with_builtins())
    .unwrap_err();
  assert!(matches!(err, CompileError::Graph(GraphError::Cycle { .. })));
}

#[tokio::test]
async fn unconnected_input_depends_on_policy() {
  let mut doc = fixture("unconnected.json");
  let registry = NodeRegistry::with_builtins();
  let report = run_document(&doc, &registry, RunOptions::default())
    .await
    .unwrap();
  assert_eq!(report.value(&r("lonely.out")), Some(&serde_json::Value::Null));

  doc.options.unresolved_input = tether_graph::UnresolvedPolicy::Fail;
  let err = run_document(&doc, &registry, RunOptions::default())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    RunError::Resolve {
      source: ResolveError::UnresolvedInput { .. },
      ..
    }
  ));
}

#[test]
fn documents_survive_a_save_load_cycle() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("diamond.json");
  let doc = fixture("diamond.json");
  save_document(&path, &doc).unwrap();
  assert_eq!(load_document(&path).unwrap(), doc);
}
