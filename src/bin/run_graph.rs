//! CLI: resolve outputs of a tether graph document.
//!
//! Usage: `run_graph [OPTIONS] <document.json>`
//! Example: run_graph --output b.out tests/integration/doubling.json
//!
//! Prints the resolved values as a JSON object keyed by `node.tether`. Logs go to stderr;
//! set RUST_LOG=tether_graph=trace for span and step events.

use std::env;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde_json::{Map, Value};
use tether_graph::document_io::load_document;
use tether_graph::{NodeRegistry, RunOptions, TetherRef, UnresolvedPolicy, run_document};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding `--execution-log`.
const EXECUTION_LOG_ENV: &str = "TETHER_EXECUTION_LOG";

/// Resolve outputs of a tether graph document.
#[derive(Parser, Debug)]
#[command(name = "run_graph")]
#[command(after_help = r#"Environment variables:
  TETHER_EXECUTION_LOG   Write the execution log here (overrides --execution-log).
  RUST_LOG               Log filter (default: info).

Examples:
  run_graph doubling.json
  run_graph --output b.out --execution-log run/execution.log.json doubling.json"#)]
struct Args {
  /// Output tether to resolve, as node.tether. Repeatable. Default: every sink output.
  #[arg(long = "output", short = 'o', value_name = "NODE.TETHER")]
  outputs: Vec<TetherRef>,

  /// Write the execution log (JSON) to this path. Overridden by TETHER_EXECUTION_LOG if set.
  #[arg(long, value_name = "PATH")]
  execution_log: Option<PathBuf>,

  /// Fail on unconnected inputs without a fallback instead of passing an absent value.
  #[arg(long)]
  fail_unresolved: bool,

  /// Path to the graph document
  #[arg(value_name = "document.json")]
  document: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let execution_log_path = env::var(EXECUTION_LOG_ENV)
    .ok()
    .map(PathBuf::from)
    .or(args.execution_log);
  info!(
    document = %args.document.display(),
    execution_log = ?execution_log_path,
    "run_graph starting"
  );

  let mut doc = match load_document(&args.document) {
    Ok(d) => d,
    Err(e) => {
      eprintln!("Error reading {}: {}", args.document.display(), e);
      process::exit(1);
    }
  };
  if args.fail_unresolved {
    doc.options.unresolved_input = UnresolvedPolicy::Fail;
  }

  let options = RunOptions {
    outputs: args.outputs,
    execution_log_path,
  };
  let report = match run_document(&doc, &NodeRegistry::with_builtins(), options).await {
    Ok(r) => r,
    Err(e) => {
      eprintln!("Run error: {}", e);
      process::exit(1);
    }
  };

  let values: Map<String, Value> = report
    .values
    .into_iter()
    .map(|(tether, value)| (tether.to_string(), value))
    .collect();
  match serde_json::to_string_pretty(&values) {
    Ok(json) => println!("{}", json),
    Err(e) => {
      eprintln!("Error encoding values: {}", e);
      process::exit(1);
    }
  }
}
