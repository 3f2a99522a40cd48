//! # tether-graph
//!
//! Asynchronous dataflow execution engine for OUTLINE node plugins.
//!
//! ## Architecture
//!
//! - [types]: node ids, input/output tethers, nodes and their `process` computations.
//! - [graph]: node set and edge table; rejects cycles and propagates invalidation downstream.
//! - `resolver` (internal): depth-first, memoizing resolution of output tethers inside a
//!   [ResolutionContext], running each node's `process` at most once per context.
//! - [registry] and [nodes]: node kinds registered by name, plus the built-in kinds.
//! - [compiler] and [runner]: build a graph from a host [GraphDocument] and resolve its outputs.
//!
//! Resolution futures are `!Send`; drive them on a current-thread runtime or a `LocalSet`.

pub mod compiler;
pub mod context;
#[cfg(test)]
mod context_test;
pub mod document_io;
pub mod error;
pub mod execution_log_io;
pub mod graph;
pub mod nodes;
pub mod registry;
mod resolver;
pub mod runner;
pub mod types;

pub use compiler::compile_graph_document;
pub use context::ResolutionContext;
pub use error::{CompileError, GraphError, ProcessError, RegistryError, ResolveError, RunError};
pub use graph::Graph;
pub use registry::NodeRegistry;
pub use runner::{RunOptions, RunReport, run_document, run_graph};
pub use types::{
  GraphDocument, GraphOptions, Node, NodeId, NodeInputs, Process, TetherRef, UnresolvedPolicy,
  process_fn,
};
