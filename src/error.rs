//! Error taxonomy for topology changes, resolution, node registration and document compilation.

use crate::types::{NodeId, TetherKind, TetherRef};
use thiserror::Error;

/// Errors raised by structural graph operations. Returned before any mutation happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  #[error("node '{0}' already exists in the graph")]
  DuplicateNode(NodeId),
  #[error("node '{0}' not found")]
  UnknownNode(NodeId),
  #[error("node '{node}' has no tether named '{tether}'")]
  UnknownTether { node: NodeId, tether: String },
  #[error("tether '{tether}' is an {actual} tether, expected {expected}")]
  TetherKind {
    tether: TetherRef,
    expected: TetherKind,
    actual: TetherKind,
  },
  #[error("node '{node}' declares tether '{tether}' more than once")]
  DuplicateTether { node: NodeId, tether: String },
  #[error("connecting {from} -> {to} would create a cycle")]
  Cycle { from: TetherRef, to: TetherRef },
  #[error("node '{node}' still has {edges} connected edge(s)")]
  NodeInUse { node: NodeId, edges: usize },
}

/// Failure returned by a node's `process` computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProcessError {
  message: String,
}

impl ProcessError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

/// Errors surfaced to the requester of an output value.
///
/// Cloneable so one settled result can be handed to every dependent that shares it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  #[error("node '{0}' not found")]
  UnknownNode(NodeId),
  #[error("node '{node}' has no output tether named '{tether}'")]
  UnknownOutput { node: NodeId, tether: String },
  /// Re-entrant request for a node already being resolved on the same path.
  #[error("cycle detected while resolving node '{0}'")]
  Cycle(NodeId),
  #[error("input '{input}' of node '{node}' is not connected and has no fallback")]
  UnresolvedInput { node: NodeId, input: String },
  /// The node computation failed. `node` is the originating node, not the requester.
  #[error("node '{node}' failed: {message}")]
  Process { node: NodeId, message: String },
  #[error("resolution cancelled")]
  Cancelled,
}

impl ResolveError {
  /// Node that caused the failure, when there is one.
  pub fn origin(&self) -> Option<&NodeId> {
    match self {
      ResolveError::UnknownNode(node)
      | ResolveError::Cycle(node)
      | ResolveError::UnknownOutput { node, .. }
      | ResolveError::UnresolvedInput { node, .. }
      | ResolveError::Process { node, .. } => Some(node),
      ResolveError::Cancelled => None,
    }
  }
}

/// Errors raised while instantiating node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  #[error("no node kind registered under '{0}'")]
  UnknownKind(String),
  #[error("invalid config for '{kind}' node: {message}")]
  InvalidConfig { kind: String, message: String },
  #[error(transparent)]
  Graph(#[from] GraphError),
}

/// Errors raised while turning a graph document into a live graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
  #[error("invalid tether reference '{0}' (expected 'node.tether')")]
  InvalidTetherRef(String),
  #[error(transparent)]
  Registry(#[from] RegistryError),
  #[error(transparent)]
  Graph(#[from] GraphError),
}

/// Errors raised by [crate::runner::run_document].
#[derive(Debug, Error)]
pub enum RunError {
  #[error(transparent)]
  Compile(#[from] CompileError),
  #[error("failed to resolve {tether}: {source}")]
  Resolve {
    tether: TetherRef,
    #[source]
    source: ResolveError,
  },
  #[error("failed to write execution log: {0}")]
  Io(#[from] std::io::Error),
}
