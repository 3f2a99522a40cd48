//! Host-owned graph document: node instances plus wiring, as stored in the project.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GraphOptions, NodeId, TetherRef};

/// One node instance in a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
  pub id: NodeId,
  /// Registered node kind.
  pub kind: String,
  /// Raw configuration passed through to the node untouched.
  #[serde(default)]
  pub config: Value,
}

/// One edge in a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntry {
  pub from: TetherRef,
  pub to: TetherRef,
}

/// A graph as stored by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
  #[serde(default)]
  pub options: GraphOptions,
  #[serde(default)]
  pub nodes: Vec<NodeEntry>,
  #[serde(default)]
  pub edges: Vec<EdgeEntry>,
}
