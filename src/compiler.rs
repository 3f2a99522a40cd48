//! Compile a host [GraphDocument] into a live [Graph].
//!
//! Nodes are instantiated through a [NodeRegistry] in document order, then edges are wired
//! in document order. Any failure aborts the whole compilation.

use tracing::{info, instrument};

use crate::error::CompileError;
use crate::graph::Graph;
use crate::registry::NodeRegistry;
use crate::types::GraphDocument;

/// Builds a graph from `doc`, using `registry` to instantiate every node.
#[instrument(level = "trace", skip(doc, registry))]
pub fn compile_graph_document(
  doc: &GraphDocument,
  registry: &NodeRegistry,
) -> Result<Graph, CompileError> {
  info!("compiling graph document");
  let mut graph = Graph::with_options(doc.options);

  for entry in &doc.nodes {
    let node = registry.create(&entry.kind, &entry.id, &entry.config)?;
    graph.add_node(node)?;
  }

  for edge in &doc.edges {
    graph.connect(&edge.from, &edge.to)?;
  }

  info!(
    node_count = doc.nodes.len(),
    edge_count = doc.edges.len(),
    "compilation complete"
  );
  Ok(graph)
}
