//! The dataflow graph: node set, edge table, cycle rejection and invalidation propagation.
//!
//! Topology calls take `&mut self`; resolution and invalidation take `&self`. The edge table
//! is therefore never touched while a resolution is borrowing the graph.

use std::cell::Cell;
use std::collections::{BTreeMap, HashSet, VecDeque};

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::context::ResolutionContext;
use crate::error::{GraphError, ResolveError};
use crate::resolver;
use crate::types::{Edge, GraphOptions, Node, NodeId, Tether, TetherKind, TetherRef};

/// Directed acyclic graph of nodes wired output → input.
#[derive(Debug, Default)]
pub struct Graph {
  nodes: BTreeMap<NodeId, Node>,
  /// Incoming edge per input tether, keyed by the input. An input has at most one source.
  edges: BTreeMap<TetherRef, TetherRef>,
  /// Advanced on every invalidation and topology change.
  epoch: Cell<u64>,
  options: GraphOptions,
}

impl Graph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_options(options: GraphOptions) -> Self {
    Self {
      options,
      ..Self::default()
    }
  }

  pub fn options(&self) -> &GraphOptions {
    &self.options
  }

  pub fn epoch(&self) -> u64 {
    self.epoch.get()
  }

  fn advance_epoch(&self) {
    self.epoch.set(self.epoch.get() + 1);
  }

  pub fn node(&self, id: &str) -> Option<&Node> {
    self.nodes.get(id)
  }

  pub fn nodes(&self) -> impl Iterator<Item = &Node> {
    self.nodes.values()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// All edges, ordered by destination input.
  pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
    self
      .edges
      .iter()
      .map(|(to, from)| Edge::new(from.clone(), to.clone()))
  }

  /// Outputs that feed no input, in node order. These are the graph's results.
  pub fn sink_outputs(&self) -> Vec<TetherRef> {
    let used: HashSet<&TetherRef> = self.edges.values().collect();
    self
      .nodes
      .values()
      .flat_map(|n| {
        n.outputs()
          .iter()
          .map(move |o| TetherRef::new(n.id().clone(), o.name()))
      })
      .filter(|r| !used.contains(r))
      .collect()
  }

  /// Upstream output feeding `input`, if connected.
  pub fn source_of(&self, input: &TetherRef) -> Option<&TetherRef> {
    self.edges.get(input)
  }

  /// Registers a node. Fails if a node with the same id exists.
  #[instrument(level = "trace", skip(self, node), fields(node = %node.id()))]
  pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
    if self.nodes.contains_key(node.id()) {
      return Err(GraphError::DuplicateNode(node.id().clone()));
    }
    info!(node = %node.id(), kind = node.kind(), "node added");
    self.nodes.insert(node.id().clone(), node);
    Ok(())
  }

  fn tether_of_kind(
    &self,
    tether: &TetherRef,
    expected: TetherKind,
  ) -> Result<Tether<'_>, GraphError> {
    let node = self
      .nodes
      .get(&tether.node)
      .ok_or_else(|| GraphError::UnknownNode(tether.node.clone()))?;
    let found = node
      .tether(&tether.tether)
      .ok_or_else(|| GraphError::UnknownTether {
        node: tether.node.clone(),
        tether: tether.tether.clone(),
      })?;
    if found.kind() != expected {
      return Err(GraphError::TetherKind {
        tether: tether.clone(),
        expected,
        actual: found.kind(),
      });
    }
    Ok(found)
  }

  /// Wires `from` (an output) into `to` (an input), replacing any edge already feeding `to`.
  ///
  /// Rejected with [GraphError::Cycle] when `to`'s node already reaches `from`'s node; the
  /// topology is left untouched on any error. Returns the replaced edge, if any.
  #[instrument(level = "trace", skip(self), fields(from = %from, to = %to))]
  pub fn connect(&mut self, from: &TetherRef, to: &TetherRef) -> Result<Option<Edge>, GraphError> {
    self.tether_of_kind(from, TetherKind::Output)?;
    self.tether_of_kind(to, TetherKind::Input)?;
    if self.reaches(&to.node, &from.node) {
      return Err(GraphError::Cycle {
        from: from.clone(),
        to: to.clone(),
      });
    }
    let replaced = self
      .edges
      .insert(to.clone(), from.clone())
      .map(|old| Edge::new(old, to.clone()));
    let invalidated = self.invalidate_from(&to.node);
    info!(from = %from, to = %to, invalidated, "connected");
    Ok(replaced)
  }

  /// Removes the edge feeding `input`. Returns it, or `None` if the input was unconnected.
  #[instrument(level = "trace", skip(self), fields(input = %input))]
  pub fn disconnect(&mut self, input: &TetherRef) -> Result<Option<Edge>, GraphError> {
    self.tether_of_kind(input, TetherKind::Input)?;
    let Some(from) = self.edges.remove(input) else {
      return Ok(None);
    };
    let invalidated = self.invalidate_from(&input.node);
    info!(from = %from, to = %input, invalidated, "disconnected");
    Ok(Some(Edge::new(from, input.clone())))
  }

  fn edges_touching(&self, id: &NodeId) -> Vec<TetherRef> {
    self
      .edges
      .iter()
      .filter(|(to, from)| &to.node == id || &from.node == id)
      .map(|(to, _)| to.clone())
      .collect()
  }

  /// Removes a node that has no edges. Fails with [GraphError::NodeInUse] otherwise.
  #[instrument(level = "trace", skip(self))]
  pub fn remove_node(&mut self, id: &NodeId) -> Result<Node, GraphError> {
    if !self.nodes.contains_key(id) {
      return Err(GraphError::UnknownNode(id.clone()));
    }
    let touching = self.edges_touching(id);
    if !touching.is_empty() {
      return Err(GraphError::NodeInUse {
        node: id.clone(),
        edges: touching.len(),
      });
    }
    self.advance_epoch();
    info!(node = %id, "node removed");
    self
      .nodes
      .remove(id)
      .ok_or_else(|| GraphError::UnknownNode(id.clone()))
  }

  /// Disconnects every edge touching the node, then removes it.
  #[instrument(level = "trace", skip(self))]
  pub fn remove_node_cascade(&mut self, id: &NodeId) -> Result<Node, GraphError> {
    if !self.nodes.contains_key(id) {
      return Err(GraphError::UnknownNode(id.clone()));
    }
    for input in self.edges_touching(id) {
      self.disconnect(&input)?;
    }
    self.remove_node(id)
  }

  /// Node ids fed by any output of `id`.
  fn consumers(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> {
    self
      .edges
      .iter()
      .filter(move |(_, from)| &from.node == id)
      .map(|(to, _)| &to.node)
  }

  /// True when a directed path leads from `start` to `target` (or they are the same node).
  pub fn reaches(&self, start: &NodeId, target: &NodeId) -> bool {
    let mut seen: HashSet<&NodeId> = HashSet::new();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
      if id == target {
        return true;
      }
      if seen.insert(id) {
        stack.extend(self.consumers(id));
      }
    }
    false
  }

  /// Invalidates every output of `start` and of each node downstream of it.
  fn invalidate_from(&self, start: &NodeId) -> usize {
    self.advance_epoch();
    let mut seen: HashSet<&NodeId> = HashSet::new();
    let mut queue: VecDeque<&NodeId> = VecDeque::from([start]);
    let mut count = 0;
    while let Some(id) = queue.pop_front() {
      if !seen.insert(id) {
        continue;
      }
      if let Some(node) = self.nodes.get(id) {
        count += node.invalidate_outputs();
      }
      queue.extend(self.consumers(id));
    }
    debug!(start = %start, count, "invalidated");
    count
  }

  /// Invalidates the node's outputs and everything downstream. Returns the number of output
  /// tethers invalidated.
  #[instrument(level = "trace", skip(self))]
  pub fn invalidate(&self, id: &NodeId) -> Result<usize, GraphError> {
    if !self.nodes.contains_key(id) {
      return Err(GraphError::UnknownNode(id.clone()));
    }
    Ok(self.invalidate_from(id))
  }

  /// Invalidates one output tether plus every node consuming it, transitively.
  #[instrument(level = "trace", skip(self), fields(output = %output))]
  pub fn invalidate_output(&self, output: &TetherRef) -> Result<usize, GraphError> {
    let Tether::Output(tether) = self.tether_of_kind(output, TetherKind::Output)? else {
      return Err(GraphError::UnknownTether {
        node: output.node.clone(),
        tether: output.tether.clone(),
      });
    };
    self.advance_epoch();
    tether.invalidate();
    let mut count = 1;
    let consumers: Vec<NodeId> = self
      .edges
      .iter()
      .filter(|(_, from)| *from == output)
      .map(|(to, _)| to.node.clone())
      .collect();
    for consumer in &consumers {
      count += self.invalidate_from(consumer);
    }
    Ok(count)
  }

  /// Replaces a node's raw configuration and invalidates it and its dependents.
  ///
  /// This is the engine side of a widget `push()`.
  #[instrument(level = "trace", skip(self, config))]
  pub fn set_config(&self, id: &NodeId, config: Value) -> Result<usize, GraphError> {
    let node = self
      .nodes
      .get(id)
      .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
    node.replace_config(config);
    info!(node = %id, "config replaced");
    Ok(self.invalidate_from(id))
  }

  /// Valid cached value of an output tether, without resolving anything.
  pub fn cached(&self, output: &TetherRef) -> Option<Value> {
    self
      .nodes
      .get(&output.node)
      .and_then(|n| n.output(&output.tether))
      .and_then(|t| t.cached())
  }

  /// Opens a resolution context tagged with the current graph epoch.
  pub fn context(&self) -> ResolutionContext {
    ResolutionContext::new(self.epoch())
  }

  /// Resolves `output` in a fresh resolution context.
  pub async fn resolve(&self, output: &TetherRef) -> Result<Value, ResolveError> {
    let ctx = self.context();
    self.resolve_in(&ctx, output).await
  }

  /// Resolves `output` in an existing context, sharing its memo with earlier requests.
  #[instrument(level = "trace", skip(self, ctx), fields(output = %output, context = %ctx.id()))]
  pub async fn resolve_in(
    &self,
    ctx: &ResolutionContext,
    output: &TetherRef,
  ) -> Result<Value, ResolveError> {
    resolver::resolve_output(self, ctx, output.clone(), None).await
  }
}
