//! Nodes: ordered input and output tethers plus the computation that fills the outputs.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::{InputTether, NodeId, OutputTether, Tether};
use crate::error::{GraphError, ProcessError};

/// Resolved input values handed to [Process::process], in declared input order.
///
/// An entry is `None` when its tether is unconnected, has no fallback and the graph resolves
/// such inputs to the absent sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeInputs {
  entries: Vec<(String, Option<Value>)>,
}

impl NodeInputs {
  pub fn new(entries: Vec<(String, Option<Value>)>) -> Self {
    Self { entries }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Value at `index`; `None` if absent or out of range.
  pub fn get(&self, index: usize) -> Option<&Value> {
    self.entries.get(index).and_then(|(_, v)| v.as_ref())
  }

  pub fn named(&self, name: &str) -> Option<&Value> {
    self
      .entries
      .iter()
      .find(|(n, _)| n == name)
      .and_then(|(_, v)| v.as_ref())
  }

  /// Like [NodeInputs::named] but fails the computation when the value is absent.
  pub fn require(&self, name: &str) -> Result<&Value, ProcessError> {
    self
      .named(name)
      .ok_or_else(|| ProcessError::new(format!("input '{}' has no value", name)))
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
    self.entries.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
  }
}

/// The computation bound to a node.
///
/// Receives the resolved inputs and the node's raw configuration and yields one value per
/// output tether, in declared order. May suspend; must not touch state outside its node.
#[async_trait(?Send)]
pub trait Process {
  async fn process(
    &self,
    inputs: NodeInputs,
    config: Rc<Value>,
  ) -> Result<Vec<Value>, ProcessError>;
}

/// [Process] backed by a closure returning a future.
pub struct FnProcess<F>(F);

/// Wraps an async closure as a [Process].
pub fn process_fn<F, Fut>(f: F) -> FnProcess<F>
where
  F: Fn(NodeInputs, Rc<Value>) -> Fut,
  Fut: Future<Output = Result<Vec<Value>, ProcessError>>,
{
  FnProcess(f)
}

#[async_trait(?Send)]
impl<F, Fut> Process for FnProcess<F>
where
  F: Fn(NodeInputs, Rc<Value>) -> Fut,
  Fut: Future<Output = Result<Vec<Value>, ProcessError>> + 'static,
{
  async fn process(
    &self,
    inputs: NodeInputs,
    config: Rc<Value>,
  ) -> Result<Vec<Value>, ProcessError> {
    (self.0)(inputs, config).await
  }
}

/// A unit of computation in the dataflow graph.
pub struct Node {
  id: NodeId,
  /// Registered kind name (e.g. `constant`).
  kind: String,
  inputs: Vec<InputTether>,
  outputs: Vec<OutputTether>,
  /// Raw configuration owned by the host document. Opaque to the engine.
  config: RefCell<Rc<Value>>,
  process: Box<dyn Process>,
}

impl Node {
  pub fn builder(id: impl Into<NodeId>, kind: impl Into<String>) -> NodeBuilder {
    NodeBuilder {
      id: id.into(),
      kind: kind.into(),
      inputs: Vec::new(),
      outputs: Vec::new(),
      config: Value::Null,
    }
  }

  pub fn id(&self) -> &NodeId {
    &self.id
  }

  pub fn kind(&self) -> &str {
    &self.kind
  }

  pub fn inputs(&self) -> &[InputTether] {
    &self.inputs
  }

  pub fn outputs(&self) -> &[OutputTether] {
    &self.outputs
  }

  pub fn input(&self, name: &str) -> Option<&InputTether> {
    self.inputs.iter().find(|t| t.name() == name)
  }

  pub fn output(&self, name: &str) -> Option<&OutputTether> {
    self.outputs.iter().find(|t| t.name() == name)
  }

  pub fn output_index(&self, name: &str) -> Option<usize> {
    self.outputs.iter().position(|t| t.name() == name)
  }

  /// Looks a tether up by name on either side. Names are unique per node.
  pub fn tether(&self, name: &str) -> Option<Tether<'_>> {
    self
      .input(name)
      .map(Tether::Input)
      .or_else(|| self.output(name).map(Tether::Output))
  }

  /// All tethers, inputs first, each side in declared order.
  pub fn tethers(&self) -> impl Iterator<Item = Tether<'_>> {
    self
      .inputs
      .iter()
      .map(Tether::Input)
      .chain(self.outputs.iter().map(Tether::Output))
  }

  pub fn config(&self) -> Rc<Value> {
    Rc::clone(&self.config.borrow())
  }

  pub(crate) fn replace_config(&self, config: Value) {
    *self.config.borrow_mut() = Rc::new(config);
  }

  /// Invalidates every output tether. Returns how many were invalidated.
  pub(crate) fn invalidate_outputs(&self) -> usize {
    for output in &self.outputs {
      output.invalidate();
    }
    self.outputs.len()
  }

  pub(crate) fn processor(&self) -> &dyn Process {
    self.process.as_ref()
  }
}

impl fmt::Debug for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Node")
      .field("id", &self.id)
      .field("kind", &self.kind)
      .field("inputs", &self.inputs)
      .field("outputs", &self.outputs)
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

/// Builder for [Node]. Tethers keep the order they are declared in.
pub struct NodeBuilder {
  id: NodeId,
  kind: String,
  inputs: Vec<InputTether>,
  outputs: Vec<OutputTether>,
  config: Value,
}

impl NodeBuilder {
  pub fn input(mut self, name: impl Into<String>) -> Self {
    self.inputs.push(InputTether::new(name));
    self
  }

  pub fn input_with_fallback(mut self, name: impl Into<String>, fallback: Value) -> Self {
    self.inputs.push(InputTether::with_fallback(name, fallback));
    self
  }

  pub fn output(mut self, name: impl Into<String>) -> Self {
    self.outputs.push(OutputTether::new(name));
    self
  }

  pub fn config(mut self, config: Value) -> Self {
    self.config = config;
    self
  }

  /// Binds the computation and builds the node. Fails if a tether name repeats.
  pub fn build(self, process: impl Process + 'static) -> Result<Node, GraphError> {
    let mut seen = HashSet::new();
    let names = self
      .inputs
      .iter()
      .map(InputTether::name)
      .chain(self.outputs.iter().map(OutputTether::name));
    for name in names {
      if !seen.insert(name) {
        return Err(GraphError::DuplicateTether {
          node: self.id.clone(),
          tether: name.to_string(),
        });
      }
    }
    Ok(Node {
      id: self.id,
      kind: self.kind,
      inputs: self.inputs,
      outputs: self.outputs,
      config: RefCell::new(Rc::new(self.config)),
      process: Box::new(process),
    })
  }
}
