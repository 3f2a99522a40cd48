//! Node kinds registered by name, each with a factory building node instances.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{instrument, trace};

use crate::error::RegistryError;
use crate::types::{Node, NodeId};

/// Builds a node instance from its id and raw configuration.
pub type NodeFactory = Box<dyn Fn(&NodeId, &Value) -> Result<Node, RegistryError>>;

/// Maps node kind names to factories.
#[derive(Default)]
pub struct NodeRegistry {
  factories: BTreeMap<String, NodeFactory>,
}

impl NodeRegistry {
  /// Empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry with every built-in kind (see [crate::nodes]).
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    crate::nodes::register_builtins(&mut registry);
    registry
  }

  /// Registers `factory` under `kind`, replacing any previous factory for that kind.
  pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
  where
    F: Fn(&NodeId, &Value) -> Result<Node, RegistryError> + 'static,
  {
    let kind = kind.into();
    trace!(kind = %kind, "registering node kind");
    self.factories.insert(kind, Box::new(factory));
  }

  pub fn contains(&self, kind: &str) -> bool {
    self.factories.contains_key(kind)
  }

  /// Registered kind names, sorted.
  pub fn kinds(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }

  /// Instantiates a node of `kind`.
  #[instrument(level = "trace", skip(self, config))]
  pub fn create(&self, kind: &str, id: &NodeId, config: &Value) -> Result<Node, RegistryError> {
    let factory = self
      .factories
      .get(kind)
      .ok_or_else(|| RegistryError::UnknownKind(kind.to_string()))?;
    factory(id, config)
  }
}

impl std::fmt::Debug for NodeRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NodeRegistry")
      .field("kinds", &self.factories.keys().collect::<Vec<_>>())
      .finish()
  }
}
