//! Source node emitting the `value` key of its configuration.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use crate::error::{GraphError, ProcessError};
use crate::types::{Node, NodeId, NodeInputs, Process};

pub const KIND: &str = "constant";

/// Emits `config.value` on its `value` output. Has no inputs.
pub struct ConstantNode;

#[async_trait(?Send)]
impl Process for ConstantNode {
  async fn process(
    &self,
    _inputs: NodeInputs,
    config: Rc<Value>,
  ) -> Result<Vec<Value>, ProcessError> {
    trace!("ConstantNode processing");
    let value = config
      .get("value")
      .cloned()
      .ok_or_else(|| ProcessError::new("constant node config has no 'value'"))?;
    Ok(vec![value])
  }
}

impl ConstantNode {
  pub fn node(id: impl Into<NodeId>, config: Value) -> Result<Node, GraphError> {
    Node::builder(id, KIND)
      .output("value")
      .config(config)
      .build(ConstantNode)
  }
}
