//! Identity / pass-through node.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{GraphError, ProcessError};
use crate::types::{Node, NodeId, NodeInputs, Process};

pub const KIND: &str = "identity";

/// Forwards `in` to `out` unchanged. An absent input forwards as `null`.
pub struct IdentityNode;

#[async_trait(?Send)]
impl Process for IdentityNode {
  async fn process(
    &self,
    inputs: NodeInputs,
    _config: Rc<Value>,
  ) -> Result<Vec<Value>, ProcessError> {
    tracing::trace!("IdentityNode processing");
    Ok(vec![inputs.named("in").cloned().unwrap_or(Value::Null)])
  }
}

impl IdentityNode {
  pub fn node(id: impl Into<NodeId>, config: Value) -> Result<Node, GraphError> {
    Node::builder(id, KIND)
      .input("in")
      .output("out")
      .config(config)
      .build(IdentityNode)
  }
}
