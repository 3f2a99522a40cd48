//! Pass-through node that suspends for a configured time first.

use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{GraphError, ProcessError};
use crate::types::{Node, NodeId, NodeInputs, Process};

pub const KIND: &str = "delay";

/// Sleeps `config.millis` (default 0) and forwards `in` to `out`.
pub struct DelayNode;

#[async_trait(?Send)]
impl Process for DelayNode {
  async fn process(
    &self,
    inputs: NodeInputs,
    config: Rc<Value>,
  ) -> Result<Vec<Value>, ProcessError> {
    let millis = match config.get("millis") {
      None => 0,
      Some(v) => v
        .as_u64()
        .ok_or_else(|| ProcessError::new("config 'millis' must be a non-negative integer"))?,
    };
    tracing::trace!(millis, "DelayNode sleeping");
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Ok(vec![inputs.named("in").cloned().unwrap_or(Value::Null)])
  }
}

impl DelayNode {
  pub fn node(id: impl Into<NodeId>, config: Value) -> Result<Node, GraphError> {
    Node::builder(id, KIND)
      .input("in")
      .output("out")
      .config(config)
      .build(DelayNode)
  }
}
