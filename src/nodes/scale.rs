//! Multiplies its input by a configured factor.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::numeric::{as_number, combine};
use crate::error::{GraphError, ProcessError};
use crate::types::{Node, NodeId, NodeInputs, Process};

pub const KIND: &str = "scale";

/// `out = in * config.factor`, factor defaulting to 1.
pub struct ScaleNode;

#[async_trait(?Send)]
impl Process for ScaleNode {
  async fn process(
    &self,
    inputs: NodeInputs,
    config: Rc<Value>,
  ) -> Result<Vec<Value>, ProcessError> {
    let input = as_number(inputs.require("in")?, "input 'in'")?;
    let one = Value::from(1);
    let factor = as_number(config.get("factor").unwrap_or(&one), "config 'factor'")?;
    Ok(vec![combine(input, factor, i64::checked_mul, |x, y| x * y)?])
  }
}

impl ScaleNode {
  pub fn node(id: impl Into<NodeId>, config: Value) -> Result<Node, GraphError> {
    Node::builder(id, KIND)
      .input("in")
      .output("out")
      .config(config)
      .build(ScaleNode)
  }
}
