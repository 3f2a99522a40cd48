//! Sum of two numeric inputs.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use super::numeric::{as_number, combine};
use crate::error::{GraphError, ProcessError};
use crate::types::{Node, NodeId, NodeInputs, Process};

pub const KIND: &str = "add";

/// `sum = a + b`. Both inputs fall back to `0` when unconnected.
pub struct AddNode;

#[async_trait(?Send)]
impl Process for AddNode {
  async fn process(
    &self,
    inputs: NodeInputs,
    _config: Rc<Value>,
  ) -> Result<Vec<Value>, ProcessError> {
    let a = as_number(inputs.require("a")?, "input 'a'")?;
    let b = as_number(inputs.require("b")?, "input 'b'")?;
    Ok(vec![combine(a, b, i64::checked_add, |x, y| x + y)?])
  }
}

impl AddNode {
  pub fn node(id: impl Into<NodeId>, config: Value) -> Result<Node, GraphError> {
    Node::builder(id, KIND)
      .input_with_fallback("a", Value::from(0))
      .input_with_fallback("b", Value::from(0))
      .output("sum")
      .config(config)
      .build(AddNode)
  }
}
