//! Registers a custom `double` kind next to the built-ins, wires `constant -> double`, then
//! edits the constant the way a widget push would and resolves again.
//!
//! Run: `cargo run --example doubling`

use std::rc::Rc;

use serde_json::{Value, json};
use tether_graph::{Graph, Node, NodeInputs, NodeRegistry, ProcessError, TetherRef, process_fn};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn double_node(id: &tether_graph::NodeId) -> Result<Node, tether_graph::GraphError> {
  Node::builder(id.clone(), "double")
    .input("in")
    .output("out")
    .build(process_fn(|inputs: NodeInputs, _config: Rc<Value>| {
      let value = inputs.require("in").map(|v| v.as_i64());
      async move {
        match value? {
          Some(v) => Ok(vec![json!(v * 2)]),
          None => Err(ProcessError::new("'in' must be an integer")),
        }
      }
    }))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let mut registry = NodeRegistry::with_builtins();
  registry.register("double", |id, _config| Ok(double_node(id)?));

  let mut graph = Graph::new();
  graph.add_node(registry.create("constant", &"a".into(), &json!({ "value": 5 }))?)?;
  graph.add_node(registry.create("double", &"b".into(), &Value::Null)?)?;
  let output: TetherRef = "b.out".parse()?;
  graph.connect(&"a.value".parse()?, &"b.in".parse()?)?;

  let first = graph.resolve(&output).await?;
  info!(%first, "resolved");
  println!("b.out = {first}");

  graph.set_config(&"a".into(), json!({ "value": 7 }))?;
  let second = graph.resolve(&output).await?;
  println!("b.out = {second}");
  Ok(())
}
