//! Graph data model: node ids, tethers, nodes, edges, documents and execution logs.

mod edge;
mod execution_log;
mod graph_document;
#[cfg(test)]
mod graph_document_test;
mod graph_options;
mod node;
mod node_id;
mod step_status;
mod tether;
mod tether_ref;

pub use edge::Edge;
pub use execution_log::{ExecutionLog, ExecutionStep};
pub use graph_document::{EdgeEntry, GraphDocument, NodeEntry};
pub use graph_options::{GraphOptions, UnresolvedPolicy};
pub use node::{FnProcess, Node, NodeBuilder, NodeInputs, Process, process_fn};
pub use node_id::NodeId;
pub use step_status::StepStatus;
pub use tether::{InputTether, OutputTether, Tether, TetherKind};
pub use tether_ref::TetherRef;
