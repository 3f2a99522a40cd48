//! A directed edge from an upstream output tether to a downstream input tether.

use serde::{Deserialize, Serialize};

use super::TetherRef;

/// A directed edge from an upstream output tether to a downstream input tether.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
  pub from: TetherRef,
  pub to: TetherRef,
}

impl Edge {
  pub fn new(from: TetherRef, to: TetherRef) -> Self {
    Self { from, to }
  }
}
