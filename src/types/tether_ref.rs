//! Address of a tether: owning node plus tether name, written `node.tether`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::error::CompileError;

/// Address of a tether on a node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TetherRef {
  pub node: NodeId,
  pub tether: String,
}

impl TetherRef {
  pub fn new(node: impl Into<NodeId>, tether: impl Into<String>) -> Self {
    Self {
      node: node.into(),
      tether: tether.into(),
    }
  }
}

impl fmt::Display for TetherRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.node, self.tether)
  }
}

/// Splits at the last `.` so node ids may themselves contain dots.
impl FromStr for TetherRef {
  type Err = CompileError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.rsplit_once('.') {
      Some((node, tether)) if !node.is_empty() && !tether.is_empty() => {
        Ok(TetherRef::new(node, tether))
      }
      _ => Err(CompileError::InvalidTetherRef(s.to_string())),
    }
  }
}

impl TryFrom<String> for TetherRef {
  type Error = CompileError;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    s.parse()
  }
}

impl From<TetherRef> for String {
  fn from(r: TetherRef) -> Self {
    r.to_string()
  }
}
