//! Input and output tethers: the named slots of a node.

use std::cell::{Cell, RefCell};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Which side of a node a tether sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TetherKind {
  Input,
  Output,
}

impl fmt::Display for TetherKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TetherKind::Input => write!(f, "input"),
      TetherKind::Output => write!(f, "output"),
    }
  }
}

/// Slot that consumes a value from at most one upstream output.
///
/// The connection itself lives in the graph's edge table.
#[derive(Debug, Clone)]
pub struct InputTether {
  name: String,
  /// Value used while the tether is unconnected.
  fallback: Option<Value>,
}

impl InputTether {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      fallback: None,
    }
  }

  pub fn with_fallback(name: impl Into<String>, fallback: Value) -> Self {
    Self {
      name: name.into(),
      fallback: Some(fallback),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn fallback(&self) -> Option<&Value> {
    self.fallback.as_ref()
  }
}

#[derive(Debug, Clone)]
struct CachedValue {
  value: Value,
  epoch: u64,
}

/// Slot that supplies a value to any number of downstream inputs.
///
/// Holds the memoized value between invalidations. A cached value is only valid while its
/// epoch tag equals the tether's current epoch.
#[derive(Debug)]
pub struct OutputTether {
  name: String,
  epoch: Cell<u64>,
  cache: RefCell<Option<CachedValue>>,
}

impl OutputTether {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      epoch: Cell::new(0),
      cache: RefCell::new(None),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Current epoch. Advances on every invalidation.
  pub fn epoch(&self) -> u64 {
    self.epoch.get()
  }

  /// Returns the cached value if it is still valid for the current epoch.
  pub fn cached(&self) -> Option<Value> {
    let epoch = self.epoch.get();
    self
      .cache
      .borrow()
      .as_ref()
      .filter(|c| c.epoch == epoch)
      .map(|c| c.value.clone())
  }

  /// Drops the cached value and advances the epoch. Never recomputes.
  pub fn invalidate(&self) {
    self.epoch.set(self.epoch.get() + 1);
    self.cache.borrow_mut().take();
  }

  /// Stores `value` if the tether has not been invalidated since `epoch` was observed.
  /// Returns whether the value was stored.
  pub(crate) fn store(&self, value: Value, epoch: u64) -> bool {
    if self.epoch.get() != epoch {
      return false;
    }
    *self.cache.borrow_mut() = Some(CachedValue { value, epoch });
    true
  }
}

/// A tether on either side of a node.
#[derive(Debug, Clone, Copy)]
pub enum Tether<'a> {
  Input(&'a InputTether),
  Output(&'a OutputTether),
}

impl<'a> Tether<'a> {
  pub fn name(&self) -> &'a str {
    match self {
      Tether::Input(t) => t.name(),
      Tether::Output(t) => t.name(),
    }
  }

  pub fn kind(&self) -> TetherKind {
    match self {
      Tether::Input(_) => TetherKind::Input,
      Tether::Output(_) => TetherKind::Output,
    }
  }
}
