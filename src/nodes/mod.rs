//! Built-in node kinds.

mod add;
mod constant;
mod delay;
mod identity_node;
mod numeric;
mod scale;

pub use add::AddNode;
pub use constant::ConstantNode;
pub use delay::DelayNode;
pub use identity_node::IdentityNode;
pub use scale::ScaleNode;

use crate::registry::NodeRegistry;

/// Registers every built-in kind on `registry`.
pub fn register_builtins(registry: &mut NodeRegistry) {
  registry.register(constant::KIND, |id, config| {
    Ok(ConstantNode::node(id.clone(), config.clone())?)
  });
  registry.register(identity_node::KIND, |id, config| {
    Ok(IdentityNode::node(id.clone(), config.clone())?)
  });
  registry.register(add::KIND, |id, config| {
    Ok(AddNode::node(id.clone(), config.clone())?)
  });
  registry.register(scale::KIND, |id, config| {
    Ok(ScaleNode::node(id.clone(), config.clone())?)
  });
  registry.register(delay::KIND, |id, config| {
    Ok(DelayNode::node(id.clone(), config.clone())?)
  });
}
