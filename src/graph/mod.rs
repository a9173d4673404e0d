//! Node and edge tuples emitted to the graph writer

mod edge;
mod node;

#[cfg(test)]
mod tests;

pub use edge::{relationship, Edge};
pub use node::{Node, NodeId, Properties, PropertyValue};
