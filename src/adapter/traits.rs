//! Adapter trait: the contract graph writers consume
//!
//! An adapter owns its normalized data and hands out node and edge
//! sequences on demand. The writer never needs to know how the adapter
//! obtained them, and may ask for either sequence first.

use crate::graph::{Edge, Node};

/// Boxed lazy sequence borrowed from an adapter
pub type Emitted<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// The contract adapters implement.
pub trait Adapter {
    /// Unique identifier for this adapter
    fn id(&self) -> &str;

    /// Nodes for every enabled node type, in emission order.
    fn nodes(&self) -> Emitted<'_, Node>;

    /// Edges for every enabled edge type, in emission order.
    fn edges(&self) -> Emitted<'_, Edge>;
}
