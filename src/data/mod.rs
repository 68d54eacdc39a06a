//! Data representation and store access.
//!
//! This module defines the nodes of the hierarchy, the attribute value type,
//! the store trait the tree is built from, and the store implementations.

mod memory;
mod node;
mod store;
mod value;

#[cfg(feature = "netcdf")]
pub mod netcdf;

pub use memory::{MemoryStore, MemoryStoreError, ObjectId};
pub use node::{shape_string, Background, Node, NodeContent, NodeId, NodeKind, PlotHandle};
pub use store::{
    is_reserved_key, Entry, EntryKind, HierarchicalStore, StoreOp, AXIS_KEYS, JUNK_KEY,
};
pub use value::AttributeValue;
