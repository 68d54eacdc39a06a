//! The hierarchical store collaborator.
//!
//! A store is the nested container on disk (or in memory). The tree model only
//! reads structure and attributes through this trait and performs structural
//! edits as "create new reference, then delete old entry".

use super::AttributeValue;
use crate::error::Result;
use std::fmt;

/// Attribute keys the store uses for axis/dimension bookkeeping.
pub const AXIS_KEYS: [&str; 5] = [
    "DIMENSION_SCALE",
    "DIMENSION_LIST",
    "CLASS",
    "NAME",
    "REFERENCE_LIST",
];

/// Attribute key holding the junk marker.
pub const JUNK_KEY: &str = "__JUNK__";

/// Check whether an attribute key is reserved (axis bookkeeping or junk marker).
pub fn is_reserved_key(key: &str) -> bool {
    key == JUNK_KEY || AXIS_KEYS.contains(&key)
}

/// What a store entry is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A group containing further entries.
    Group,
    /// An array dataset of the given shape.
    Dataset {
        /// Dimension sizes.
        shape: Vec<usize>,
    },
}

/// A child entry returned by [`HierarchicalStore::get`].
#[derive(Debug, Clone)]
pub struct Entry<H> {
    /// Handle to the object.
    pub handle: H,
    /// Group or dataset.
    pub kind: EntryKind,
}

/// Store operations that can fail, used for logging and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// Listing group members.
    ListChildren,
    /// Resolving a member.
    Get,
    /// Listing attribute keys.
    ListAttributes,
    /// Reading an attribute.
    GetAttribute,
    /// Writing an attribute.
    SetAttribute,
    /// Deleting an attribute.
    DeleteAttribute,
    /// Linking an existing object under a new name.
    CreateReference,
    /// Unlinking a member.
    DeleteEntry,
}

impl StoreOp {
    /// Operation name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::ListChildren => "list_children",
            Self::Get => "get",
            Self::ListAttributes => "list_attributes",
            Self::GetAttribute => "get_attribute",
            Self::SetAttribute => "set_attribute",
            Self::DeleteAttribute => "delete_attribute",
            Self::CreateReference => "create_reference",
            Self::DeleteEntry => "delete_entry",
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Primitives the tree model needs from a nested container.
///
/// Handles must identify objects, not names: after `create_reference` +
/// `delete_entry` re-link a group under a new name, handles to its
/// descendants obtained earlier keep working.
pub trait HierarchicalStore {
    /// Handle to a group or dataset.
    type Handle: Clone + fmt::Debug;

    /// Handle to the root group.
    fn root(&self) -> Self::Handle;

    /// Member names of a group, in store order.
    fn list_children(&self, group: &Self::Handle) -> Result<Vec<String>>;

    /// Resolve a member of a group.
    fn get(&self, group: &Self::Handle, name: &str) -> Result<Entry<Self::Handle>>;

    /// Attribute keys of a group or dataset, in store order.
    fn list_attributes(&self, handle: &Self::Handle) -> Result<Vec<String>>;

    /// Read an attribute.
    fn get_attribute(&self, handle: &Self::Handle, key: &str) -> Result<AttributeValue>;

    /// Write an attribute, replacing any existing value.
    fn set_attribute(
        &mut self,
        handle: &Self::Handle,
        key: &str,
        value: AttributeValue,
    ) -> Result<()>;

    /// Remove an attribute.
    fn delete_attribute(&mut self, handle: &Self::Handle, key: &str) -> Result<()>;

    /// Link an existing object into `parent` under `new_name`.
    fn create_reference(
        &mut self,
        parent: &Self::Handle,
        new_name: &str,
        existing: &Self::Handle,
    ) -> Result<()>;

    /// Unlink a member of a group.
    fn delete_entry(&mut self, parent: &Self::Handle, name: &str) -> Result<()>;
}
