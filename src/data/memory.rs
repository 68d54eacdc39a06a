//! In-memory hierarchical store.
//!
//! Objects live in an arena and groups link to them by name, like hard links
//! in an HDF5 file. Renaming a group therefore keeps every handle below it
//! valid.

use super::store::{Entry, EntryKind, HierarchicalStore, StoreOp};
use super::AttributeValue;
use crate::error::{H5ScopeError, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Handle to an object in a [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

/// Failures reported by [`MemoryStore`].
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    /// Handle does not refer to a live object.
    #[error("invalid handle {0:?}")]
    InvalidHandle(ObjectId),
    /// Object is a dataset where a group was required.
    #[error("object {0:?} is not a group")]
    NotAGroup(ObjectId),
    /// Group has no member with this name.
    #[error("no member named '{0}'")]
    NoSuchMember(String),
    /// Group already has a member with this name.
    #[error("member '{0}' already exists")]
    NameTaken(String),
    /// Object has no attribute with this key.
    #[error("no attribute named '{0}'")]
    NoSuchAttribute(String),
    /// Failure requested through [`MemoryStore::fail_next`].
    #[error("injected failure")]
    Injected,
}

#[derive(Debug, Clone)]
enum ObjectKind {
    Group { members: BTreeMap<String, ObjectId> },
    Dataset { shape: Vec<usize> },
}

#[derive(Debug, Clone)]
struct Object {
    kind: ObjectKind,
    attrs: BTreeMap<String, AttributeValue>,
}

/// Hierarchical store held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    objects: Vec<Object>,
    failures: RefCell<HashSet<StoreOp>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store holding only an empty root group.
    pub fn new() -> Self {
        Self {
            objects: vec![Object {
                kind: ObjectKind::Group {
                    members: BTreeMap::new(),
                },
                attrs: BTreeMap::new(),
            }],
            failures: RefCell::new(HashSet::new()),
        }
    }

    /// Make the next call of `op` fail with a store error.
    pub fn fail_next(&self, op: StoreOp) {
        self.failures.borrow_mut().insert(op);
    }

    /// Add an empty group under `parent`.
    pub fn add_group(&mut self, parent: ObjectId, name: &str) -> Result<ObjectId> {
        self.insert(
            parent,
            name,
            ObjectKind::Group {
                members: BTreeMap::new(),
            },
        )
    }

    /// Add a dataset of the given shape under `parent`.
    pub fn add_dataset(
        &mut self,
        parent: ObjectId,
        name: &str,
        shape: &[usize],
    ) -> Result<ObjectId> {
        self.insert(
            parent,
            name,
            ObjectKind::Dataset {
                shape: shape.to_vec(),
            },
        )
    }

    /// Resolve a `/`-separated path from the root.
    pub fn resolve(&self, path: &str) -> Option<ObjectId> {
        let mut current = ObjectId(0);
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match &self.objects.get(current.0)?.kind {
                ObjectKind::Group { members } => current = *members.get(segment)?,
                ObjectKind::Dataset { .. } => return None,
            }
        }
        Some(current)
    }

    /// Attribute table of an object, for inspection.
    pub fn attributes(&self, handle: ObjectId) -> Option<&BTreeMap<String, AttributeValue>> {
        self.objects.get(handle.0).map(|o| &o.attrs)
    }

    fn insert(&mut self, parent: ObjectId, name: &str, kind: ObjectKind) -> Result<ObjectId> {
        let id = ObjectId(self.objects.len());
        let members = self.members_mut(parent, StoreOp::CreateReference)?;
        if members.contains_key(name) {
            return Err(store_err(
                StoreOp::CreateReference,
                MemoryStoreError::NameTaken(name.to_string()),
            ));
        }
        members.insert(name.to_string(), id);
        self.objects.push(Object {
            kind,
            attrs: BTreeMap::new(),
        });
        Ok(id)
    }

    fn check(&self, op: StoreOp) -> Result<()> {
        if self.failures.borrow_mut().remove(&op) {
            return Err(store_err(op, MemoryStoreError::Injected));
        }
        Ok(())
    }

    fn object(&self, handle: ObjectId, op: StoreOp) -> Result<&Object> {
        self.objects
            .get(handle.0)
            .ok_or_else(|| store_err(op, MemoryStoreError::InvalidHandle(handle)))
    }

    fn object_mut(&mut self, handle: ObjectId, op: StoreOp) -> Result<&mut Object> {
        self.objects
            .get_mut(handle.0)
            .ok_or_else(|| store_err(op, MemoryStoreError::InvalidHandle(handle)))
    }

    fn members(&self, group: ObjectId, op: StoreOp) -> Result<&BTreeMap<String, ObjectId>> {
        match &self.object(group, op)?.kind {
            ObjectKind::Group { members } => Ok(members),
            ObjectKind::Dataset { .. } => Err(store_err(op, MemoryStoreError::NotAGroup(group))),
        }
    }

    fn members_mut(
        &mut self,
        group: ObjectId,
        op: StoreOp,
    ) -> Result<&mut BTreeMap<String, ObjectId>> {
        match &mut self.object_mut(group, op)?.kind {
            ObjectKind::Group { members } => Ok(members),
            ObjectKind::Dataset { .. } => Err(store_err(op, MemoryStoreError::NotAGroup(group))),
        }
    }
}

fn store_err(op: StoreOp, err: MemoryStoreError) -> H5ScopeError {
    H5ScopeError::store(op.name(), err)
}

impl HierarchicalStore for MemoryStore {
    type Handle = ObjectId;

    fn root(&self) -> ObjectId {
        ObjectId(0)
    }

    fn list_children(&self, group: &ObjectId) -> Result<Vec<String>> {
        self.check(StoreOp::ListChildren)?;
        Ok(self
            .members(*group, StoreOp::ListChildren)?
            .keys()
            .cloned()
            .collect())
    }

    fn get(&self, group: &ObjectId, name: &str) -> Result<Entry<ObjectId>> {
        self.check(StoreOp::Get)?;
        let handle = *self
            .members(*group, StoreOp::Get)?
            .get(name)
            .ok_or_else(|| store_err(StoreOp::Get, MemoryStoreError::NoSuchMember(name.into())))?;
        let kind = match &self.object(handle, StoreOp::Get)?.kind {
            ObjectKind::Group { .. } => EntryKind::Group,
            ObjectKind::Dataset { shape } => EntryKind::Dataset {
                shape: shape.clone(),
            },
        };
        Ok(Entry { handle, kind })
    }

    fn list_attributes(&self, handle: &ObjectId) -> Result<Vec<String>> {
        self.check(StoreOp::ListAttributes)?;
        Ok(self
            .object(*handle, StoreOp::ListAttributes)?
            .attrs
            .keys()
            .cloned()
            .collect())
    }

    fn get_attribute(&self, handle: &ObjectId, key: &str) -> Result<AttributeValue> {
        self.check(StoreOp::GetAttribute)?;
        self.object(*handle, StoreOp::GetAttribute)?
            .attrs
            .get(key)
            .cloned()
            .ok_or_else(|| {
                store_err(
                    StoreOp::GetAttribute,
                    MemoryStoreError::NoSuchAttribute(key.into()),
                )
            })
    }

    fn set_attribute(&mut self, handle: &ObjectId, key: &str, value: AttributeValue) -> Result<()> {
        self.check(StoreOp::SetAttribute)?;
        self.object_mut(*handle, StoreOp::SetAttribute)?
            .attrs
            .insert(key.to_string(), value);
        Ok(())
    }

    fn delete_attribute(&mut self, handle: &ObjectId, key: &str) -> Result<()> {
        self.check(StoreOp::DeleteAttribute)?;
        self.object_mut(*handle, StoreOp::DeleteAttribute)?
            .attrs
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| {
                store_err(
                    StoreOp::DeleteAttribute,
                    MemoryStoreError::NoSuchAttribute(key.into()),
                )
            })
    }

    fn create_reference(
        &mut self,
        parent: &ObjectId,
        new_name: &str,
        existing: &ObjectId,
    ) -> Result<()> {
        self.check(StoreOp::CreateReference)?;
        self.object(*existing, StoreOp::CreateReference)?;
        let members = self.members_mut(*parent, StoreOp::CreateReference)?;
        if members.contains_key(new_name) {
            return Err(store_err(
                StoreOp::CreateReference,
                MemoryStoreError::NameTaken(new_name.to_string()),
            ));
        }
        members.insert(new_name.to_string(), *existing);
        Ok(())
    }

    fn delete_entry(&mut self, parent: &ObjectId, name: &str) -> Result<()> {
        self.check(StoreOp::DeleteEntry)?;
        self.members_mut(*parent, StoreOp::DeleteEntry)?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| {
                store_err(
                    StoreOp::DeleteEntry,
                    MemoryStoreError::NoSuchMember(name.to_string()),
                )
            })
    }
}
