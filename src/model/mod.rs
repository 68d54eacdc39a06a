//! Hierarchy model.
//!
//! [`HierarchyModel`] owns a store and the [`Tree`] built from it, and keeps
//! the two consistent across structural edits. Every edit either completes in
//! both the store and the tree, or leaves both as they were.

mod build;
mod tree;

pub use build::build;
pub use tree::{Ancestors, Tree};

use crate::config::TreeConfig;
use crate::data::{
    AttributeValue, HierarchicalStore, Node, NodeContent, NodeId, NodeKind, PlotHandle,
};
use crate::error::{H5ScopeError, Result};

/// Tree model mirroring a hierarchical store.
#[derive(Debug)]
pub struct HierarchyModel<S: HierarchicalStore> {
    store: S,
    tree: Tree<S::Handle>,
    config: TreeConfig,
}

impl<S: HierarchicalStore> HierarchyModel<S> {
    /// Build a model over `store` with the default reserved keys.
    pub fn new(store: S) -> Result<Self> {
        Self::with_config(store, TreeConfig::default())
    }

    /// Build a model over `store` with a custom tree configuration.
    pub fn with_config(store: S, config: TreeConfig) -> Result<Self> {
        let tree = build(&store, &config, 0)?;
        tracing::debug!(nodes = tree.len(), "built tree");
        Ok(Self {
            store,
            tree,
            config,
        })
    }

    /// The current tree.
    pub fn tree(&self) -> &Tree<S::Handle> {
        &self.tree
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the store. Call [`reload`](Self::reload) after
    /// changing it so the tree catches up.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the model, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Tree configuration in use.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Rebuild the whole tree from the store. Node ids from the previous
    /// generation are invalid afterwards. On error the old tree is kept.
    pub fn reload(&mut self) -> Result<()> {
        let generation = self.tree.generation() + 1;
        self.tree = build(&self.store, &self.config, generation)?;
        tracing::debug!(generation, nodes = self.tree.len(), "reloaded tree");
        Ok(())
    }

    /// Effective junk flag of a node.
    pub fn is_junk(&self, id: NodeId) -> bool {
        self.tree.is_junk(id)
    }

    /// Look up a node by full path string.
    pub fn find(&self, full_path: &str) -> Option<NodeId> {
        self.tree.find(full_path)
    }

    /// Rename a node within its parent.
    ///
    /// Renaming to the current name does nothing. Attribute nodes are
    /// renamed through [`rename_attribute_key`](Self::rename_attribute_key).
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<()> {
        let node = self.node(id)?;
        if node.is_attribute() {
            return self.rename_attribute_key(id, new_name);
        }
        let parent = node
            .parent()
            .ok_or_else(|| H5ScopeError::invalid_move("/", "the root cannot be renamed"))?;
        self.relink(id, parent, new_name)
    }

    /// Move a group or dataset under another group, optionally renaming it.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        new_name: Option<&str>,
    ) -> Result<()> {
        let node = self.node(id)?;
        if node.is_attribute() {
            return Err(H5ScopeError::wrong_kind(
                node.full_path(),
                NodeKind::Attribute,
                "group or dataset",
            ));
        }
        let name = new_name.unwrap_or(node.name()).to_string();
        self.relink(id, new_parent, &name)
    }

    /// Apply an edit made in a display column: column 0 renames, column 1
    /// sets an attribute value. Empty names are ignored.
    pub fn edit(&mut self, id: NodeId, column: usize, text: &str) -> Result<()> {
        match column {
            0 if text.is_empty() => Ok(()),
            0 => self.rename(id, text),
            1 => self.set_attribute_value(id, text).map(|_| ()),
            _ => Err(H5ScopeError::wrong_kind(
                self.tree.full_path(id),
                self.node(id)?.kind(),
                "editable column",
            )),
        }
    }

    fn relink(&mut self, id: NodeId, target: NodeId, new_name: &str) -> Result<()> {
        let node = self.node(id)?;
        let path = node.full_path();
        let old_name = node.name().to_string();
        let old_parent = node
            .parent()
            .ok_or_else(|| H5ScopeError::invalid_move(path.clone(), "the root cannot be moved"))?;

        if target == old_parent && old_name == new_name {
            return Ok(());
        }
        if new_name.is_empty() || new_name.contains('/') {
            return Err(H5ScopeError::invalid_move(path, "names must be non-empty and free of '/'"));
        }

        let handle = self.handle(id, "group or dataset")?;
        let target_handle = self.handle(target, "group")?;
        if !self.node(target)?.is_group() {
            return Err(H5ScopeError::wrong_kind(
                self.tree.full_path(target),
                self.node(target)?.kind(),
                "group",
            ));
        }
        if target == id || self.tree.is_ancestor(id, target) {
            return Err(H5ScopeError::invalid_move(path, "target lies inside the moved subtree"));
        }
        let old_parent_handle = self.handle(old_parent, "group")?;

        // Attribute rows share the path namespace with members.
        let member_taken = self
            .store
            .list_children(&target_handle)?
            .iter()
            .any(|k| k == new_name);
        let attribute_taken = !self.config.is_reserved(new_name)
            && self
                .store
                .list_attributes(&target_handle)?
                .iter()
                .any(|k| k == new_name);
        if member_taken || attribute_taken {
            return Err(H5ScopeError::name_conflict(self.tree.full_path(target), new_name));
        }

        // New link first, so a failure never loses the object.
        self.store.create_reference(&target_handle, new_name, &handle)?;
        if let Err(err) = self.store.delete_entry(&old_parent_handle, &old_name) {
            if let Err(rollback) = self.store.delete_entry(&target_handle, new_name) {
                tracing::warn!(
                    %path,
                    new_name,
                    error = %rollback,
                    "failed to roll back new reference"
                );
            }
            return Err(err);
        }

        self.tree.relink(id, target, new_name);
        tracing::debug!(from = %path, to = %self.tree.full_path(id), "moved node");
        Ok(())
    }

    /// Move an attribute's value to a new key of the same owner.
    pub fn rename_attribute_key(&mut self, id: NodeId, new_key: &str) -> Result<()> {
        let (owner, old_key) = self.attribute_owner(id)?;
        if old_key == new_key {
            return Ok(());
        }
        if self.config.is_reserved(new_key) {
            return Err(H5ScopeError::ReservedKey {
                key: new_key.to_string(),
            });
        }

        let owner_id = self.tree.parent(id).unwrap_or(self.tree.root());
        let key_taken = self
            .store
            .list_attributes(&owner)?
            .iter()
            .any(|k| k == new_key);
        let member_taken = self.tree[owner_id].is_group()
            && self
                .store
                .list_children(&owner)?
                .iter()
                .any(|k| k == new_key);
        if key_taken || member_taken {
            return Err(H5ScopeError::name_conflict(self.tree.full_path(owner_id), new_key));
        }

        let value = self.store.get_attribute(&owner, &old_key)?;
        self.store.set_attribute(&owner, new_key, value.clone())?;
        if let Err(err) = self.store.delete_attribute(&owner, &old_key) {
            if let Err(rollback) = self.store.delete_attribute(&owner, new_key) {
                tracing::warn!(
                    %old_key,
                    new_key,
                    error = %rollback,
                    "failed to roll back attribute key"
                );
            }
            return Err(err);
        }

        self.tree.relink(id, owner_id, new_key);
        self.tree.node_mut(id).content = NodeContent::Attribute { value };
        tracing::debug!(%old_key, new_key, "renamed attribute");
        Ok(())
    }

    /// Parse `raw_text` as integer, float or text and store it as the
    /// attribute's value. Returns the stored value.
    pub fn set_attribute_value(&mut self, id: NodeId, raw_text: &str) -> Result<AttributeValue> {
        let (owner, key) = self.attribute_owner(id)?;
        let value = AttributeValue::parse(raw_text);

        self.store.set_attribute(&owner, &key, value.clone())?;
        self.tree.node_mut(id).content = NodeContent::Attribute {
            value: value.clone(),
        };
        tracing::debug!(%key, ?value, "set attribute value");
        Ok(value)
    }

    /// Set or clear the own junk flag of a group or dataset through the
    /// reserved attribute.
    pub fn set_junk(&mut self, id: NodeId, junk: bool) -> Result<()> {
        let node = self.node(id)?;
        if node.parent().is_none() || node.is_attribute() {
            return Err(H5ScopeError::wrong_kind(
                node.full_path(),
                node.kind(),
                "non-root group or dataset",
            ));
        }
        if node.own_junk() == junk {
            return Ok(());
        }

        let handle = self.handle(id, "group or dataset")?;
        let key = self.config.junk_key.clone();
        if junk {
            self.store
                .set_attribute(&handle, &key, AttributeValue::Integer(1))?;
        } else if self.store.list_attributes(&handle)?.contains(&key) {
            self.store.delete_attribute(&handle, &key)?;
        }

        self.tree.node_mut(id).junk = junk;
        tracing::debug!(path = %self.tree.full_path(id), junk, "set junk flag");
        Ok(())
    }

    /// Mark a dataset as plotted, or clear the mark.
    pub fn set_plot_marker(&mut self, id: NodeId, marker: Option<PlotHandle>) -> Result<()> {
        let node = self.node(id)?;
        let path = node.full_path();
        let kind = node.kind();
        match &mut self.tree.node_mut(id).content {
            NodeContent::Dataset { plot, .. } => {
                *plot = marker;
                Ok(())
            },
            _ => Err(H5ScopeError::wrong_kind(path, kind, "dataset")),
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node<S::Handle>> {
        self.tree
            .get(id)
            .ok_or_else(|| H5ScopeError::node_not_found(format!("#{}", id.index())))
    }

    fn handle(&self, id: NodeId, expected: &'static str) -> Result<S::Handle> {
        let node = self.node(id)?;
        node.handle()
            .cloned()
            .ok_or_else(|| H5ScopeError::wrong_kind(node.full_path(), node.kind(), expected))
    }

    /// Handle of the group/dataset owning an attribute node, and its key.
    fn attribute_owner(&self, id: NodeId) -> Result<(S::Handle, String)> {
        let node = self.node(id)?;
        if !node.is_attribute() {
            return Err(H5ScopeError::wrong_kind(node.full_path(), node.kind(), "attribute"));
        }
        let key = node.name().to_string();
        let owner = node
            .parent()
            .ok_or_else(|| H5ScopeError::node_not_found(node.full_path()))?;
        Ok((self.handle(owner, "group or dataset")?, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MemoryStore, StoreOp};

    fn model() -> HierarchyModel<MemoryStore> {
        let mut store = MemoryStore::new();
        let root = store.root();
        let scan = store.add_group(root, "scan").unwrap();
        let counts = store.add_dataset(scan, "counts", &[4, 5]).unwrap();
        store
            .set_attribute(&counts, "units", AttributeValue::Text("Hz".into()))
            .unwrap();
        store
            .set_attribute(&counts, "CLASS", AttributeValue::Text("DIMENSION_SCALE".into()))
            .unwrap();
        store.add_group(root, "other").unwrap();
        HierarchyModel::new(store).unwrap()
    }

    #[test]
    fn build_skips_reserved_keys() {
        let model = model();
        let counts = model.find("/scan/counts").unwrap();
        let names: Vec<&str> = model.tree()[counts]
            .children()
            .iter()
            .map(|&c| model.tree()[c].name())
            .collect();
        assert_eq!(names, vec!["units"]);
        assert_eq!(model.tree()[counts].shape(), Some(&[4, 5][..]));
    }

    #[test]
    fn rename_to_same_name_makes_no_store_calls() {
        let mut model = model();
        let scan = model.find("/scan").unwrap();
        // A pending failure would fire on any store call.
        model.store().fail_next(StoreOp::ListChildren);
        model.rename(scan, "scan").unwrap();
        assert_eq!(model.tree()[scan].full_path(), "/scan");
        assert!(model.store().list_children(&model.store().root()).is_err());
    }

    #[test]
    fn edit_dispatches_on_column() {
        let mut model = model();
        let units = model.find("/scan/counts/units").unwrap();

        model.edit(units, 1, "2.5").unwrap();
        assert_eq!(model.tree()[units].value(), Some(&AttributeValue::Float(2.5)));

        model.edit(units, 0, "unit").unwrap();
        assert_eq!(model.tree()[units].full_path(), "/scan/counts/unit");

        let scan = model.find("/scan").unwrap();
        model.edit(scan, 0, "").unwrap();
        assert_eq!(model.tree()[scan].name(), "scan");
        assert!(model.edit(scan, 1, "x").is_err());
    }

    #[test]
    fn plot_marker_only_on_datasets() {
        let mut model = model();
        let counts = model.find("/scan/counts").unwrap();
        let scan = model.find("/scan").unwrap();

        model.set_plot_marker(counts, Some(PlotHandle(1))).unwrap();
        assert_eq!(model.tree()[counts].plot(), Some(PlotHandle(1)));
        assert!(model.set_plot_marker(scan, Some(PlotHandle(2))).is_err());
    }

    #[test]
    fn reload_bumps_generation() {
        let mut model = model();
        assert_eq!(model.tree().generation(), 0);
        let root = model.store().root();
        model.store_mut().add_group(root, "late").unwrap();
        model.reload().unwrap();
        assert_eq!(model.tree().generation(), 1);
        assert!(model.find("/late").is_some());
    }
}
