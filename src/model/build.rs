//! Building a tree from a store.

use super::Tree;
use crate::config::TreeConfig;
use crate::data::{EntryKind, HierarchicalStore, Node, NodeContent, NodeId};
use crate::error::Result;

/// Build the node tree for everything below the store's root.
///
/// Each group or dataset gets its attribute rows first, then its members in
/// store order. Reserved keys never become rows; the junk key only sets the
/// owner's own flag. The root's attributes are not read.
pub fn build<S: HierarchicalStore>(
    store: &S,
    config: &TreeConfig,
    generation: u64,
) -> Result<Tree<S::Handle>> {
    let mut tree = Tree::with_root(store.root(), generation);
    let root = tree.root();
    add_members(store, config, &mut tree, root, &store.root())?;
    Ok(tree)
}

fn add_members<S: HierarchicalStore>(
    store: &S,
    config: &TreeConfig,
    tree: &mut Tree<S::Handle>,
    parent: NodeId,
    group: &S::Handle,
) -> Result<()> {
    for name in store.list_children(group)? {
        let entry = store.get(group, &name)?;
        let path = child_path(tree, parent, &name);

        match entry.kind {
            EntryKind::Group => {
                let content = NodeContent::Group {
                    handle: entry.handle.clone(),
                };
                let id = tree.push(parent, Node::new(name, path, content));
                add_attributes(store, config, tree, id, &entry.handle)?;
                add_members(store, config, tree, id, &entry.handle)?;
            },
            EntryKind::Dataset { shape } => {
                let content = NodeContent::Dataset {
                    handle: entry.handle.clone(),
                    shape,
                    plot: None,
                };
                let id = tree.push(parent, Node::new(name, path, content));
                add_attributes(store, config, tree, id, &entry.handle)?;
            },
        }
    }
    Ok(())
}

fn add_attributes<S: HierarchicalStore>(
    store: &S,
    config: &TreeConfig,
    tree: &mut Tree<S::Handle>,
    owner: NodeId,
    handle: &S::Handle,
) -> Result<()> {
    for key in store.list_attributes(handle)? {
        if key == config.junk_key {
            let flag = store.get_attribute(handle, &key)?.is_truthy();
            tree.node_mut(owner).junk = flag;
            continue;
        }
        if config.is_reserved(&key) {
            continue;
        }

        let value = store.get_attribute(handle, &key)?;
        let path = child_path(tree, owner, &key);
        tree.push(owner, Node::new(key, path, NodeContent::Attribute { value }));
    }
    Ok(())
}

fn child_path<H>(tree: &Tree<H>, parent: NodeId, name: &str) -> Vec<String> {
    let mut path = tree[parent].path().to_vec();
    path.push(name.to_string());
    path
}
