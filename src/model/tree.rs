//! Arena tree of nodes.

use crate::data::{Node, NodeContent, NodeId};
use std::ops::Index;

/// Nodes of one generation, addressed by [`NodeId`].
///
/// The node at index 0 is the synthetic root: an unnamed group standing for
/// the store's root. It is never displayed.
#[derive(Debug, Clone)]
pub struct Tree<H> {
    nodes: Vec<Node<H>>,
    generation: u64,
}

impl<H> Tree<H> {
    pub(crate) fn with_root(handle: H, generation: u64) -> Self {
        Self {
            nodes: vec![Node::new(
                String::new(),
                Vec::new(),
                NodeContent::Group { handle },
            )],
            generation,
        }
    }

    /// Append `node` as the last child of `parent`.
    pub(crate) fn push(&mut self, parent: NodeId, mut node: Node<H>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<H> {
        &mut self.nodes[id.0]
    }

    /// The synthetic root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Rebuild counter of the model this tree came from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Get a node, if `id` belongs to this tree.
    pub fn get(&self, id: NodeId) -> Option<&Node<H>> {
        self.nodes.get(id.0)
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Walk from the parent of `id` up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, H> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Whether `ancestor` lies on the path from `id` to the root.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Effective junk flag: the node's own flag or any ancestor's.
    ///
    /// Computed on every call because ancestors can change after the node
    /// was built.
    pub fn is_junk(&self, id: NodeId) -> bool {
        match self.get(id) {
            Some(node) => node.junk || self.ancestors(id).any(|a| self.nodes[a.0].junk),
            None => false,
        }
    }

    /// Full path string of a node.
    pub fn full_path(&self, id: NodeId) -> String {
        self.get(id).map(Node::full_path).unwrap_or_default()
    }

    /// All nodes below `id` in depth-first display order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(id) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev().copied());
        }
        out
    }

    /// Every displayable node in depth-first order (the root is skipped).
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root()).into_iter()
    }

    /// Direct child of `parent` with the given name. A group or dataset wins
    /// over an attribute row of the same name.
    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let mut named = self
            .get(parent)?
            .children
            .iter()
            .copied()
            .filter(|&c| self.nodes[c.0].name == name);
        let first = named.next()?;
        if !self.nodes[first.0].is_attribute() {
            return Some(first);
        }
        Some(named.find(|&c| !self.nodes[c.0].is_attribute()).unwrap_or(first))
    }

    /// Look up a node by full path string, e.g. `/scan/counts`.
    pub fn find(&self, full_path: &str) -> Option<NodeId> {
        full_path
            .split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self.root(), |id, segment| self.child_named(id, segment))
    }

    /// Move `id` under `new_parent` with `new_name` and re-derive the paths
    /// of its whole subtree. Keeps the sibling position when the parent is
    /// unchanged.
    pub(crate) fn relink(&mut self, id: NodeId, new_parent: NodeId, new_name: &str) {
        let old_parent = self.nodes[id.0].parent;
        if old_parent != Some(new_parent) {
            if let Some(old) = old_parent {
                self.nodes[old.0].children.retain(|&c| c != id);
            }
            self.nodes[new_parent.0].children.push(id);
            self.nodes[id.0].parent = Some(new_parent);
        }
        self.nodes[id.0].name = new_name.to_string();
        self.rederive_paths(id);
    }

    fn rederive_paths(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let mut path = match self.nodes[next.0].parent {
                Some(p) => self.nodes[p.0].path.clone(),
                None => Vec::new(),
            };
            path.push(self.nodes[next.0].name.clone());
            self.nodes[next.0].path = path;
            stack.extend(self.nodes[next.0].children.iter().copied());
        }
    }
}

impl<H> Index<NodeId> for Tree<H> {
    type Output = Node<H>;

    fn index(&self, id: NodeId) -> &Node<H> {
        &self.nodes[id.0]
    }
}

/// Iterator over the ancestors of a node, nearest first.
#[derive(Debug)]
pub struct Ancestors<'a, H> {
    tree: &'a Tree<H>,
    next: Option<NodeId>,
}

impl<H> Iterator for Ancestors<'_, H> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, path: &[&str]) -> Node<()> {
        Node::new(
            name.to_string(),
            path.iter().map(|s| s.to_string()).collect(),
            NodeContent::Group { handle: () },
        )
    }

    fn sample() -> (Tree<()>, NodeId, NodeId, NodeId) {
        let mut tree = Tree::with_root((), 0);
        let root = tree.root();
        let a = tree.push(root, group("a", &["a"]));
        let b = tree.push(a, group("b", &["a", "b"]));
        let c = tree.push(b, group("c", &["a", "b", "c"]));
        (tree, a, b, c)
    }

    #[test]
    fn ancestors_and_find() {
        let (tree, a, b, c) = sample();
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![b, a, tree.root()]);
        assert_eq!(tree.find("/a/b/c"), Some(c));
        assert_eq!(tree.find("/"), Some(tree.root()));
        assert_eq!(tree.find("/a/x"), None);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![a, b, c]);
    }

    #[test]
    fn junk_is_inherited() {
        let (mut tree, a, b, c) = sample();
        assert!(!tree.is_junk(c));

        tree.node_mut(b).junk = true;
        assert!(!tree.is_junk(a));
        assert!(tree.is_junk(b));
        assert!(tree.is_junk(c));
        assert!(!tree[c].own_junk());
    }

    #[test]
    fn find_prefers_members_over_attribute_rows() {
        let (mut tree, a, _, _) = sample();
        let attr = tree.push(
            a,
            Node::new(
                "b".to_string(),
                vec!["a".to_string(), "b".to_string()],
                NodeContent::Attribute {
                    value: crate::data::AttributeValue::Integer(1),
                },
            ),
        );
        // Attribute rows come before members among the children.
        tree.node_mut(a).children.rotate_right(1);
        assert_eq!(tree[a].children()[0], attr);

        let member = tree.find("/a/b").unwrap();
        assert!(tree[member].is_group());
        assert_eq!(tree.find("/a/b/c").map(|c| tree[c].name().to_string()), Some("c".into()));
    }

    #[test]
    fn relink_rederives_subtree_paths() {
        let (mut tree, a, b, c) = sample();
        let root = tree.root();

        tree.relink(b, root, "moved");
        assert_eq!(tree[b].full_path(), "/moved");
        assert_eq!(tree[c].full_path(), "/moved/c");
        assert!(tree[a].children().is_empty());
        assert_eq!(tree[root].children(), &[a, b]);

        tree.relink(a, root, "renamed");
        assert_eq!(tree[root].children(), &[a, b]);
        assert_eq!(tree.find("/renamed"), Some(a));
    }
}
