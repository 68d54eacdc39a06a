//! Text rendering of the visible tree.

use crate::data::{NodeContent, NodeId};
use crate::model::Tree;
use crate::navigation::VisibleSet;

/// Render the displayed part of `tree` as an indented outline.
///
/// Groups end with `/`, datasets show their shape and attribute rows their
/// value. Nodes carrying their own junk flag are marked `[junk]`.
pub fn format_outline<H>(tree: &Tree<H>, visible: &VisibleSet) -> String {
    let mut result = String::new();
    let children = visible_children(tree, visible, tree.root());
    for (i, &child) in children.iter().enumerate() {
        format_tree_recursive(tree, visible, child, "", i == children.len() - 1, &mut result);
    }
    result
}

fn visible_children<H>(tree: &Tree<H>, visible: &VisibleSet, id: NodeId) -> Vec<NodeId> {
    tree[id]
        .children()
        .iter()
        .copied()
        .filter(|&c| visible.contains(c))
        .collect()
}

fn display_name<H>(tree: &Tree<H>, id: NodeId) -> String {
    let node = &tree[id];
    let [name, second] = node.columns();
    let mut label = match node.content() {
        NodeContent::Group { .. } => format!("{}/", name),
        NodeContent::Dataset { .. } => format!("{} {}", name, second),
        NodeContent::Attribute { .. } => format!("@{} = {}", name, second),
    };
    if node.own_junk() {
        label.push_str(" [junk]");
    }
    label
}

fn format_tree_recursive<H>(
    tree: &Tree<H>,
    visible: &VisibleSet,
    id: NodeId,
    prefix: &str,
    is_last: bool,
    result: &mut String,
) {
    let connector = if is_last { "└── " } else { "├── " };
    result.push_str(&format!("{}{}{}\n", prefix, connector, display_name(tree, id)));

    let new_prefix = format!("{}{}   ", prefix, if is_last { " " } else { "│" });

    let children = visible_children(tree, visible, id);
    for (i, &child) in children.iter().enumerate() {
        let is_last_child = i == children.len() - 1;
        format_tree_recursive(tree, visible, child, &new_prefix, is_last_child, result);
    }
}
