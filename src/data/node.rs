//! Data node types and structures.

use super::AttributeValue;

/// Index of a node within one tree generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position in the tree's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Type of node in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Group node (the synthetic root is a group too).
    Group,
    /// Array dataset.
    Dataset,
    /// Key/value attribute of a group or dataset.
    Attribute,
}

/// Opaque marker for a dataset that is currently plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlotHandle(pub u64);

/// Background highlight requested for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Default background.
    None,
    /// Dataset shown in a plot.
    Plotted,
    /// Attribute row.
    Attribute,
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone)]
pub enum NodeContent<H> {
    /// Group with its store handle.
    Group {
        /// Store handle.
        handle: H,
    },
    /// Dataset with its store handle and read-only shape.
    Dataset {
        /// Store handle.
        handle: H,
        /// Dimension sizes.
        shape: Vec<usize>,
        /// Set while the dataset is plotted.
        plot: Option<PlotHandle>,
    },
    /// Attribute value; the key is the node name.
    Attribute {
        /// Stored value.
        value: AttributeValue,
    },
}

/// A node in the data tree.
#[derive(Debug, Clone)]
pub struct Node<H> {
    pub(crate) name: String,
    pub(crate) path: Vec<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) junk: bool,
    pub(crate) content: NodeContent<H>,
}

impl<H> Node<H> {
    pub(crate) fn new(name: String, path: Vec<String>, content: NodeContent<H>) -> Self {
        Self {
            name,
            path,
            parent: None,
            children: Vec::new(),
            junk: false,
            content,
        }
    }

    /// Node name (attribute key for attributes).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path segments from the root.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Full path as a single string, e.g. `/scan/counts`.
    pub fn full_path(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    /// Type of node.
    pub fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::Group { .. } => NodeKind::Group,
            NodeContent::Dataset { .. } => NodeKind::Dataset,
            NodeContent::Attribute { .. } => NodeKind::Attribute,
        }
    }

    /// Kind-specific payload.
    pub fn content(&self) -> &NodeContent<H> {
        &self.content
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes: attributes first, then members.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The node's own junk flag, ignoring ancestors.
    pub fn own_junk(&self) -> bool {
        self.junk
    }

    /// Check if this node is a group.
    pub fn is_group(&self) -> bool {
        self.kind() == NodeKind::Group
    }

    /// Check if this node is a dataset.
    pub fn is_dataset(&self) -> bool {
        self.kind() == NodeKind::Dataset
    }

    /// Check if this node is an attribute.
    pub fn is_attribute(&self) -> bool {
        self.kind() == NodeKind::Attribute
    }

    /// Store handle for groups and datasets.
    pub fn handle(&self) -> Option<&H> {
        match &self.content {
            NodeContent::Group { handle } | NodeContent::Dataset { handle, .. } => Some(handle),
            NodeContent::Attribute { .. } => None,
        }
    }

    /// Dataset shape.
    pub fn shape(&self) -> Option<&[usize]> {
        match &self.content {
            NodeContent::Dataset { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Attribute value.
    pub fn value(&self) -> Option<&AttributeValue> {
        match &self.content {
            NodeContent::Attribute { value } => Some(value),
            _ => None,
        }
    }

    /// Plot marker of a dataset.
    pub fn plot(&self) -> Option<PlotHandle> {
        match &self.content {
            NodeContent::Dataset { plot, .. } => *plot,
            _ => None,
        }
    }

    /// The two display columns of this row.
    ///
    /// Groups show only their name; datasets add their shape and attributes
    /// their value. Only the first column is editable, except for attribute
    /// values.
    pub fn columns(&self) -> [String; 2] {
        let second = match &self.content {
            NodeContent::Group { .. } => String::new(),
            NodeContent::Dataset { shape, .. } => shape_string(shape),
            NodeContent::Attribute { value } => value.to_string(),
        };
        [self.name.clone(), second]
    }

    /// Whether a display column accepts edits.
    pub fn is_editable(&self, column: usize) -> bool {
        match column {
            0 => self.parent.is_some(),
            1 => self.is_attribute(),
            _ => false,
        }
    }

    /// Background highlight for this row.
    pub fn background(&self) -> Background {
        match &self.content {
            NodeContent::Dataset { plot: Some(_), .. } => Background::Plotted,
            NodeContent::Attribute { .. } => Background::Attribute,
            _ => Background::None,
        }
    }
}

/// Format a shape the way array libraries print tuples: `(3,)`, `(4, 5)`, `()`.
pub fn shape_string(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({},)", n),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        },
    }
}
