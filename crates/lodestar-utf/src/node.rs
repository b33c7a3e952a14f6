//! Arena-backed UTF node tree.
//!
//! Nodes live in one vector and refer to each other by [`NodeId`]. The
//! parent link is a plain index, so upward lookups never hold ownership.

use std::fmt;

/// Index of a node inside its [`UtfTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in a UTF tree.
#[derive(Debug, Clone, PartialEq)]
pub struct UtfNode {
    name: Option<String>,
    payload: Option<Vec<u8>>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl UtfNode {
    /// Node name; `None` only for the synthetic root.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Leaf payload, if this node is a leaf.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Whether this node carries a payload.
    pub fn is_leaf(&self) -> bool {
        self.payload.is_some()
    }

    /// Child nodes in file order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The parent node; `None` for the synthetic root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name))
    }
}

/// A parsed UTF file.
///
/// The root is a synthetic unnamed node; the file's own top-level nodes
/// (normally a single node named `\`) are its children.
#[derive(Debug, Clone, PartialEq)]
pub struct UtfTree {
    nodes: Vec<UtfNode>,
}

impl Default for UtfTree {
    fn default() -> Self {
        Self::new()
    }
}

impl UtfTree {
    /// Id of the synthetic root.
    pub const ROOT: NodeId = NodeId(0);

    /// Create a tree holding only the synthetic root.
    pub fn new() -> Self {
        Self {
            nodes: vec![UtfNode {
                name: None,
                payload: None,
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    /// Append a node under `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn push(&mut self, parent: NodeId, name: impl Into<String>, payload: Option<Vec<u8>>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(UtfNode {
            name: Some(name.into()),
            payload,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The synthetic root.
    pub fn root(&self) -> &UtfNode {
        &self.nodes[0]
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&UtfNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, including the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the synthetic root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Name of a node, or `""` for the root or an unknown id.
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).and_then(UtfNode::name).unwrap_or("")
    }

    /// Payload of a node, if it is a leaf.
    pub fn payload(&self, id: NodeId) -> Option<&[u8]> {
        self.node(id).and_then(UtfNode::payload)
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(UtfNode::parent)
    }

    /// Children of a node, paired with the nodes themselves.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &UtfNode)> {
        self.node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&child| (child, &self.nodes[child.0]))
    }

    /// Find a direct child by name, ignoring ASCII case.
    pub fn find_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id).find(|(_, n)| n.is_named(name)).map(|(child, _)| child)
    }

    /// Resolve a backslash-separated path such as `\Cmpnd\Cons\Fix`.
    ///
    /// Paths start at the file's `\` node when there is one, otherwise at
    /// the synthetic root.
    pub fn find_path(&self, path: &str) -> Option<NodeId> {
        let mut current = self.find_child(Self::ROOT, "\\").unwrap_or(Self::ROOT);
        for part in path.split('\\').filter(|p| !p.is_empty()) {
            current = self.find_child(current, part)?;
        }
        Some(current)
    }

    /// Every node with the given name, in pre-order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.iter().filter(move |&id| self.nodes[id.0].is_named(name))
    }

    /// Backslash path of a node, the inverse of [`UtfTree::find_path`].
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else { break };
            match node.name() {
                Some(name) if name != "\\" => parts.push(name),
                _ => {}
            }
            current = node.parent;
        }
        parts.reverse();
        format!("\\{}", parts.join("\\"))
    }

    /// Pre-order traversal of all real nodes (the synthetic root is skipped).
    pub fn iter(&self) -> UtfTreeIter<'_> {
        let mut stack: Vec<NodeId> = self.root().children.clone();
        stack.reverse();
        UtfTreeIter { tree: self, stack }
    }
}

/// Pre-order iterator over a [`UtfTree`].
pub struct UtfTreeIter<'a> {
    tree: &'a UtfTree,
    stack: Vec<NodeId>,
}

impl Iterator for UtfTreeIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        self.stack.extend(self.tree.nodes[id.0].children.iter().rev());
        Some(id)
    }
}
