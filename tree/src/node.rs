//! Node definitions for the tournament tree
//!
//! Nodes are stored in a flat, heap-ordered array indexed by [`NodeId`]. A
//! built tree is immutable; per-node learner state lives elsewhere and is
//! addressed by the same id.

use std::fmt;

/// Node ID type (index into flat array storage, also the learner offset)
pub type NodeId = u32;

/// What a node does when an example is routed through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Terminal node standing for one action
    Leaf,
    /// Decision node with its own binary classifier
    Internal,
    /// Always routes to its left child; owns no classifier
    LeftOnly,
    /// Always routes to its right child; owns no classifier
    RightOnly,
}

/// Branch taken at an internal node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The other branch
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One position in the tree.
///
/// Leaves store `left_id == right_id == 0`; the root stores itself as parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeNode {
    pub id: NodeId,
    pub left_id: NodeId,
    pub right_id: NodeId,
    pub parent_id: NodeId,
    pub depth: u32,
    pub role: NodeRole,
}

impl TreeNode {
    pub fn new(
        id: NodeId,
        left_id: NodeId,
        right_id: NodeId,
        parent_id: NodeId,
        depth: u32,
        role: NodeRole,
    ) -> Self {
        TreeNode { id, left_id, right_id, parent_id, depth, role }
    }

    /// A fresh leaf hanging under `parent_id`
    pub fn leaf(id: NodeId, parent_id: NodeId, depth: u32) -> Self {
        TreeNode::new(id, 0, 0, parent_id, depth, NodeRole::Leaf)
    }

    pub fn is_leaf(&self) -> bool {
        self.role == NodeRole::Leaf
    }

    pub fn left_only(&self) -> bool {
        self.role == NodeRole::LeftOnly
    }

    pub fn right_only(&self) -> bool {
        self.role == NodeRole::RightOnly
    }

    /// True for internal nodes that own a trainable classifier
    pub fn is_decision(&self) -> bool {
        self.role == NodeRole::Internal
    }

    /// Child id on the given side (meaningless for leaves)
    pub fn child(&self, side: Side) -> NodeId {
        match side {
            Side::Left => self.left_id,
            Side::Right => self.right_id,
        }
    }

    /// Which side of this node `child` hangs on, if it is a child at all
    pub fn side_of(&self, child: NodeId) -> Option<Side> {
        if self.is_leaf() {
            None
        } else if child == self.left_id {
            Some(Side::Left)
        } else if child == self.right_id {
            Some(Side::Right)
        } else {
            None
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.role {
            NodeRole::Leaf => "leaf",
            NodeRole::Internal => "internal",
            NodeRole::LeftOnly => "left-only",
            NodeRole::RightOnly => "right-only",
        };
        write!(
            f,
            "{{{},{},{}, {}, {}, {}}}",
            self.id, self.left_id, self.right_id, self.parent_id, self.depth, role
        )
    }
}

/// Minimum-depth binary tree over `num_leaves` actions
///
/// Contains a flat array of nodes; `nodes[id].id == id` for every node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinaryTree {
    nodes: Vec<TreeNode>,
    num_leaves: u32,
    depth: u32,
}

impl BinaryTree {
    pub(crate) fn from_parts(nodes: Vec<TreeNode>, num_leaves: u32, depth: u32) -> Self {
        BinaryTree { nodes, num_leaves, depth }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id as usize)
    }

    /// All nodes in id order
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// The root, or `None` for an empty tree
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn num_leaves(&self) -> u32 {
        self.num_leaves
    }

    pub fn internal_node_count(&self) -> u32 {
        self.num_leaves.saturating_sub(1)
    }

    /// Depth of the deepest leaf (0 for empty and single-node trees)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Leaf standing for `action` (1-based), if it is in range
    pub fn leaf_for_action(&self, action: u32) -> Option<NodeId> {
        if action == 0 || action > self.num_leaves {
            return None;
        }
        Some(action - 1 + self.internal_node_count())
    }

    /// Action (1-based) represented by leaf `id`
    pub fn action_for_leaf(&self, id: NodeId) -> Option<u32> {
        match self.get(id) {
            Some(node) if node.is_leaf() => Some(id - self.internal_node_count() + 1),
            _ => None,
        }
    }

    /// The other child of `id`'s parent (`None` for the root)
    pub fn sibling(&self, id: NodeId) -> Option<&TreeNode> {
        let node = self.get(id)?;
        if node.id == node.parent_id {
            return None;
        }
        let parent = self.get(node.parent_id)?;
        let side = parent.side_of(id)?;
        self.get(parent.child(side.opposite()))
    }
}
