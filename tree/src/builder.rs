//! Minimum-depth tree construction
//!
//! Internal node `i` owns children `2i+1` and `2i+2`, so ids are assigned
//! breadth-first and a tree over `N` leaves has exactly `2N-1` nodes. Ids
//! `0..N-1` are internal; the remaining `N` ids are leaves for actions `1..=N`.
//!
//! With a non-zero bandwidth, two internal nodes are marked as pass-through:
//! id `N/(2B) - 1` always routes right and id `N/B - 2` always routes left.
//! Neither owns a classifier, which shortens the decisions needed to reach
//! the smoothed ranges beneath them.

use tracing::debug;

use crate::error::TreeError;
use crate::node::{BinaryTree, NodeId, NodeRole, TreeNode};

/// Largest leaf count whose `2N-1` node ids still fit a [`NodeId`]
pub const MAX_LEAVES: u32 = 1 << 31;

/// Build the tree for `num_leaves` actions and the given bandwidth.
///
/// The result depends only on the two arguments; building twice yields equal
/// trees.
pub fn build_tree(num_leaves: u32, bandwidth: u32) -> Result<BinaryTree, TreeError> {
    if num_leaves > MAX_LEAVES {
        return Err(TreeError::TooManyLeaves { num_leaves });
    }
    if num_leaves == 0 {
        debug!("empty action range, tree has no nodes");
        return Ok(BinaryTree::default());
    }

    let node_count = 2 * num_leaves as usize - 1;
    let mut nodes: Vec<TreeNode> = Vec::with_capacity(node_count);

    // Root starts out as a leaf; it stays one only when there is a single action.
    nodes.push(TreeNode::leaf(0, 0, 0));

    let pass_through = PassThrough::new(num_leaves, bandwidth);
    let mut depth = 0u32;
    let mut level_end = 1u64;

    for i in 0..num_leaves - 1 {
        let left_id = 2 * i + 1;
        let right_id = 2 * i + 2;
        if u64::from(left_id) >= level_end {
            depth += 1;
            level_end = (1u64 << (depth + 1)) - 1;
        }

        let parent = &mut nodes[i as usize];
        parent.left_id = left_id;
        parent.right_id = right_id;
        parent.role = pass_through.role_of(i);

        nodes.push(TreeNode::leaf(left_id, i, depth));
        nodes.push(TreeNode::leaf(right_id, i, depth));
    }

    debug!(num_leaves, bandwidth, nodes = nodes.len(), depth, "built tournament tree");
    Ok(BinaryTree::from_parts(nodes, num_leaves, depth))
}

/// Ids of the bandwidth-driven pass-through nodes
#[derive(Debug, Clone, Copy)]
struct PassThrough {
    right_only: Option<NodeId>,
    left_only: Option<NodeId>,
}

impl PassThrough {
    fn new(num_leaves: u32, bandwidth: u32) -> Self {
        if bandwidth == 0 {
            return PassThrough { right_only: None, left_only: None };
        }
        let n = u64::from(num_leaves);
        let b = u64::from(bandwidth);
        // The root is never a pass-through node, so id 0 is dropped.
        let non_root = |id: Option<u64>| id.filter(|&id| id > 0).map(|id| id as NodeId);
        PassThrough {
            right_only: non_root((n / (2 * b)).checked_sub(1)),
            left_only: non_root((n / b).checked_sub(2)),
        }
    }

    /// Role of node `id` once it has children
    fn role_of(&self, id: NodeId) -> NodeRole {
        if self.right_only == Some(id) {
            NodeRole::RightOnly
        } else if self.left_only == Some(id) {
            NodeRole::LeftOnly
        } else {
            NodeRole::Internal
        }
    }
}
