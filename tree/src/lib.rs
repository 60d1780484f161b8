//! cascade Tree Builder - tournament tree construction
//!
//! This crate builds the minimum-depth binary tree that the tournament
//! engine walks: one leaf per action, a binary decision at every internal
//! node, and optional bandwidth pass-through nodes. It has no knowledge of
//! learners or labels.

pub mod builder;
pub mod error;
pub mod node;

pub use builder::{build_tree, MAX_LEAVES};
pub use error::TreeError;
pub use node::{BinaryTree, NodeId, NodeRole, Side, TreeNode};
