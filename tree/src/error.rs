use thiserror::Error;

/// Errors raised while building a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The `2N-1` node ids would not fit a `NodeId`.
    #[error("{num_leaves} leaves exceed the largest supported tree")]
    TooManyLeaves { num_leaves: u32 },
}
