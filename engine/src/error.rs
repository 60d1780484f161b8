use cascade_tree::TreeError;
use thiserror::Error;

/// Invalid tournament configuration; the tree is never built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: i64 },
    #[error("num_leaves {num_leaves} exceeds the largest supported tree")]
    TooManyLeaves { num_leaves: i64 },
}

/// Errors surfaced by the tournament engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// A label names an action outside `1..=num_actions`; the whole example is rejected.
    #[error("action {action} is outside 1..={num_actions}")]
    ActionOutOfRange { action: u32, num_actions: u32 },
    #[error("action {action} has probability {probability}, expected a value in (0, 1]")]
    InvalidProbability { action: u32, probability: f32 },
    /// Cost, or cost divided by probability, is NaN or infinite.
    #[error("action {action} has cost {cost}, which gives a non-finite importance weight")]
    InvalidCost { action: u32, cost: f32 },
}
