//! cascade Engine - tournament reduction over a binary action tree
//!
//! This crate turns a continuous-action contextual-bandit problem into a
//! cascade of binary decisions. It owns the tree built by `cascade-tree` and
//! drives an injected [`BaseLearner`]: one classifier slot per internal node,
//! addressed by node id.
//!
//! The engine is single-threaded per call. The tree is immutable after
//! construction, so independent predictions can share it across threads
//! (see [`Tournament::predict_batch`]).

pub mod config;
pub mod error;
pub mod label;
pub mod learner;
pub mod tournament;

pub use config::TournamentConfig;
pub use error::{ConfigError, EngineError};
pub use label::{CbClass, CbLabel};
pub use learner::{BaseLearner, BinaryLabel, LearnCall, ScriptedLearner};
pub use tournament::{Tournament, TreeStats, MIN_WEIGHT};
