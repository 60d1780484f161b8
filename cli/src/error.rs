use std::path::PathBuf;

use cascade_engine::{ConfigError, EngineError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("route needs at least {needed} scores, got {given}")]
    NotEnoughScores { needed: usize, given: usize },
}
