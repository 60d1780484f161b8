//! Tournament configuration
//!
//! Two integers shape the tree (`num_leaves`, `bandwidth`); `seed` drives the
//! random filter applied to near-zero importance weights. Values can come from
//! code or from any serde format; negative sizes are rejected either way.

use cascade_tree::MAX_LEAVES;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct TournamentConfig {
    num_leaves: u32,
    bandwidth: u32,
    seed: u64,
}

impl TournamentConfig {
    /// Validate signed sizes as they arrive from callers or config files
    pub fn new(num_leaves: i64, bandwidth: i64) -> Result<Self, ConfigError> {
        if num_leaves < 0 {
            return Err(ConfigError::Negative { field: "num_leaves", value: num_leaves });
        }
        if bandwidth < 0 {
            return Err(ConfigError::Negative { field: "bandwidth", value: bandwidth });
        }
        if num_leaves > i64::from(MAX_LEAVES) {
            return Err(ConfigError::TooManyLeaves { num_leaves });
        }
        Ok(TournamentConfig {
            num_leaves: num_leaves as u32,
            // Anything past the leaf count merges nothing further.
            bandwidth: bandwidth.min(i64::from(u32::MAX)) as u32,
            seed: 0,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn num_leaves(&self) -> u32 {
        self.num_leaves
    }

    pub fn bandwidth(&self) -> u32 {
        self.bandwidth
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    num_leaves: i64,
    #[serde(default)]
    bandwidth: i64,
    #[serde(default)]
    seed: u64,
}

impl TryFrom<RawConfig> for TournamentConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        Ok(TournamentConfig::new(raw.num_leaves, raw.bandwidth)?.with_seed(raw.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = TournamentConfig::new(8, 2).unwrap().with_seed(42);
        assert_eq!(config.num_leaves(), 8);
        assert_eq!(config.bandwidth(), 2);
        assert_eq!(config.seed(), 42);
    }

    #[test]
    fn test_negative_values_rejected() {
        assert_eq!(
            TournamentConfig::new(-1, 0),
            Err(ConfigError::Negative { field: "num_leaves", value: -1 })
        );
        assert_eq!(
            TournamentConfig::new(4, -2),
            Err(ConfigError::Negative { field: "bandwidth", value: -2 })
        );
    }

    #[test]
    fn test_oversized_tree_rejected() {
        let too_many = i64::from(MAX_LEAVES) + 1;
        assert_eq!(
            TournamentConfig::new(too_many, 0),
            Err(ConfigError::TooManyLeaves { num_leaves: too_many })
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config: TournamentConfig = toml::from_str("num_leaves = 16\nbandwidth = 2\nseed = 7\n").unwrap();
        assert_eq!(config, TournamentConfig::new(16, 2).unwrap().with_seed(7));

        let text = toml::to_string(&config).unwrap();
        let back: TournamentConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_toml_defaults_and_negative() {
        let config: TournamentConfig = toml::from_str("num_leaves = 4").unwrap();
        assert_eq!(config.bandwidth(), 0);
        assert_eq!(config.seed(), 0);

        let err = toml::from_str::<TournamentConfig>("num_leaves = -4").unwrap_err();
        assert!(err.to_string().contains("num_leaves must be non-negative"), "{}", err);
    }
}
