//! Game configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::status::DEFAULT_TARGET;

/// Largest supported board side.
pub const MAX_SIZE: usize = 16;

/// Board size, winning tile and RNG seed for a [`Game`](crate::Game).
///
/// Missing JSON fields fall back to the defaults (4×4, 2048, seed 42).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub size: usize,
    pub target: u32,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: 4,
            target: DEFAULT_TARGET,
            seed: 42,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_SIZE).contains(&self.size) {
            return Err(ConfigError::Size {
                size: self.size,
                max: MAX_SIZE,
            });
        }
        if self.target < 4 || !self.target.is_power_of_two() {
            return Err(ConfigError::Target(self.target));
        }
        Ok(())
    }

    /// Parse a JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
