//! Engine configuration.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::ConfigError;
use crate::session::PlayMode;
use crate::types::Mark;

/// Configuration for a game session.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// computer_delay_ms = 250
/// mode = "cpu"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct EngineConfig {
    /// Pause before a scheduled computer move is applied.
    #[serde(default = "default_computer_delay_ms")]
    computer_delay_ms: u64,

    /// Mark played by the computer in [`PlayMode::HumanVsComputer`].
    #[serde(default = "default_computer_mark")]
    computer_mark: Mark,

    /// Display name of the player holding X.
    #[serde(default = "default_player_x_name")]
    player_x_name: String,

    /// Display name of the player holding O.
    #[serde(default = "default_player_o_name")]
    player_o_name: String,

    /// Display name of the computer opponent.
    #[serde(default = "default_computer_name")]
    computer_name: String,

    /// Initial play mode.
    #[serde(default)]
    mode: PlayMode,
}

fn default_computer_delay_ms() -> u64 {
    500
}

fn default_computer_mark() -> Mark {
    Mark::O
}

fn default_player_x_name() -> String {
    "Player 1".to_string()
}

fn default_player_o_name() -> String {
    "Player 2".to_string()
}

fn default_computer_name() -> String {
    "CPU".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            computer_delay_ms: default_computer_delay_ms(),
            computer_mark: default_computer_mark(),
            player_x_name: default_player_x_name(),
            player_o_name: default_player_o_name(),
            computer_name: default_computer_name(),
            mode: PlayMode::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(mode = ?config.mode, computer_mark = %config.computer_mark, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every display name is non-empty.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("player_x_name", &self.player_x_name),
            ("player_o_name", &self.player_o_name),
            ("computer_name", &self.computer_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::new(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }

    /// The computer move delay as a [`Duration`].
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }
}
