//! Configuration system for RotaForge.
//!
//! Load planner configuration from TOML or YAML files to control the tick
//! length, solver termination, and the resource meter rules without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use rotaforge_config::RotaforgeConfig;
//! use std::time::Duration;
//!
//! let config = RotaforgeConfig::from_toml_str(r#"
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [resource.ultimate]
//!     requirement = "at_least"
//!     level = 91
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(30));
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use rotaforge_config::RotaforgeConfig;
//!
//! let config = RotaforgeConfig::load("rotaforge.toml").unwrap_or_default();
//! ```

mod resource;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rotaforge_core::{RotaforgeError, DEFAULT_TICK_LENGTH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use resource::{
    BasicConfig, BuffConfig, RequirementKind, ResourceConfig, ThresholdConfig, UltimateConfig,
};

/// Time limit used when no termination is configured.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 300;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for RotaforgeError {
    fn from(err: ConfigError) -> Self {
        RotaforgeError::Config(err.to_string())
    }
}

/// Main planner configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RotaforgeConfig {
    /// Directory holding `{style}_data.csv` catalogs.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Timeline configuration.
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Resource meter rules.
    #[serde(default)]
    pub resource: ResourceConfig,

    /// Search configuration.
    #[serde(default)]
    pub search: SearchConfig,
}

impl RotaforgeConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML or YAML file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the tick length in seconds.
    pub fn with_tick_length(mut self, tick_length: f64) -> Self {
        self.timeline.tick_length = tick_length;
        self
    }

    /// Sets the catalog directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Returns the solve time limit, falling back to
    /// [`DEFAULT_TIME_LIMIT_SECS`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rotaforge_config::RotaforgeConfig;
    /// use std::time::Duration;
    ///
    /// let config = RotaforgeConfig::new();
    /// assert_eq!(config.time_limit(), Duration::from_secs(300));
    /// ```
    pub fn time_limit(&self) -> Duration {
        self.termination
            .as_ref()
            .and_then(|t| t.time_limit())
            .unwrap_or(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS))
    }

    /// Returns the node limit, if configured.
    pub fn node_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.node_count_limit)
    }

    /// Returns the catalog directory, `data` by default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("data"))
    }
}

/// Timeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TimelineConfig {
    /// Real-time length of one tick, in seconds.
    #[serde(default = "default_tick_length")]
    pub tick_length: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            tick_length: DEFAULT_TICK_LENGTH,
        }
    }
}

fn default_tick_length() -> f64 {
    DEFAULT_TICK_LENGTH
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Maximum number of search nodes to explore.
    pub node_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Stop at the first feasible rotation instead of proving optimality.
    #[serde(default)]
    pub stop_at_first_solution: bool,
}
