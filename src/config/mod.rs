//! Project configuration (skol.toml)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::typechecker::lint;

/// Name of the project file
pub const CONFIG_FILE: &str = "skol.toml";

/// Skol project configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub check: CheckConfig,

    #[serde(default)]
    pub lint: LintConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// `[check]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Warnings fail the run
    #[serde(default)]
    pub strict: bool,
}

/// `[lint]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    /// Rule names to switch off
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// `[cache]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory under the project root
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_cache_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_dir() -> String {
    "_skolcache".to_string()
}

impl Config {
    /// Load a config from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a config from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `skol.toml` from `root`, or the defaults if there is none
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize the config to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self.lint.disabled.iter().find(|n| !lint::is_rule(n)) {
            return Err(ConfigError::UnknownLint(name.clone()));
        }
        Ok(())
    }
}

/// Config errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown lint rule `{0}`")]
    UnknownLint(String),
}

#[cfg(test)]
mod tests;
