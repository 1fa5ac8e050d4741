//! Engine configuration persistence
//!
//! Stores preferences in `~/.config/multicursor/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors reading or writing a config file
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Match case when locating occurrences
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    /// Continue add-next/skip from the buffer start after the last occurrence
    #[serde(default = "default_true")]
    pub wrap_search: bool,
    /// Maximum number of undo steps kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Move each cursor one column left when leaving insert mode
    #[serde(default = "default_true")]
    pub step_left_on_exit_insert: bool,
}

fn default_true() -> bool {
    true
}

fn default_history_limit() -> usize {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            wrap_search: true,
            history_limit: default_history_limit(),
            step_left_on_exit_insert: true,
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse config from a YAML string; missing fields take their defaults
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| ConfigError::Io("No config directory available".to_string()))?;
        self.save_to(&path)
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            ConfigError::Io(format!("Failed to write config to {}: {}", path.display(), e))
        })?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.case_sensitive);
        assert!(config.wrap_search);
        assert_eq!(config.history_limit, 1000);
        assert!(config.step_left_on_exit_insert);
    }

    #[test]
    fn test_parse_partial_uses_defaults() {
        let config = EngineConfig::parse("case_sensitive: false\n").unwrap();
        assert!(!config.case_sensitive);
        assert!(config.wrap_search);
        assert_eq!(config.history_limit, 1000);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(EngineConfig::parse("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_parse_invalid() {
        let err = EngineConfig::parse("history_limit: lots").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
