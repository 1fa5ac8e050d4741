//! Where the engine keeps its settings and session logs on disk.
//!
//! One directory named `multicursor` holds `config.yaml` and a `logs/`
//! subdirectory. `MULTICURSOR_CONFIG_DIR` overrides its location outright;
//! otherwise it sits in the platform's per-user config root.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "multicursor";
const OVERRIDE_VAR: &str = "MULTICURSOR_CONFIG_DIR";

/// Files inside one engine directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePaths {
    root: PathBuf,
}

impl EnginePaths {
    pub fn under(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory picked from the environment, if any user root exists
    pub fn discover() -> Option<Self> {
        if let Some(dir) = env::var_os(OVERRIDE_VAR).filter(|d| !d.is_empty()) {
            return Some(Self::under(dir));
        }
        user_config_root().map(|root| Self::under(root.join(APP_DIR)))
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Create the log directory on first use
    pub fn create_logs(&self) -> Result<PathBuf> {
        let logs = self.logs();
        fs::create_dir_all(&logs)
            .with_context(|| format!("creating log directory {}", logs.display()))?;
        Ok(logs)
    }
}

/// `$XDG_CONFIG_HOME` or `~/.config` on unix, the roaming app data folder on windows
fn user_config_root() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir()
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
    }
}

pub fn config_file() -> Option<PathBuf> {
    EnginePaths::discover().map(|paths| paths.config_file())
}

pub fn ensure_logs_dir() -> Result<PathBuf> {
    EnginePaths::discover()
        .context("no user config directory")?
        .create_logs()
}
