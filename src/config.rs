//! Configuration loading and management
//!
//! Handles parsing of `taskshard.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "taskshard.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage layout
    #[serde(default)]
    pub storage: StorageConfig,

    /// Writer lock used by mutating commands
    #[serde(default)]
    pub lock: LockConfig,
}

/// Storage layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage root directory
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Shard directory under the root (`<tasks_dir>/<year>/<month>.json`)
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: String,

    /// Range index directory under the root (`<index_dir>/<year>.json`)
    #[serde(default = "default_index_dir")]
    pub index_dir: String,

    /// Counter file under the root
    #[serde(default = "default_counter_file")]
    pub counter_file: String,
}

fn default_root() -> PathBuf {
    PathBuf::from("storage")
}

fn default_tasks_dir() -> String {
    "tasks".to_string()
}

fn default_index_dir() -> String {
    "index".to_string()
}

fn default_counter_file() -> String {
    "lastID.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            tasks_dir: default_tasks_dir(),
            index_dir: default_index_dir(),
            counter_file: default_counter_file(),
        }
    }
}

/// Writer lock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// How long a mutating command waits for the writer lock
    #[serde(default = "default_lock_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.root cannot be empty".to_string(),
            ));
        }
        validate_component(&self.tasks_dir, "storage.tasks_dir")?;
        validate_component(&self.index_dir, "storage.index_dir")?;
        validate_component(&self.counter_file, "storage.counter_file")?;

        if self.tasks_dir.trim() == self.index_dir.trim() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.tasks_dir and storage.index_dir must differ".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_component(name: &str, field: &str) -> crate::error::Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field} cannot be empty"
        )));
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed == "." || trimmed == ".." {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field}: '{name}' must be a single path component"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a `taskshard.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()?;
        if self.lock.timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "lock.timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
