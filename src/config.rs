// Configuration loading

use crate::persist::DEFAULT_KEY;
use crate::slot::{FileSlot, Slot, SqliteSlot, validate_key};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the data directory
pub const DIR_ENV: &str = "TASKLIST_DIR";

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.yaml";
const DB_FILE: &str = "tasklist.db";

/// Where the task list is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `<data_dir>/<key>.json`
    #[default]
    File,
    /// Row in `<data_dir>/tasklist.db`
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: Backend::default(),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// used if present, else defaults. `TASKLIST_DIR` then overrides the data
    /// directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Ok(dir) = std::env::var(DIR_ENV)
            && !dir.trim().is_empty()
        {
            config.data_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(file = ?path, "Loading config");
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document is valid and means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_key(&self.key)
    }

    /// Open the configured slot
    pub fn open_slot(&self) -> Result<Box<dyn Slot>> {
        let slot: Box<dyn Slot> = match self.backend {
            Backend::File => Box::new(FileSlot::open(&self.data_dir)?),
            Backend::Sqlite => Box::new(SqliteSlot::open(self.data_dir.join(DB_FILE))?),
        };
        debug!(backend = ?self.backend, dir = ?self.data_dir, "Opened slot");
        Ok(slot)
    }
}

/// Per-user data directory, or `./.tasklist` when there is none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".tasklist"))
}

/// Per-user config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.key, "tasks");
        assert!(config.data_dir.ends_with("tasklist") || config.data_dir.ends_with(".tasklist"));
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = Config::from_yaml("backend: sqlite\n").unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.key, "tasks");
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = "data_dir: /tmp/tl\nbackend: file\nkey: work\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tl"));
        assert_eq!(config.key, "work");
    }

    #[test]
    fn test_from_yaml_empty() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_from_yaml_rejects_unknown_backend() {
        assert!(Config::from_yaml("backend: redis\n").is_err());
    }

    #[test]
    fn test_validate_key() {
        let config = Config {
            key: "no/slashes".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let temp = TempDir::new().unwrap();
        assert!(Config::from_file(&temp.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn test_open_slot_backends() {
        let temp = TempDir::new().unwrap();

        let mut config = Config {
            data_dir: temp.path().to_path_buf(),
            ..Config::default()
        };
        let mut slot = config.open_slot().unwrap();
        slot.write("tasks", "[]").unwrap();
        assert!(temp.path().join("tasks.json").exists());

        config.backend = Backend::Sqlite;
        let mut slot = config.open_slot().unwrap();
        slot.write("tasks", "[]").unwrap();
        assert!(temp.path().join(DB_FILE).exists());
    }
}
