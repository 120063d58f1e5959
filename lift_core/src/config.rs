//! Configuration file support for LiftVault.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftvault/config.toml`.
//! Durable user preferences (unit system, active routine, timers) live
//! in the database settings row; this file only locates the data
//! directory.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("liftvault")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("liftvault").join("config.toml")
    }

    /// Database path inside the configured data directory
    pub fn db_path(&self) -> PathBuf {
        self.data.data_dir.join("liftvault.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_points_into_data_dir() {
        let config = Config::default();
        assert!(config.db_path().ends_with("liftvault/liftvault.db"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[data]
data_dir = "/tmp/lv-test"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from("/tmp/lv-test"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/lv-test/liftvault.db"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data.data_dir, parsed.data.data_dir);
    }
}
