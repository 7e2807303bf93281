//! Monitor configuration.
//!
//! Config file: ~/.config/fleetmon/config.toml, loaded when present.
//! Every field has a default, so a missing or partial file is fine.
//! Precedence for the store URL: CLI flag > FLEETMON_REDIS_URL > file > default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default store address, matching the producer's own default.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Fixed key the producer writes the snapshot under.
pub const DEFAULT_SNAPSHOT_KEY: &str = "fleet_state";

/// Environment override for the store address.
pub const REDIS_URL_ENV: &str = "FLEETMON_REDIS_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Store connection URL.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Key holding the fleet snapshot.
    #[serde(default = "default_key")]
    pub key: String,

    /// Polling period in seconds.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Consecutive read failures before the loop gives up.
    /// Zero disables escalation.
    #[serde(default = "default_max_read_failures")]
    pub max_read_failures: u32,
}

fn default_redis_url() -> String {
    DEFAULT_REDIS_URL.to_string()
}

fn default_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}

fn default_interval_secs() -> u64 {
    1
}

fn default_max_read_failures() -> u32 {
    5
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            key: default_key(),
            interval_secs: default_interval_secs(),
            max_read_failures: default_max_read_failures(),
        }
    }
}

impl MonitorConfig {
    /// Get default user config path: ~/.config/fleetmon/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("XDG_CONFIG_HOME"))
            .context("Cannot determine home directory")?;

        let config_dir = if home.contains("/.config") {
            PathBuf::from(home)
        } else {
            Path::new(&home).join(".config")
        };

        Ok(config_dir.join("fleetmon").join("config.toml"))
    }

    /// Load configuration from the user config file, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: MonitorConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Apply environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(REDIS_URL_ENV) {
            if !url.is_empty() {
                self.redis_url = url;
            }
        }
    }
}
