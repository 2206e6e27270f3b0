//! TOML configuration.
//!
//! ```toml
//! [source]
//! mode = "remote"              # or "fixture"
//! base_url = "http://localhost:8080"
//!
//! [analytics]
//! api_key = "moltbook_sk_..."
//!
//! [poll]
//! interval_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use molt_source::{AnalyticsConfig, ChatConfig, SourceConfig};
use molt_views::LEADERBOARD_SIZE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_DIR_NAME: &str = "moltnet";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Agent snapshot refresh interval.
    pub interval_secs: u64,
    /// Analytics panel refresh interval.
    pub analytics_interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            analytics_interval_secs: 60,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn analytics_interval(&self) -> Duration {
        Duration::from_secs(self.analytics_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub leaderboard_size: usize,
    /// Posts per analytics listing.
    pub post_limit: usize,
    /// Agents and submolts in the analytics panel.
    pub analytics_agent_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            leaderboard_size: LEADERBOARD_SIZE,
            post_limit: 10,
            analytics_agent_limit: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub analytics: AnalyticsConfig,
    pub chat: ChatConfig,
    pub poll: PollConfig,
    pub server: ServerConfig,
    pub view: ViewConfig,
}

impl DashboardConfig {
    pub fn from_toml_str(s: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Load from `path` if given (must exist), otherwise from the default
    /// location if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(default) if default.exists() => {
                tracing::debug!(path = %default.display(), "Loading default config");
                Self::from_file(&default)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/moltnet/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
