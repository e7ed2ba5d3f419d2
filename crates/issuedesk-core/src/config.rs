//! Configuration for issuedesk
//!
//! Stored in `<config dir>/issuedesk/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = "issuedesk";
const CONFIG_FILE: &str = "config.toml";

/// issuedesk configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheme, host and port of the issue tracker server
    pub server_url: String,

    /// Path of the issues collection on that server
    pub base_path: String,

    /// Per-request timeout; unset leaves the transport default in place
    pub request_timeout_secs: Option<u64>,

    /// Terminal UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            base_path: "/api/v1/issues".to_string(),
            request_timeout_secs: None,
            ui: UiConfig::default(),
        }
    }
}

/// Terminal UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds before success and info alerts disappear
    pub alert_timeout_secs: u64,

    /// Redraw / input poll interval in milliseconds
    pub tick_rate_ms: u64,

    /// Write logs here while the UI owns the terminal
    pub log_file: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            alert_timeout_secs: 4,
            tick_rate_ms: 250,
            log_file: None,
        }
    }
}

impl UiConfig {
    pub fn alert_timeout(&self) -> Duration {
        Duration::from_secs(self.alert_timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load config from a TOML file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Full URL of the issues collection, without a trailing slash
    pub fn issues_url(&self) -> String {
        let server = self.server_url.trim_end_matches('/');
        let path = self.base_path.trim_matches('/');
        if path.is_empty() {
            server.to_string()
        } else {
            format!("{}/{}", server, path)
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Generate a default config file with comments
    pub fn default_with_comments() -> String {
        r#"# issuedesk configuration

# Issue tracker server (scheme, host and port)
server_url = "http://127.0.0.1:8000"

# Path of the issues collection on the server
base_path = "/api/v1/issues"

# Per-request timeout in seconds (unset: no timeout)
# request_timeout_secs = 30

[ui]
# Seconds before success and info alerts disappear (errors stay until dismissed)
alert_timeout_secs = 4

# Redraw / input poll interval in milliseconds
tick_rate_ms = 250

# Log file for the interactive UI (logging is off when unset)
# log_file = "/tmp/issuedesk.log"
"#
        .to_string()
    }
}
