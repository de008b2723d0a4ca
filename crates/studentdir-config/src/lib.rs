#![deny(unsafe_code)]

//! Configuration loading and validation for studentdir.
//!
//! Loads TOML configuration files and validates them. Provides the
//! [`AppConfig`] type as the central configuration structure shared by the
//! CLI, the HTTP API and the directory session.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the roster is loaded from.
    #[serde(default)]
    pub roster: RosterConfig,

    /// Directory view defaults (page sizes, pagination window).
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// HTTP API listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Group chat polling.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Roster source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Path to a `.json` or `.toml` roster file.
    #[serde(default = "default_roster_path")]
    pub path: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: default_roster_path(),
        }
    }
}

fn default_roster_path() -> String {
    "data/students.json".to_string()
}

/// Directory view configuration.
///
/// ## TOML Example
///
/// ```toml
/// [directory]
/// default_page_size = 24
/// page_size_options = [24, 48, 96]
/// max_page_size = 100
/// sibling_count = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Profiles per page when the caller does not pick one.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Page sizes a viewer may switch between.
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<usize>,

    /// Upper bound applied to page sizes requested over HTTP.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Neighbours shown on each side of the current page in the pagination window.
    #[serde(default = "default_sibling_count")]
    pub sibling_count: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            max_page_size: default_max_page_size(),
            sibling_count: default_sibling_count(),
        }
    }
}

fn default_page_size() -> usize {
    24
}

fn default_page_size_options() -> Vec<usize> {
    vec![24, 48, 96]
}

fn default_max_page_size() -> usize {
    100
}

fn default_sibling_count() -> usize {
    1
}

/// HTTP API listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port the API listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    8080
}

/// Group chat configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Interval between message polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Character budget for the member summary line.
    #[serde(default = "default_member_summary_chars")]
    pub member_summary_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            member_summary_chars: default_member_summary_chars(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_member_summary_chars() -> usize {
    60
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        debug!(path = %path.display(), bytes = content.len(), "read config file");
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.path.is_empty() {
            return Err(ConfigError::Validation(
                "roster.path must not be empty".to_string(),
            ));
        }

        let dir = &self.directory;
        if dir.max_page_size == 0 {
            return Err(ConfigError::Validation(
                "directory.max_page_size must be at least 1".to_string(),
            ));
        }
        if dir.default_page_size == 0 || dir.default_page_size > dir.max_page_size {
            return Err(ConfigError::Validation(format!(
                "directory.default_page_size must be in [1, {}], got {}",
                dir.max_page_size, dir.default_page_size
            )));
        }
        if dir.page_size_options.is_empty() {
            return Err(ConfigError::Validation(
                "directory.page_size_options must not be empty".to_string(),
            ));
        }
        for (i, size) in dir.page_size_options.iter().enumerate() {
            if *size == 0 || *size > dir.max_page_size {
                return Err(ConfigError::Validation(format!(
                    "directory.page_size_options[{i}] must be in [1, {}], got {size}",
                    dir.max_page_size
                )));
            }
        }
        if !dir.page_size_options.contains(&dir.default_page_size) {
            return Err(ConfigError::Validation(format!(
                "directory.default_page_size {} must be one of page_size_options {:?}",
                dir.default_page_size, dir.page_size_options
            )));
        }

        if self.server.listen_port == 0 {
            return Err(ConfigError::Validation(
                "server.listen_port must be non-zero".to_string(),
            ));
        }
        if self.server.listen_addr.is_empty() {
            return Err(ConfigError::Validation(
                "server.listen_addr must not be empty".to_string(),
            ));
        }

        if self.chat.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "chat.poll_interval_ms must be non-zero".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}
