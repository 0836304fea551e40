//! Configuration settings for the slashd daemon.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::DaemonError;

/// Main configuration structure for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub socket: SocketConfig,
    pub platform: PlatformConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Socket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SocketConfig {
    /// Path to the Unix socket the gateway shim connects to.
    pub path: PathBuf,
    /// Socket file permissions (e.g., "0660").
    #[serde(default = "default_socket_permissions")]
    pub permissions: String,
}

/// Platform API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform REST API.
    pub api_base_url: String,
    /// Path to the bot token file.
    pub token_path: PathBuf,
    /// Application id commands are registered under.
    pub application_id: String,
    /// Where to publish commands at startup.
    #[serde(default)]
    pub command_scope: CommandScope,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Startup command-publication scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandScope {
    /// Publish to every guild the bot belongs to.
    #[default]
    Guild,
    /// Publish the global command set.
    Global,
    /// Skip startup publication entirely.
    None,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum frame size in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Socket read/write timeout in seconds.
    #[serde(default = "default_socket_timeout")]
    pub socket_timeout_seconds: u64,
    /// Maximum concurrent gateway connections.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_connections: usize,
}

// Default value functions
fn default_socket_permissions() -> String {
    "0660".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_message_size() -> usize {
    1_048_576 // 1MB
}

fn default_socket_timeout() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    16
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            socket_timeout_seconds: default_socket_timeout(),
            max_concurrent_connections: default_max_concurrent(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DaemonError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DaemonError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| DaemonError::Config {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), DaemonError> {
        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(DaemonError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        // Validate log format
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(DaemonError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        // Validate socket permissions format
        if !self.socket.permissions.chars().all(|c| c.is_ascii_digit()) {
            return Err(DaemonError::Config {
                message: format!(
                    "Invalid socket permissions '{}'. Must be octal (e.g., '0660')",
                    self.socket.permissions
                ),
            });
        }

        // The application id goes straight into API routes
        if self.platform.application_id.is_empty() {
            return Err(DaemonError::Config {
                message: "platform.application_id must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_CONFIG: &str = r#"
        [socket]
        path = "/run/slashd/gateway.sock"

        [platform]
        api_base_url = "https://chat.example.com/api"
        token_path = "/etc/slashd/token"
        application_id = "app-123"

        [logging]
    "#;

    #[test]
    fn test_default_values() {
        assert_eq!(default_socket_permissions(), "0660");
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "pretty");
    }

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let settings: Settings = toml::from_str(MINIMAL_CONFIG).unwrap();
        settings.validate().unwrap();

        assert_eq!(settings.platform.command_scope, CommandScope::Guild);
        assert_eq!(settings.platform.request_timeout_seconds, 30);
        assert_eq!(settings.limits.max_message_size, 1_048_576);
        assert_eq!(settings.socket.permissions, "0660");
    }

    #[test]
    fn test_command_scope_parses_lowercase() {
        let config = MINIMAL_CONFIG.replace(
            "application_id = \"app-123\"",
            "application_id = \"app-123\"\ncommand_scope = \"global\"",
        );
        let settings: Settings = toml::from_str(&config).unwrap();
        assert_eq!(settings.platform.command_scope, CommandScope::Global);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = MINIMAL_CONFIG.replace("[logging]", "[logging]\nlevel = \"loud\"");
        let settings: Settings = toml::from_str(&config).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_socket_permissions_rejected() {
        let config = MINIMAL_CONFIG.replace(
            "path = \"/run/slashd/gateway.sock\"",
            "path = \"/run/slashd/gateway.sock\"\npermissions = \"rw-rw\"",
        );
        let settings: Settings = toml::from_str(&config).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_application_id_rejected() {
        let config = MINIMAL_CONFIG.replace("app-123", "");
        let settings: Settings = toml::from_str(&config).unwrap();
        assert!(settings.validate().is_err());
    }
}
