//! Configuration module for wicket.

use serde::Deserialize;
use std::path::Path;

use crate::policy::{AccessLevel, PermissionPolicy, PolicyRule};
use crate::{Result, WicketError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
///
/// The path is the store's connection input; there are no further
/// credentials for a file-backed SQLite store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/wicket.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/wicket.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_duration")]
    pub duration_secs: u64,
    /// Interval between expired-token sweeps, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_cookie_name() -> String {
    "wicket_session".to_string()
}

fn default_session_duration() -> u64 {
    24 * 60 * 60
}

fn default_cleanup_interval() -> u64 {
    3600
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            duration_secs: default_session_duration(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// A single path rule in the gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Request path this rule applies to.
    pub path: String,
    /// Required access level for matching paths.
    pub access: AccessLevel,
    /// Match the path exactly instead of by prefix.
    #[serde(default)]
    pub exact: bool,
}

/// Permission gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Body of the rejection response.
    #[serde(default = "default_deny_message")]
    pub deny_message: String,
    /// Access level for paths no rule matches.
    #[serde(default)]
    pub default_access: AccessLevel,
    /// Ordered path rules; the first match wins.
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
}

fn default_deny_message() -> String {
    "Permission denied!".to_string()
}

fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig {
            path: "/admin".to_string(),
            access: AccessLevel::AdminOnly,
            exact: false,
        },
        RuleConfig {
            path: "/data".to_string(),
            access: AccessLevel::UserOnly,
            exact: false,
        },
        RuleConfig {
            path: "/repo".to_string(),
            access: AccessLevel::UserOnly,
            exact: false,
        },
    ]
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            deny_message: default_deny_message(),
            default_access: AccessLevel::default(),
            rules: default_rules(),
        }
    }
}

impl GateConfig {
    /// Build the permission policy described by this configuration.
    pub fn policy(&self) -> PermissionPolicy {
        let mut policy = PermissionPolicy::new(self.default_access);
        for rule in &self.rules {
            if rule.exact {
                policy.add_rule(PolicyRule::exact(&rule.path, rule.access));
            } else {
                policy.add_rule(PolicyRule::prefix(&rule.path, rule.access));
            }
        }
        policy
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Session cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Permission gate configuration.
    #[serde(default)]
    pub gate: GateConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(WicketError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| WicketError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `WICKET_DATABASE_PATH`: Override the database file path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("WICKET_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - A gate rule path does not start with `/`
    /// - The session cookie name is empty
    pub fn validate(&self) -> Result<()> {
        for rule in &self.gate.rules {
            if !rule.path.starts_with('/') {
                return Err(WicketError::Config(format!(
                    "gate rule path {:?} must start with '/'",
                    rule.path
                )));
            }
        }
        if self.session.cookie_name.is_empty() {
            return Err(WicketError::Config(
                "session cookie_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
