//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has sensible defaults so the service can run without a
/// config file (in-memory store, NLP disabled).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnonymConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// NLP engine configuration
    #[serde(default)]
    pub nlp: NlpConfig,

    /// PostgreSQL mapping store (omit to use the in-memory store)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    /// File queue settings
    #[serde(default)]
    pub queue: QueueSettings,

    /// Session retention settings
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AnonymConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.nlp.validate()?;
        if let Some(ref database) = self.database {
            database.validate()?;
        }
        self.queue.validate()?;
        self.retention.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// NLP engine configuration
///
/// The NLP engine is a remote HTTP service; when disabled, detection runs on
/// the regex recognizers alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlpConfig {
    /// Whether the remote NLP engine is consulted at all
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the NLP service
    #[serde(default)]
    pub base_url: String,

    /// Language hint sent with every request
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_nlp_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            language: default_language(),
            timeout_seconds: default_nlp_timeout(),
        }
    }
}

impl NlpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled {
            if self.base_url.is_empty() {
                return Err("nlp.base_url is required when nlp.enabled = true".to_string());
            }
            if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
                return Err(format!(
                    "nlp.base_url must start with http:// or https://, got '{}'",
                    self.base_url
                ));
            }
        }
        if self.timeout_seconds == 0 {
            return Err("nlp.timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// PostgreSQL mapping store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string
    /// Stored securely in memory and automatically zeroized on drop
    pub connection_string: SecretString,

    /// Maximum pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Connection acquisition timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let conn = self.connection_string.expose_secret();
        if conn.is_empty() {
            return Err("database.connection_string must not be empty".to_string());
        }
        if !conn.starts_with("postgres://") && !conn.starts_with("postgresql://") {
            return Err(
                "database.connection_string must start with postgres:// or postgresql://"
                    .to_string(),
            );
        }
        if self.max_connections == 0 {
            return Err("database.max_connections must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// File queue settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSettings {
    /// Maximum processing attempts per job
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Hard per-attempt timeout in seconds
    #[serde(default = "default_job_timeout")]
    pub job_timeout_seconds: u64,

    /// Base retry delay in seconds; the n-th retry waits base * n
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_seconds: u64,

    /// Poll interval used by result waiters in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    /// Ceiling on how long a result waiter blocks before giving up
    #[serde(default = "default_result_wait_timeout")]
    pub result_wait_timeout_seconds: u64,

    /// Assumed per-job duration used for queue ETA estimates in seconds
    #[serde(default = "default_average_job_seconds")]
    pub average_job_seconds: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            job_timeout_seconds: default_job_timeout(),
            retry_base_delay_seconds: default_retry_base_delay(),
            poll_interval_seconds: default_poll_interval(),
            result_wait_timeout_seconds: default_result_wait_timeout(),
            average_job_seconds: default_average_job_seconds(),
        }
    }
}

impl QueueSettings {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("queue.max_attempts must be greater than 0".to_string());
        }
        if self.job_timeout_seconds == 0 {
            return Err("queue.job_timeout_seconds must be greater than 0".to_string());
        }
        if self.result_wait_timeout_seconds == 0 {
            return Err("queue.result_wait_timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Session retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Sessions older than this many days are purged by cleanup-sessions
    #[serde(default = "default_retention_days")]
    pub days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: default_retention_days(),
        }
    }
}

impl RetentionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.days == 0 {
            return Err("retention.days must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to write JSON logs to a local rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily, hourly or never
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_language() -> String {
    "de".to_string()
}

fn default_nlp_timeout() -> u64 {
    30
}

fn default_max_connections() -> usize {
    10
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    5
}

fn default_job_timeout() -> u64 {
    1800
}

fn default_retry_base_delay() -> u64 {
    5
}

fn default_poll_interval() -> u64 {
    1
}

fn default_result_wait_timeout() -> u64 {
    3600
}

fn default_average_job_seconds() -> u64 {
    30
}

fn default_retention_days() -> u32 {
    7
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
