//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ANON_*` environment variable overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [nlp]
//! enabled = true
//! base_url = "http://localhost:5001"
//! language = "de"
//!
//! [database]
//! connection_string = "${ANONYM_DATABASE_URL}"
//!
//! [queue]
//! max_attempts = 5
//! job_timeout_seconds = 1800
//!
//! [retention]
//! days = 7
//! ```
//!
//! Omitting the `[database]` section selects the in-memory mapping store,
//! which is useful for tests and one-shot CLI runs.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    AnonymConfig, ApplicationConfig, DatabaseConfig, LoggingConfig, NlpConfig, QueueSettings,
    RetentionConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
