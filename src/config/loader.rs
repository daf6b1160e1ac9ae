//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AnonymConfig;
use crate::config::secret_string;
use crate::domain::errors::AnonymError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AnonymConfig
/// 4. Applies environment variable overrides (ANON_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is unset, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<AnonymConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: AnonymConfig = toml::from_str(&contents)
        .map_err(|e| AnonymError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        AnonymError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Don't substitute inside comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AnonymError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the ANON_* prefix
///
/// Environment variables follow the pattern ANON_<SECTION>_<KEY>,
/// e.g. ANON_NLP_BASE_URL or ANON_QUEUE_MAX_ATTEMPTS.
fn apply_env_overrides(config: &mut AnonymConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("ANON_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // NLP overrides
    if let Ok(val) = std::env::var("ANON_NLP_ENABLED") {
        config.nlp.enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ANON_NLP_BASE_URL") {
        config.nlp.base_url = val;
    }
    if let Ok(val) = std::env::var("ANON_NLP_LANGUAGE") {
        config.nlp.language = val;
    }
    if let Ok(val) = std::env::var("ANON_NLP_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.nlp.timeout_seconds = timeout;
        }
    }

    // Database overrides (only if a database section is configured)
    if let Some(ref mut database) = config.database {
        if let Ok(val) = std::env::var("ANON_DATABASE_CONNECTION_STRING") {
            database.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("ANON_DATABASE_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                database.max_connections = max;
            }
        }
    }

    // Queue overrides
    if let Ok(val) = std::env::var("ANON_QUEUE_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.queue.max_attempts = attempts;
        }
    }
    if let Ok(val) = std::env::var("ANON_QUEUE_JOB_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.queue.job_timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("ANON_QUEUE_RETRY_BASE_DELAY_SECONDS") {
        if let Ok(delay) = val.parse() {
            config.queue.retry_base_delay_seconds = delay;
        }
    }

    // Retention overrides
    if let Ok(val) = std::env::var("ANON_RETENTION_DAYS") {
        if let Ok(days) = val.parse() {
            config.retention.days = days;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ANON_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ANON_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("ANON_TEST_SUBST_VAR", "test_value");
        let input = "connection_string = \"${ANON_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "connection_string = \"test_value\"\n");
        std::env::remove_var("ANON_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("ANON_TEST_MISSING_VAR");
        let input = "connection_string = \"${ANON_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# uses ${NOT_A_REAL_VAR}\nvalue = 1";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${NOT_A_REAL_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[nlp]
enabled = true
base_url = "http://localhost:5001"

[queue]
max_attempts = 3

[retention]
days = 14
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert!(config.nlp.enabled);
        assert_eq!(config.queue.max_attempts, 3);
        assert_eq!(config.retention.days, 14);
        // unset sections fall back to defaults
        assert_eq!(config.queue.job_timeout_seconds, 1800);
    }
}
