//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific failure categories and provides context for error handling.
#[derive(Debug, Error)]
pub enum AnonymError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid caller input (empty text, malformed session id, ...)
    #[error("Invalid input: {0}")]
    Input(String),

    /// Entity detection errors (bad pattern, failed fixture)
    #[error("Detection error: {0}")]
    Detection(String),

    /// Mapping store errors
    #[error("Store error: {0}")]
    Store(String),

    /// File queue errors
    #[error("Queue error: {0}")]
    Queue(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// XML document errors
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for AnonymError {
    fn from(err: std::io::Error) -> Self {
        AnonymError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AnonymError {
    fn from(err: serde_json::Error) -> Self {
        AnonymError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AnonymError {
    fn from(err: toml::de::Error) -> Self {
        AnonymError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from quick-xml errors
impl From<quick_xml::Error> for AnonymError {
    fn from(err: quick_xml::Error) -> Self {
        AnonymError::Xml(err.to_string())
    }
}

// Conversion from anyhow, used at the pipeline boundary
impl From<anyhow::Error> for AnonymError {
    fn from(err: anyhow::Error) -> Self {
        AnonymError::Other(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnonymError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: AnonymError = io_err.into();
        assert!(matches!(err, AnonymError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: AnonymError = json_err.into();
        assert!(matches!(err, AnonymError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: AnonymError = toml_err.into();
        assert!(matches!(err, AnonymError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = AnonymError::Input("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
