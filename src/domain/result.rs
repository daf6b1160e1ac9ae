//! Result type alias
//!
//! This module provides a convenient Result type alias that uses AnonymError
//! as the error type.

use super::errors::AnonymError;

/// Result type alias for fallible operations
///
/// Use this throughout the codebase; the error type is always [`AnonymError`].
pub type Result<T> = std::result::Result<T, AnonymError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::AnonymError;

    #[test]
    fn test_result_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(AnonymError::Input("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
