//! Error types for the Payroll Deduction Engine.
//!
//! The calculation core is infallible; these errors cover the fallible
//! edges around it: loading rate tables, checking their invariants and
//! validating caller-supplied profiles.

use thiserror::Error;

/// The main error type for the Payroll Deduction Engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rate_table.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rate_table.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A rate table violated one of its structural invariants.
    #[error("Invalid rate table: {message}")]
    InvalidRateTable {
        /// A description of the violated invariant.
        message: String,
    },

    /// A tax profile field was out of range.
    #[error("Invalid profile field '{field}': {message}")]
    InvalidProfile {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_rate_table_displays_message() {
        let error = EngineError::InvalidRateTable {
            message: "brackets are not contiguous".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid rate table: brackets are not contiguous"
        );
    }

    #[test]
    fn test_invalid_profile_displays_field_and_message() {
        let error = EngineError::InvalidProfile {
            field: "gross_salary".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid profile field 'gross_salary': must not be negative"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_profile() -> EngineResult<()> {
            Err(EngineError::InvalidProfile {
                field: "other_deductions".to_string(),
                message: "must not be negative".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_profile()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
