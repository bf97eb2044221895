//! Configuration errors and validation traits.

use thiserror::Error;

/// Errors raised while validating configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// A message describing the problem.
        message: String,
    },

    /// A required value was not provided.
    #[error("missing required field '{field}'")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },
}

/// Trait implemented by configuration types that can check themselves.
pub trait ConfigValidator {
    /// Validates the configuration, returning the first problem found.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns `true` if [`ConfigValidator::validate`] succeeds.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Validates that a value is finite and strictly positive.
pub(crate) fn validate_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidConfig {
            message: format!("{field} must be a positive number, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("x", 1.5).is_ok());
        assert!(validate_positive("x", 0.0).is_err());
        assert!(validate_positive("x", -3.0).is_err());
        assert!(validate_positive("x", f64::NAN).is_err());
        assert!(validate_positive("x", f64::INFINITY).is_err());
    }
}
