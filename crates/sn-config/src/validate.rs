//! Configuration validation errors.

use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error reading {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("At least 1 day per period, not: {days}")]
    InvalidPeriod { days: i64 },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError { .. } => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::InvalidPeriod { .. } => 11,
        }
    }
}

impl From<ValidationError> for sn_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidPeriod { days } => sn_common::Error::InvalidPeriod { days },
            other => sn_common::Error::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_period_converts_to_common_error() {
        let err: sn_common::Error = ValidationError::InvalidPeriod { days: -3 }.into();
        assert!(matches!(err, sn_common::Error::InvalidPeriod { days: -3 }));
    }

    #[test]
    fn test_other_errors_become_config_errors() {
        let err: sn_common::Error = ValidationError::MissingField("period_days".into()).into();
        assert_eq!(err.code(), 10);
        assert!(err.to_string().contains("period_days"));
    }
}
