// ⚠️ Error Types - one category, distinguishable by message
// Every failure the engine surfaces goes through CalculatorError.

use thiserror::Error;

/// Main error type for the calculator library
#[derive(Debug, Error)]
pub enum CalculatorError {
    /// Bad or out-of-range user input
    #[error("{0}")]
    Validation(String),

    /// Unknown operation, arithmetic failure, division by zero, root/power domain errors
    #[error("{0}")]
    Operation(String),

    /// Invalid engine configuration (e.g. non-positive max_history_size)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed persisted record
    #[error("{0}")]
    DataCorruption(String),

    /// Reading or writing the history file failed
    #[error("History persistence failed: {0}")]
    Persistence(String),

    #[error("Observer {0} is not registered")]
    ObserverNotRegistered(u64),
}

impl CalculatorError {
    pub fn validation(message: impl Into<String>) -> Self {
        CalculatorError::Validation(message.into())
    }

    pub fn operation(message: impl Into<String>) -> Self {
        CalculatorError::Operation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CalculatorError::Configuration(message.into())
    }

    pub fn corruption(message: impl Into<String>) -> Self {
        CalculatorError::DataCorruption(message.into())
    }

    /// Short kind label, used by the REPL when printing errors
    pub fn kind(&self) -> &'static str {
        match self {
            CalculatorError::Validation(_) => "Validation error",
            CalculatorError::Operation(_) => "Operation error",
            CalculatorError::Configuration(_) => "Configuration error",
            CalculatorError::DataCorruption(_) => "Data error",
            CalculatorError::Persistence(_) => "Persistence error",
            CalculatorError::ObserverNotRegistered(_) => "Observer error",
        }
    }
}

impl From<std::io::Error> for CalculatorError {
    fn from(err: std::io::Error) -> Self {
        CalculatorError::Persistence(err.to_string())
    }
}

impl From<csv::Error> for CalculatorError {
    fn from(err: csv::Error) -> Self {
        CalculatorError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pass_through() {
        let err = CalculatorError::operation("Division by zero is not allowed");
        assert_eq!(err.to_string(), "Division by zero is not allowed");
        assert_eq!(err.kind(), "Operation error");
    }

    #[test]
    fn test_configuration_is_prefixed() {
        let err = CalculatorError::configuration("precision must be positive");
        assert_eq!(err.to_string(), "Configuration error: precision must be positive");
    }

    #[test]
    fn test_io_error_becomes_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CalculatorError = io.into();
        assert!(matches!(err, CalculatorError::Persistence(_)));
        assert!(err.to_string().contains("denied"));
    }
}
