//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] pipegen_parser::ParseError),

    /// Compiler error
    #[error("Compiler error: {0}")]
    CompileError(#[from] pipegen_compiler::CompileError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Output serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_yaml::Error> for SdkError {
    fn from(err: serde_yaml::Error) -> Self {
        SdkError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::SerializationError(err.to_string())
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pipegen_compiler::{CompileError, Operation};

    #[test]
    fn test_config_error() {
        let error = SdkError::ConfigError("no pipeline configured".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("no pipeline configured"));
    }

    #[test]
    fn test_compile_error_conversion() {
        let error: SdkError = CompileError::UnresolvableCredential {
            operation: Operation::Synth,
            stage: None,
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Compiler error: No IAM role configured for synth"
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let error: SdkError = pipegen_parser::ParseError::MissingField {
            field: "stages[0].name".to_string(),
        }
        .into();
        assert!(error.to_string().starts_with("Parser error:"));
        assert!(error.to_string().contains("stages[0].name"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let sdk_error: SdkError = io_error.into();
        assert!(sdk_error.to_string().contains("I/O error"));
        assert!(sdk_error.to_string().contains("File not found"));
    }

    #[test]
    fn test_error_debug_format() {
        let error = SdkError::SerializationError("bad".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("SerializationError"));
    }
}
