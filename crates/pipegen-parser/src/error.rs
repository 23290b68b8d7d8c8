//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Invalid step definition
    #[error("Invalid step at '{path}': {message}")]
    InvalidStep { path: String, message: String },

    /// Unknown field
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

impl ParseError {
    /// Prefix the field path of this error with `prefix`
    pub fn at(self, prefix: &str) -> Self {
        let join = |field: String| {
            if field.is_empty() {
                prefix.to_string()
            } else if field.starts_with('[') {
                format!("{}{}", prefix, field)
            } else {
                format!("{}.{}", prefix, field)
            }
        };

        match self {
            ParseError::MissingField { field } => ParseError::MissingField { field: join(field) },
            ParseError::InvalidValue { field, message } => ParseError::InvalidValue {
                field: join(field),
                message,
            },
            ParseError::InvalidStep { path, message } => ParseError::InvalidStep {
                path: join(path),
                message,
            },
            ParseError::UnknownField(field) => ParseError::UnknownField(join(field)),
            other => other,
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_prefixes_paths() {
        let err = ParseError::MissingField {
            field: "region".to_string(),
        }
        .at("env")
        .at("stages[0]");
        assert_eq!(err.to_string(), "Missing required field: stages[0].env.region");
    }

    #[test]
    fn test_at_joins_index_without_dot() {
        let err = ParseError::InvalidStep {
            path: "[2]".to_string(),
            message: "unknown step kind 'shell'".to_string(),
        }
        .at("pre_install_steps");
        assert!(err.to_string().contains("pre_install_steps[2]"));
    }
}
