//! Error types for pipegen Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
