//! Compiler error types

use crate::resolver::Operation;
use pipegen_core::PipelineEngine;
use thiserror::Error;

/// Compiler error
///
/// Every variant aborts the compilation; nothing is emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// No role at any fallback level for a required operation
    #[error(
        "No IAM role configured for {operation}{}",
        .stage.as_ref().map(|s| format!(" in stage '{}'", s)).unwrap_or_default()
    )]
    UnresolvableCredential {
        operation: Operation,
        stage: Option<String>,
    },

    /// A step cannot be rendered for the active backend
    #[error("Step {step} does not support the {engine} engine")]
    UnsupportedRenderTarget { step: String, engine: PipelineEngine },

    /// Stage name declared more than once
    #[error("Stage '{0}' is declared more than once")]
    DuplicateStage(String),

    /// Same stage re-declared with a different approval policy
    #[error("Stage '{0}' is declared both with and without manual approval")]
    InconsistentApproval(String),

    /// Two jobs of one graph share an id
    #[error("Job '{job}' is defined twice in '{unit}'")]
    DuplicateJob { unit: String, job: String },

    /// A download has no matching upload upstream
    #[error("Job '{job}' downloads artifact '{artifact}' which no predecessor uploads")]
    DanglingArtifact { job: String, artifact: String },

    /// Invalid step fields
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// Generic configuration error
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
