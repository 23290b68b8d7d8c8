//! pipegen Core - Core types for the pipegen pipeline compiler
//!
//! This crate provides the fundamental types shared across the workspace:
//! - Configuration AST (stages, roles, runner selection, host project)
//! - Engine-agnostic pipeline steps
//! - Per-backend job fragments and output job graphs (IR)
//! - Error types

pub mod ast;
pub mod error;
pub mod ir;
pub mod step;

// Re-export commonly used types
pub use ast::{
    DeploymentStage, Environment, IndependentStage, PipelineConfig, ProjectCommands,
    ProjectConfig, RoleConfig, RunnerSelection,
};
pub use error::CoreError;
pub use ir::{CompiledPipeline, PipelineEngine};
pub use step::{ArtifactConfig, AssumeRoleConfig, CustomStep, Step};
