//! pipegen Compiler - pipeline configuration to CI job graphs
//!
//! This crate compiles a [`pipegen_core::PipelineConfig`] into the job graph
//! of one CI backend:
//! - `resolver` picks IAM roles and runner tags through layered fallbacks
//! - `codegen` renders engine-agnostic steps into backend fragments
//! - `topology` decides how each stage attaches to the job graph
//! - `pipeline` arranges steps into jobs per backend
//! - `compiler` validates and drives the whole compilation

pub mod codegen;
pub mod compiler;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod topology;
pub mod validator;

// Re-export main types
pub use codegen::{BashCodegen, CodeCatalystCodegen, GithubCodegen, GitlabCodegen, StepCodegen};
pub use compiler::{CompilerOptions, PipelineCompiler};
pub use error::{CompileError, Result};
pub use pipeline::JobPlan;
pub use resolver::{Operation, RoleResolver, RunnerResolver};
pub use topology::StageTopology;
pub use validator::ConfigValidator;
