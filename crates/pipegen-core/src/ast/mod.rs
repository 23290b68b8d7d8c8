//! Configuration AST for pipegen
//!
//! This module contains the declarative pipeline description:
//! - Deployment and independent stages
//! - IAM role and runner selection policies
//! - The top-level pipeline configuration
//! - The host project handle used to render generic commands

pub mod pipeline;
pub mod project;
pub mod roles;
pub mod stage;

pub use pipeline::PipelineConfig;
pub use project::{ProjectCommands, ProjectConfig};
pub use roles::{RoleConfig, RunnerSelection};
pub use stage::{DeploymentStage, Environment, IndependentStage};
