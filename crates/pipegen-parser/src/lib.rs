//! pipegen Parser - YAML to configuration AST
//!
//! This crate converts YAML pipeline descriptions into the
//! [`pipegen_core::PipelineConfig`] AST.

pub mod error;
pub mod pipeline_parser;
pub mod role_parser;
pub mod step_parser;
pub mod yaml_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use pipeline_parser::PipelineParser;
pub use role_parser::RoleParser;
pub use step_parser::StepParser;
pub use yaml_parser::YamlParser;
