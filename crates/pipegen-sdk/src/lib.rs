//! pipegen SDK
//!
//! High-level API for loading pipeline configurations, compiling them and
//! writing the generated CI files.

pub mod builder;
pub mod config;
pub mod error;
pub mod generator;

// Re-export main types
pub use builder::PipelineGeneratorBuilder;
pub use config::{ConfigSource, GeneratorConfig};
pub use error::{Result, SdkError};
pub use generator::{GeneratedFile, PipelineGenerator};

// Re-export commonly used types from dependencies
pub use pipegen_compiler::{CompileError, CompilerOptions, PipelineCompiler};
pub use pipegen_core::ir::CompiledPipeline;
pub use pipegen_core::{PipelineConfig, PipelineEngine};
