//! Configuration types for PipelineGenerator

use pipegen_compiler::CompilerOptions;
use pipegen_core::{PipelineConfig, PipelineEngine};
use std::path::PathBuf;

/// Default directory generated files are written to
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Where the pipeline configuration comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// YAML file on disk
    File(PathBuf),

    /// YAML content held in memory
    Content(String),

    /// Already constructed configuration
    Config(Box<PipelineConfig>),
}

/// Main generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Pipeline configuration source
    pub source: Option<ConfigSource>,

    /// Replaces the engine named in the configuration
    pub engine_override: Option<PipelineEngine>,

    /// Root directory for generated files
    pub output_dir: PathBuf,

    /// Compiler options
    pub compiler_options: CompilerOptions,
}

impl GeneratorConfig {
    /// Create a new generator configuration
    pub fn new() -> Self {
        Self {
            source: None,
            engine_override: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            compiler_options: CompilerOptions::default(),
        }
    }

    /// Load the pipeline from a file
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(ConfigSource::File(path.into()));
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert!(config.source.is_none());
        assert!(config.engine_override.is_none());
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.compiler_options.validate_artifacts);
    }

    #[test]
    fn test_with_config_file() {
        let config = GeneratorConfig::new()
            .with_config_file("pipeline.yaml")
            .with_output_dir("out");
        assert_eq!(
            config.source,
            Some(ConfigSource::File(PathBuf::from("pipeline.yaml")))
        );
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }
}
