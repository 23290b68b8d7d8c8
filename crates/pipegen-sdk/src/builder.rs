//! Builder pattern for PipelineGenerator

use crate::config::{ConfigSource, GeneratorConfig};
use crate::error::{Result, SdkError};
use crate::generator::PipelineGenerator;
use pipegen_compiler::PipelineCompiler;
use pipegen_core::{PipelineConfig, PipelineEngine};
use pipegen_parser::PipelineParser;
use std::path::PathBuf;

/// Builder for PipelineGenerator
///
/// # Example
///
/// ```rust,ignore
/// use pipegen_sdk::PipelineGeneratorBuilder;
///
/// let generator = PipelineGeneratorBuilder::new()
///     .with_config_file("pipeline.yaml")
///     .with_output_dir("build")
///     .validate_artifacts(true)
///     .build()?;
///
/// let written = generator.write_files()?;
/// ```
pub struct PipelineGeneratorBuilder {
    config: GeneratorConfig,
}

impl PipelineGeneratorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::new(),
        }
    }

    /// Load the pipeline from a YAML file
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source = Some(ConfigSource::File(path.into()));
        self
    }

    /// Use YAML content directly (alternative to a file path)
    pub fn with_config_content(mut self, content: impl Into<String>) -> Self {
        self.config.source = Some(ConfigSource::Content(content.into()));
        self
    }

    /// Use an already constructed configuration
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config.source = Some(ConfigSource::Config(Box::new(config)));
        self
    }

    /// Render for this engine regardless of the configuration
    pub fn with_engine(mut self, engine: PipelineEngine) -> Self {
        self.config.engine_override = Some(engine);
        self
    }

    /// Set the root directory for generated files
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    /// Enable artifact reference validation
    pub fn validate_artifacts(mut self, enabled: bool) -> Self {
        self.config.compiler_options.validate_artifacts = enabled;
        self
    }

    /// Build the generator
    pub fn build(self) -> Result<PipelineGenerator> {
        let GeneratorConfig {
            source,
            engine_override,
            output_dir,
            compiler_options,
        } = self.config;

        let mut pipeline = match source {
            Some(ConfigSource::File(path)) => {
                tracing::info!("Loading pipeline configuration from {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                PipelineParser::parse(&content)?
            }
            Some(ConfigSource::Content(content)) => PipelineParser::parse(&content)?,
            Some(ConfigSource::Config(config)) => *config,
            None => {
                return Err(SdkError::ConfigError(
                    "no pipeline configuration provided".to_string(),
                ))
            }
        };

        if let Some(engine) = engine_override {
            tracing::debug!("Overriding engine {} with {}", pipeline.engine, engine);
            pipeline.engine = engine;
        }

        tracing::info!(
            "Pipeline generator ready: engine={}, stages={}, independent_stages={}",
            pipeline.engine,
            pipeline.stages.len(),
            pipeline.independent_stages.len()
        );

        Ok(PipelineGenerator::new(
            pipeline,
            PipelineCompiler::with_options(compiler_options),
            output_dir,
        ))
    }
}

impl Default for PipelineGeneratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
