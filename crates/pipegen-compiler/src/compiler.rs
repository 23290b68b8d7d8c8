//! Main compiler
//!
//! Validates a pipeline configuration and dispatches to the builder of the
//! configured backend.

use crate::error::Result;
use crate::pipeline::{
    BashPipelineBuilder, CodeCatalystPipelineBuilder, GithubPipelineBuilder,
    GitlabPipelineBuilder,
};
use crate::validator::ConfigValidator;
use pipegen_core::ir::CompiledPipeline;
use pipegen_core::{PipelineConfig, PipelineEngine, ProjectCommands};

/// Compiler options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Check that every artifact download has an upstream upload
    pub validate_artifacts: bool,
}

/// The pipeline compiler
#[derive(Debug, Clone, Default)]
pub struct PipelineCompiler {
    options: CompilerOptions,
}

impl PipelineCompiler {
    /// Create a compiler with default options
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    /// Create a compiler with custom options
    pub fn with_options(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile using the project handle embedded in the configuration
    pub fn compile(&self, config: &PipelineConfig) -> Result<CompiledPipeline> {
        self.compile_with_project(config, &config.project)
    }

    /// Compile against an arbitrary host project
    ///
    /// Pure: the same inputs always produce the same job graph, and any
    /// error aborts before anything is emitted.
    pub fn compile_with_project(
        &self,
        config: &PipelineConfig,
        project: &dyn ProjectCommands,
    ) -> Result<CompiledPipeline> {
        ConfigValidator::validate(config)?;

        let compiled = match config.engine {
            PipelineEngine::Github => {
                GithubPipelineBuilder::new(config, project, &self.options).build()?
            }
            PipelineEngine::Gitlab => {
                GitlabPipelineBuilder::new(config, project, &self.options).build()?
            }
            PipelineEngine::Bash => {
                BashPipelineBuilder::new(config, project, &self.options).build()?
            }
            PipelineEngine::CodeCatalyst => {
                CodeCatalystPipelineBuilder::new(config, project).build()?
            }
        };

        log::info!(
            "Compiled pipeline for '{}' ({}): {} stage(s), {} job(s)",
            project.app_name(),
            config.engine,
            config.stages.len() + config.independent_stages.len(),
            compiled.job_count()
        );
        Ok(compiled)
    }
}
