//! Output job graph (IR) definitions
//!
//! This module contains what the compiler produces:
//! - Per-step fragments for each backend (merged into jobs)
//! - Backend-native job graphs (GitHub workflows, GitLab configuration,
//!   flat shell scripts, deferred placeholders)
//! - The [`CompiledPipeline`] handed to the materializing collaborator

pub mod bash;
pub mod codecatalyst;
pub mod engine;
pub mod fragment;
pub mod github;
pub mod gitlab;
pub mod job_map;
pub mod permissions;

pub use bash::{BashScript, BashSection};
pub use codecatalyst::CodeCatalystWorkflow;
pub use engine::PipelineEngine;
pub use fragment::{
    BashStepConfig, CodeCatalystStepConfig, Fragment, GithubStep, GithubStepConfig,
    GitlabStepConfig,
};
pub use github::{
    DispatchInput, GithubJob, GithubWorkflow, PushTrigger, WorkflowDispatch, WorkflowTriggers,
};
pub use gitlab::{
    GitlabConfiguration, GitlabJob, IdToken, JobArtifacts, JobImage, JobWhen, Need, OnlyRefs,
};
pub use job_map::JobMap;
pub use permissions::{JobPermissions, PermissionLevel};

use serde::{Deserialize, Serialize};

/// Package registry settings the host project must add for versioned
/// assembly transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryAuth {
    /// Registry URL
    pub registry: String,

    /// Package scope served by the registry
    pub scope: String,

    /// Additional `.npmrc` settings, in order
    pub settings: Vec<(String, String)>,
}

/// Result of a compilation, one variant per backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "engine", rename_all = "lowercase")]
pub enum CompiledPipeline {
    /// One graph per workflow file
    Github {
        workflows: Vec<GithubWorkflow>,
        #[serde(skip_serializing_if = "Option::is_none")]
        registry_auth: Option<RegistryAuth>,
    },

    /// A single configuration with ordered stages and alias jobs
    Gitlab { config: GitlabConfiguration },

    /// Flat sequential instruction list
    Bash { script: BashScript },

    /// Backend accepted but not rendered yet
    CodeCatalyst { workflow: CodeCatalystWorkflow },
}

impl CompiledPipeline {
    /// Engine this output was produced for
    pub fn engine(&self) -> PipelineEngine {
        match self {
            CompiledPipeline::Github { .. } => PipelineEngine::Github,
            CompiledPipeline::Gitlab { .. } => PipelineEngine::Gitlab,
            CompiledPipeline::Bash { .. } => PipelineEngine::Bash,
            CompiledPipeline::CodeCatalyst { .. } => PipelineEngine::CodeCatalyst,
        }
    }

    /// Total number of jobs across all graphs
    pub fn job_count(&self) -> usize {
        match self {
            CompiledPipeline::Github { workflows, .. } => {
                workflows.iter().map(|w| w.jobs.len()).sum()
            }
            CompiledPipeline::Gitlab { config } => config.jobs.len(),
            CompiledPipeline::Bash { script } => script.sections.len(),
            CompiledPipeline::CodeCatalyst { workflow } => workflow.actions.len(),
        }
    }
}
