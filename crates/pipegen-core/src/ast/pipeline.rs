//! Pipeline configuration
//!
//! The complete declarative description a compilation starts from.

use crate::ast::project::ProjectConfig;
use crate::ast::roles::{RoleConfig, RunnerSelection};
use crate::ast::stage::{DeploymentStage, IndependentStage};
use crate::ir::PipelineEngine;
use crate::step::Step;
use serde::{Deserialize, Serialize};

/// Default branch triggering the main pipeline
pub const DEFAULT_BRANCH: &str = "main";

/// A multi-stage deployment pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Backend the pipeline is rendered for
    #[serde(default)]
    pub engine: PipelineEngine,

    /// Branch triggering the main pipeline
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Host project handle
    #[serde(default)]
    pub project: ProjectConfig,

    /// IAM role ARNs
    #[serde(default)]
    pub iam_role_arns: RoleConfig,

    /// Runner tag selection
    #[serde(default)]
    pub runner_tags: RunnerSelection,

    /// Container image for label-based backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Transport versioned assemblies through the package registry
    #[serde(default)]
    pub use_package_registry: bool,

    /// Steps injected before dependency installation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_install_steps: Vec<Step>,

    /// Steps injected before synth
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_synth_steps: Vec<Step>,

    /// Steps injected after synth
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_synth_steps: Vec<Step>,

    /// Sequential deployment stages, in declaration order
    #[serde(default)]
    pub stages: Vec<DeploymentStage>,

    /// Stages with their own self-contained sequence
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub independent_stages: Vec<IndependentStage>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl PipelineConfig {
    /// Create an empty pipeline for a project
    pub fn new(project: ProjectConfig, iam_role_arns: RoleConfig) -> Self {
        Self {
            engine: PipelineEngine::default(),
            branch: default_branch(),
            project,
            iam_role_arns,
            runner_tags: RunnerSelection::default(),
            image: None,
            use_package_registry: false,
            pre_install_steps: Vec::new(),
            pre_synth_steps: Vec::new(),
            post_synth_steps: Vec::new(),
            stages: Vec::new(),
            independent_stages: Vec::new(),
        }
    }

    pub fn with_engine(mut self, engine: PipelineEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_stage(mut self, stage: DeploymentStage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn with_independent_stage(mut self, stage: IndependentStage) -> Self {
        self.independent_stages.push(stage);
        self
    }

    pub fn with_runner_tags(mut self, runner_tags: RunnerSelection) -> Self {
        self.runner_tags = runner_tags;
        self
    }

    pub fn with_pre_install_step(mut self, step: Step) -> Self {
        self.pre_install_steps.push(step);
        self
    }

    pub fn with_package_registry(mut self) -> Self {
        self.use_package_registry = true;
        self
    }

    /// True iff at least one deployment stage requires manual approval
    pub fn needs_versioned_artifacts(&self) -> bool {
        self.stages.iter().any(|stage| stage.manual_approval)
    }

    /// Names of all stages, sequential first, then independent
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.independent_stages.iter().map(|s| s.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::stage::Environment;

    fn env() -> Environment {
        Environment::new("123456789012", "eu-central-1")
    }

    #[test]
    fn test_needs_versioned_artifacts() {
        let config = PipelineConfig::new(ProjectConfig::default(), RoleConfig::default())
            .with_stage(DeploymentStage::new("dev", env()));
        assert!(!config.needs_versioned_artifacts());

        let config = config.with_stage(DeploymentStage::new("prod", env()).with_manual_approval());
        assert!(config.needs_versioned_artifacts());
    }

    #[test]
    fn test_independent_stage_does_not_need_versioned_artifacts() {
        let config = PipelineConfig::new(ProjectConfig::default(), RoleConfig::default())
            .with_independent_stage(IndependentStage::new("infra", env()));
        assert!(!config.needs_versioned_artifacts());
    }

    #[test]
    fn test_stage_names_order() {
        let config = PipelineConfig::new(ProjectConfig::default(), RoleConfig::default())
            .with_independent_stage(IndependentStage::new("infra", env()))
            .with_stage(DeploymentStage::new("dev", env()))
            .with_stage(DeploymentStage::new("prod", env()));
        let names: Vec<&str> = config.stage_names().collect();
        assert_eq!(names, vec!["dev", "prod", "infra"]);
    }
}
