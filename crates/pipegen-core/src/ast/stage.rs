//! Stage definitions
//!
//! A stage binds a name to a target AWS environment. Deployment stages form
//! the sequential chain of the main pipeline (or fork into a manually
//! dispatched unit), independent stages always get their own sequence.

use crate::step::Step;
use serde::{Deserialize, Serialize};

/// Target AWS environment of a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// AWS account id
    pub account: String,

    /// AWS region
    pub region: String,
}

impl Environment {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
        }
    }
}

/// A stage of the main deployment pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStage {
    /// Stage name (unique within the pipeline)
    pub name: String,

    /// Target environment
    pub env: Environment,

    /// Deployment requires a human-dispatched trigger with a package version
    #[serde(default)]
    pub manual_approval: bool,

    /// Steps executed after the diff commands
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_diff_steps: Vec<Step>,

    /// Steps executed after the deploy commands
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_deploy_steps: Vec<Step>,
}

impl DeploymentStage {
    /// Create an automatically deployed stage
    pub fn new(name: impl Into<String>, env: Environment) -> Self {
        Self {
            name: name.into(),
            env,
            manual_approval: false,
            post_diff_steps: Vec::new(),
            post_deploy_steps: Vec::new(),
        }
    }

    /// Require manual approval for this stage
    pub fn with_manual_approval(mut self) -> Self {
        self.manual_approval = true;
        self
    }

    pub fn with_post_diff_step(mut self, step: Step) -> Self {
        self.post_diff_steps.push(step);
        self
    }

    pub fn with_post_deploy_step(mut self, step: Step) -> Self {
        self.post_deploy_steps.push(step);
        self
    }
}

/// A stage with its own synth/diff/deploy sequence and trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependentStage {
    /// Stage name (unique within the pipeline)
    pub name: String,

    /// Target environment
    pub env: Environment,

    /// Steps executed after the diff commands
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_diff_steps: Vec<Step>,

    /// Steps executed after the deploy commands
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_deploy_steps: Vec<Step>,
}

impl IndependentStage {
    pub fn new(name: impl Into<String>, env: Environment) -> Self {
        Self {
            name: name.into(),
            env,
            post_diff_steps: Vec::new(),
            post_deploy_steps: Vec::new(),
        }
    }

    pub fn with_post_diff_step(mut self, step: Step) -> Self {
        self.post_diff_steps.push(step);
        self
    }

    pub fn with_post_deploy_step(mut self, step: Step) -> Self {
        self.post_deploy_steps.push(step);
        self
    }
}
