//! Backend-neutral job plans
//!
//! Builders first describe each job as a [`JobPlan`] (identity, edges and
//! engine-agnostic steps), then hand the plans to a step renderer. Artifact
//! validation runs on plans, so it sees the same graph every backend gets.

use crate::resolver::Operation;
use pipegen_core::Step;

/// A job before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct JobPlan {
    /// Job id, unique within its graph
    pub id: String,

    /// Display name
    pub name: String,

    /// Operation the job performs, drives runner selection
    pub operation: Operation,

    /// Stage the job belongs to
    pub stage: Option<String>,

    /// Ids of jobs that must finish first
    pub needs: Vec<String>,

    pub steps: Vec<Step>,
}

impl JobPlan {
    pub fn new(id: impl Into<String>, name: impl Into<String>, operation: Operation) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            operation,
            stage: None,
            needs: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn for_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn needs<I, S>(mut self, jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.needs.extend(jobs.into_iter().map(Into::into));
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn stage_name(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    /// Names of artifacts uploaded by this job, in step order
    pub fn uploads(&self) -> impl Iterator<Item = (usize, &str)> {
        self.steps.iter().enumerate().filter_map(|(index, step)| match step {
            Step::UploadArtifact(config) => Some((index, config.name.as_str())),
            _ => None,
        })
    }

    /// Names of artifacts downloaded by this job, in step order
    pub fn downloads(&self) -> impl Iterator<Item = (usize, &str)> {
        self.steps.iter().enumerate().filter_map(|(index, step)| match step {
            Step::DownloadArtifact(config) => Some((index, config.name.as_str())),
            _ => None,
        })
    }
}

/// Job id of the deploy job of a stage
pub fn deploy_job_id(stage: &str) -> String {
    format!("deploy-{}", stage)
}

/// Job id of the diff job of a stage
pub fn diff_job_id(stage: &str) -> String {
    format!("diff-{}", stage)
}
