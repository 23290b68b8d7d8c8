//! GitLab CI configuration model
//!
//! Jobs are grouped into ordered execution stages. Reusable fragments are
//! alias jobs (names starting with `.`) pulled in through `extends`.

use crate::ir::job_map::JobMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete `.gitlab-ci.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GitlabConfiguration {
    /// Execution stages in order
    pub stages: Vec<String>,

    /// Alias and concrete jobs in declaration order
    #[serde(flatten)]
    pub jobs: JobMap<GitlabJob>,
}

impl GitlabConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add execution stages, skipping ones already present
    pub fn add_stages<I, S>(&mut self, stages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for stage in stages {
            let stage = stage.into();
            if !self.stages.contains(&stage) {
                self.stages.push(stage);
            }
        }
    }

    pub fn file_path(&self) -> &'static str {
        ".gitlab-ci.yml"
    }
}

/// When a job runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobWhen {
    OnSuccess,
    Manual,
}

/// Dependency on another job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Need {
    pub job: String,

    /// Fetch the job's artifacts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<bool>,
}

impl Need {
    pub fn job(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            artifacts: None,
        }
    }

    pub fn with_artifacts(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            artifacts: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlyRefs {
    pub refs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobImage {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdToken {
    pub aud: String,
}

/// Artifacts kept after a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobArtifacts {
    pub when: JobWhen,
    pub expire_in: String,
    pub name: String,
    pub untracked: bool,
    pub paths: Vec<String>,
}

/// A concrete or alias job
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GitlabJob {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<JobWhen>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub only: Option<OnlyRefs>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<Need>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<JobImage>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub id_tokens: BTreeMap<String, IdToken>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub before_script: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub script: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<JobArtifacts>,
}

impl GitlabJob {
    /// Names of the jobs this job needs
    pub fn need_names(&self) -> Vec<&str> {
        self.needs.iter().map(|need| need.job.as_str()).collect()
    }

    pub fn is_alias(name: &str) -> bool {
        name.starts_with('.')
    }
}
