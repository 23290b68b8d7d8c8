//! Engine-agnostic pipeline steps
//!
//! A step is a stateless value describing one unit of work inside a job.
//! The set of variants is closed; rendering a step for a backend is done
//! by the compiler's per-backend codegen, which matches exhaustively on
//! [`Step`]. User-supplied behaviour goes through [`Step::Custom`], which
//! carries a literal fragment per backend it supports.

use crate::error::{CoreError, Result};
use crate::ir::fragment::{
    BashStepConfig, CodeCatalystStepConfig, GithubStepConfig, GitlabStepConfig,
};
use serde::{Deserialize, Serialize};

/// Default session name for assumed roles on token-exchange backends
pub const DEFAULT_SESSION_NAME: &str = "GitHubAction";

/// A single unit of pipeline work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Literal shell instructions, run in order
    Command(Vec<String>),

    /// Switch the job's credentials to an IAM role
    AssumeRole(AssumeRoleConfig),

    /// Store a path as a named artifact for later jobs
    UploadArtifact(ArtifactConfig),

    /// Fetch a named artifact produced by a predecessor job
    DownloadArtifact(ArtifactConfig),

    /// User-supplied step with literal per-backend renderings
    Custom(CustomStep),
}

/// Configuration of an [`Step::AssumeRole`] step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssumeRoleConfig {
    /// ARN of the role to assume
    pub role_arn: String,

    /// Identifier for the assumed role session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,

    /// AWS region to configure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl AssumeRoleConfig {
    pub fn new(role_arn: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
            session_name: None,
            region: None,
        }
    }

    pub fn with_session_name(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = Some(session_name.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Name and path of a transferred artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Artifact name, shared between upload and download
    pub name: String,

    /// Path to upload from / download to
    pub path: String,
}

impl ArtifactConfig {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A user-supplied step
///
/// Each backend field holds the literal fragment emitted for that backend.
/// A missing field means the step does not support the backend, which is
/// a compile error when the step is rendered for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomStep {
    /// Name used in diagnostics
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubStepConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab: Option<GitlabStepConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash: Option<BashStepConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codecatalyst: Option<CodeCatalystStepConfig>,
}

impl CustomStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_github(mut self, config: GithubStepConfig) -> Self {
        self.github = Some(config);
        self
    }

    pub fn with_gitlab(mut self, config: GitlabStepConfig) -> Self {
        self.gitlab = Some(config);
        self
    }

    pub fn with_bash(mut self, config: BashStepConfig) -> Self {
        self.bash = Some(config);
        self
    }

    pub fn with_codecatalyst(mut self, config: CodeCatalystStepConfig) -> Self {
        self.codecatalyst = Some(config);
        self
    }
}

impl Step {
    /// Command step from any list of instructions
    pub fn command<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Step::Command(commands.into_iter().map(Into::into).collect())
    }

    pub fn assume_role(config: AssumeRoleConfig) -> Self {
        Step::AssumeRole(config)
    }

    pub fn upload_artifact(name: impl Into<String>, path: impl Into<String>) -> Self {
        Step::UploadArtifact(ArtifactConfig::new(name, path))
    }

    pub fn download_artifact(name: impl Into<String>, path: impl Into<String>) -> Self {
        Step::DownloadArtifact(ArtifactConfig::new(name, path))
    }

    pub fn custom(step: CustomStep) -> Self {
        Step::Custom(step)
    }

    /// Short human-readable label for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Step::Command(commands) => match commands.first() {
                Some(first) => format!("command '{}'", first),
                None => "command".to_string(),
            },
            Step::AssumeRole(config) => format!("assume_role '{}'", config.role_arn),
            Step::UploadArtifact(config) => format!("upload_artifact '{}'", config.name),
            Step::DownloadArtifact(config) => format!("download_artifact '{}'", config.name),
            Step::Custom(custom) => format!("custom '{}'", custom.name),
        }
    }

    /// Check the step's own fields
    pub fn validate(&self) -> Result<()> {
        match self {
            Step::AssumeRole(config) if config.role_arn.trim().is_empty() => Err(
                CoreError::InvalidStep("assume_role requires a non-empty role_arn".to_string()),
            ),
            Step::UploadArtifact(config) | Step::DownloadArtifact(config)
                if config.name.trim().is_empty() =>
            {
                Err(CoreError::InvalidStep(format!(
                    "artifact step for path '{}' requires a name",
                    config.path
                )))
            }
            Step::Custom(custom) if custom.name.trim().is_empty() => Err(CoreError::InvalidStep(
                "custom steps require a name".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
