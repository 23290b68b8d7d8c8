//! GitLab CI step rendering

use super::{unsupported, StepCodegen};
use crate::error::Result;
use pipegen_core::ir::GitlabStepConfig;
use pipegen_core::{PipelineEngine, Step};
use std::collections::BTreeMap;

/// Renders steps as GitLab script lines
///
/// Credentials go through the `awslogin` helper defined by the `.aws_base`
/// alias job. Artifact steps render empty: GitLab moves artifacts through
/// the `artifacts` declarations of the alias jobs and `needs: artifacts`.
pub struct GitlabCodegen;

impl StepCodegen for GitlabCodegen {
    type Fragment = GitlabStepConfig;
    const ENGINE: PipelineEngine = PipelineEngine::Gitlab;

    fn render_step(step: &Step) -> Result<GitlabStepConfig> {
        let fragment = match step {
            Step::Command(commands) => GitlabStepConfig {
                commands: commands.clone(),
                ..Default::default()
            },
            Step::AssumeRole(config) => {
                let login = match &config.session_name {
                    Some(session) => format!("awslogin {} {}", config.role_arn, session),
                    None => format!("awslogin {}", config.role_arn),
                };
                let env = config
                    .region
                    .iter()
                    .map(|region| ("AWS_REGION".to_string(), region.clone()))
                    .collect::<BTreeMap<_, _>>();
                GitlabStepConfig {
                    commands: vec![login],
                    env,
                    ..Default::default()
                }
            }
            Step::UploadArtifact(_) | Step::DownloadArtifact(_) => GitlabStepConfig::default(),
            Step::Custom(custom) => custom
                .gitlab
                .clone()
                .ok_or_else(|| unsupported(step, Self::ENGINE))?,
        };
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipegen_core::{AssumeRoleConfig, CustomStep};

    #[test]
    fn test_assume_role() {
        let step = Step::assume_role(AssumeRoleConfig::new("arn:role").with_region("eu-central-1"));
        let fragment = GitlabCodegen::render_step(&step).unwrap();
        assert_eq!(fragment.commands, vec!["awslogin arn:role"]);
        assert_eq!(fragment.env["AWS_REGION"], "eu-central-1");

        let step = Step::assume_role(AssumeRoleConfig::new("arn:role").with_session_name("deploy"));
        let fragment = GitlabCodegen::render_step(&step).unwrap();
        assert_eq!(fragment.commands, vec!["awslogin arn:role deploy"]);
        assert!(fragment.env.is_empty());
    }

    #[test]
    fn test_artifact_steps_are_empty() {
        let fragment = GitlabCodegen::render_steps(&[
            Step::upload_artifact("cloud-assembly", "cdk.out/"),
            Step::download_artifact("cloud-assembly", "cdk.out/"),
        ])
        .unwrap();
        assert_eq!(fragment, GitlabStepConfig::default());
    }

    #[test]
    fn test_custom_step_without_gitlab_fragment() {
        let step = Step::custom(CustomStep::new("gh-only").with_github(Default::default()));
        let err = GitlabCodegen::render_step(&step).unwrap_err();
        assert_eq!(
            err,
            crate::error::CompileError::UnsupportedRenderTarget {
                step: "custom 'gh-only'".to_string(),
                engine: PipelineEngine::Gitlab,
            }
        );
    }
}
