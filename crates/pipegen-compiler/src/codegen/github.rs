//! GitHub Actions step rendering

use super::{unsupported, StepCodegen, DEFAULT_REGION};
use crate::error::Result;
use pipegen_core::ir::{GithubStep, GithubStepConfig, JobPermissions, PermissionLevel};
use pipegen_core::step::DEFAULT_SESSION_NAME;
use pipegen_core::{PipelineEngine, Step};

pub(crate) const CREDENTIALS_ACTION: &str = "aws-actions/configure-aws-credentials@v4";
pub(crate) const UPLOAD_ACTION: &str = "actions/upload-artifact@v4";
pub(crate) const DOWNLOAD_ACTION: &str = "actions/download-artifact@v4";

/// Renders steps as GitHub workflow steps
pub struct GithubCodegen;

impl StepCodegen for GithubCodegen {
    type Fragment = GithubStepConfig;
    const ENGINE: PipelineEngine = PipelineEngine::Github;

    fn render_step(step: &Step) -> Result<GithubStepConfig> {
        let fragment = match step {
            Step::Command(commands) => GithubStepConfig {
                steps: commands.iter().map(GithubStep::run).collect(),
                ..Default::default()
            },
            Step::AssumeRole(config) => GithubStepConfig {
                steps: vec![GithubStep::uses("AWS Credentials", CREDENTIALS_ACTION)
                    .with_input("role-to-assume", &config.role_arn)
                    .with_input(
                        "role-session-name",
                        config.session_name.as_deref().unwrap_or(DEFAULT_SESSION_NAME),
                    )
                    .with_input(
                        "aws-region",
                        config.region.as_deref().unwrap_or(DEFAULT_REGION),
                    )],
                // OIDC token exchange
                permissions: JobPermissions::id_token(PermissionLevel::Write),
                ..Default::default()
            },
            Step::UploadArtifact(config) => GithubStepConfig {
                steps: vec![GithubStep::uses("Upload Artifact", UPLOAD_ACTION)
                    .with_input("name", &config.name)
                    .with_input("path", &config.path)],
                ..Default::default()
            },
            Step::DownloadArtifact(config) => GithubStepConfig {
                steps: vec![GithubStep::uses("Download Artifact", DOWNLOAD_ACTION)
                    .with_input("name", &config.name)
                    .with_input("path", &config.path)],
                ..Default::default()
            },
            Step::Custom(custom) => custom
                .github
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
    fn test_command_renders_one_step_per_line() {
        let fragment = GithubCodegen::render_step(&Step::command(["npm ci", "npm test"])).unwrap();
        assert_eq!(
            fragment.steps,
            vec![GithubStep::run("npm ci"), GithubStep::run("npm test")]
        );
        assert!(fragment.permissions.is_empty());
    }

    #[test]
    fn test_assume_role_defaults() {
        let step = Step::assume_role(AssumeRoleConfig::new("arn:aws:iam::1:role/deploy"));
        let fragment = GithubCodegen::render_step(&step).unwrap();

        let rendered = &fragment.steps[0];
        assert_eq!(rendered.uses.as_deref(), Some(CREDENTIALS_ACTION));
        assert_eq!(rendered.with["role-to-assume"], "arn:aws:iam::1:role/deploy");
        assert_eq!(rendered.with["role-session-name"], "GitHubAction");
        assert_eq!(rendered.with["aws-region"], "us-east-1");
        assert_eq!(fragment.permissions.id_token, Some(PermissionLevel::Write));
    }

    #[test]
    fn test_assume_role_explicit_fields() {
        let step = Step::assume_role(
            AssumeRoleConfig::new("arn:role")
                .with_session_name("synth")
                .with_region("eu-west-1"),
        );
        let fragment = GithubCodegen::render_step(&step).unwrap();
        assert_eq!(fragment.steps[0].with["role-session-name"], "synth");
        assert_eq!(fragment.steps[0].with["aws-region"], "eu-west-1");
    }

    #[test]
    fn test_artifact_steps() {
        let fragment = GithubCodegen::render_steps(&[
            Step::upload_artifact("cloud-assembly", "cdk.out/"),
            Step::download_artifact("cloud-assembly", "cdk.out/"),
        ])
        .unwrap();

        assert_eq!(fragment.steps[0].uses.as_deref(), Some(UPLOAD_ACTION));
        assert_eq!(fragment.steps[1].uses.as_deref(), Some(DOWNLOAD_ACTION));
        assert_eq!(fragment.steps[1].with["name"], "cloud-assembly");
        assert_eq!(fragment.steps[1].with["path"], "cdk.out/");
    }

    #[test]
    fn test_custom_step() {
        let custom = CustomStep::new("lint").with_github(GithubStepConfig {
            steps: vec![GithubStep::run("npm run lint")],
            needs: vec!["synth".to_string()],
            ..Default::default()
        });
        let fragment = GithubCodegen::render_step(&Step::custom(custom)).unwrap();
        assert_eq!(fragment.needs, vec!["synth"]);

        let gitlab_only = Step::custom(CustomStep::new("gitlab-only").with_gitlab(Default::default()));
        let err = GithubCodegen::render_step(&gitlab_only).unwrap_err();
        assert!(err.to_string().contains("gitlab-only"));
    }
}
