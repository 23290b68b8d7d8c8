//! Shared step sequences
//!
//! Install, synth, asset publishing, diff and deploy sequences are the same
//! for every backend; only their arrangement into jobs differs.

use crate::error::Result;
use crate::resolver::{Operation, RoleResolver};
use pipegen_core::{AssumeRoleConfig, PipelineConfig, ProjectCommands, Step};

/// Artifact carrying the synthesized cloud assembly between jobs
pub const CLOUD_ASSEMBLY_ARTIFACT: &str = "cloud-assembly";

/// Region the asset publishing role is assumed in
pub const ASSET_REGION: &str = "us-east-1";

/// Artifact name of a stage's deployment outputs
pub fn outputs_artifact(stage: &str) -> String {
    format!("cdk-outputs-{}", stage)
}

/// Builds engine-agnostic step sequences from the configuration
pub(crate) struct StepAssembler<'a> {
    config: &'a PipelineConfig,
    project: &'a dyn ProjectCommands,
    roles: RoleResolver<'a>,
    pre_install_commands: Vec<String>,
}

impl<'a> StepAssembler<'a> {
    pub fn new(config: &'a PipelineConfig, project: &'a dyn ProjectCommands) -> Self {
        Self {
            config,
            project,
            roles: RoleResolver::new(&config.iam_role_arns),
            pre_install_commands: Vec::new(),
        }
    }

    /// Commands prepended to every install sequence
    pub fn with_pre_install_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pre_install_commands
            .extend(commands.into_iter().map(Into::into));
        self
    }

    pub fn project(&self) -> &'a dyn ProjectCommands {
        self.project
    }

    /// Assume the required role of an operation
    pub fn assume_role(
        &self,
        operation: Operation,
        stage: Option<&str>,
        region: Option<&str>,
    ) -> Result<Step> {
        let role_arn = self.roles.resolve(operation, stage)?;
        let mut config = AssumeRoleConfig::new(role_arn);
        if let Some(region) = region {
            config = config.with_region(region);
        }
        Ok(Step::assume_role(config))
    }

    /// Assume the synth role, if one is configured
    pub fn synth_role(&self, session_name: Option<&str>) -> Option<Step> {
        self.roles.try_resolve(Operation::Synth, None).map(|role_arn| {
            let mut config = AssumeRoleConfig::new(role_arn);
            if let Some(session) = session_name {
                config = config.with_session_name(session);
            }
            Step::assume_role(config)
        })
    }

    /// User pre-install steps followed by the install commands
    pub fn install(&self) -> Vec<Step> {
        let mut commands = self.pre_install_commands.clone();
        commands.extend(self.project.install_commands());

        let mut steps = self.config.pre_install_steps.clone();
        steps.push(Step::Command(commands));
        steps
    }

    /// Synth commands wrapped in the user pre/post synth steps
    pub fn synth(&self) -> Vec<Step> {
        let mut steps = self.config.pre_synth_steps.clone();
        steps.push(Step::Command(self.project.synth_commands()));
        steps.extend(self.config.post_synth_steps.iter().cloned());
        steps
    }

    pub fn diff(&self, stage: &str) -> Step {
        Step::Command(self.project.diff_commands(stage))
    }

    pub fn deploy(&self, stage: &str) -> Step {
        Step::Command(self.project.deploy_commands(stage))
    }

    pub fn upload_assembly(&self) -> Step {
        Step::upload_artifact(CLOUD_ASSEMBLY_ARTIFACT, self.assembly_path())
    }

    pub fn download_assembly(&self) -> Step {
        Step::download_artifact(CLOUD_ASSEMBLY_ARTIFACT, self.assembly_path())
    }

    pub fn upload_outputs(&self, stage: &str) -> Step {
        Step::upload_artifact(outputs_artifact(stage), format!("{}.json", outputs_artifact(stage)))
    }

    fn assembly_path(&self) -> String {
        format!("{}/", self.project.cdk_out())
    }

    fn publishes_per_stage(&self) -> bool {
        !self.config.iam_role_arns.asset_publishing_per_stage.is_empty()
    }

    /// Role assumed before installing in the asset publishing job
    ///
    /// Required when assets are published globally. With per-stage
    /// publishing each stage assumes its own role, so this is optional.
    pub fn asset_role(&self, region: Option<&str>) -> Result<Option<Step>> {
        if self.publishes_per_stage()
            && self
                .roles
                .try_resolve(Operation::AssetPublishing, None)
                .is_none()
        {
            return Ok(None);
        }
        self.assume_role(Operation::AssetPublishing, None, region)
            .map(Some)
    }

    /// Asset publishing commands, plus the assembly package when versioned
    pub fn publish_assets(&self, versioned: bool) -> Result<Vec<Step>> {
        let mut steps = Vec::new();
        if self.publishes_per_stage() {
            let stages = self
                .config
                .stages
                .iter()
                .map(|stage| (stage.name.as_str(), &stage.env))
                .chain(
                    self.config
                        .independent_stages
                        .iter()
                        .map(|stage| (stage.name.as_str(), &stage.env)),
                );
            for (name, env) in stages {
                steps.push(self.assume_role(
                    Operation::AssetPublishing,
                    Some(name),
                    Some(&env.region),
                )?);
                steps.push(Step::Command(self.project.asset_upload_commands(Some(name))));
            }
        } else {
            steps.push(Step::Command(self.project.asset_upload_commands(None)));
        }

        if versioned {
            steps.push(Step::Command(self.project.assembly_upload_commands()));
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use pipegen_core::{DeploymentStage, Environment, ProjectConfig, RoleConfig};

    fn config(roles: RoleConfig) -> PipelineConfig {
        PipelineConfig::new(ProjectConfig::new("app"), roles)
            .with_stage(DeploymentStage::new("dev", Environment::new("1", "eu-west-1")))
            .with_stage(DeploymentStage::new("prod", Environment::new("2", "eu-west-2")))
    }

    #[test]
    fn test_install_prepends_extra_commands() {
        let config = config(RoleConfig::with_default("arn:default"))
            .with_pre_install_step(Step::command(["echo setup"]));
        let assembler = StepAssembler::new(&config, &config.project)
            .with_pre_install_commands(["export TOKEN=1"]);

        assert_eq!(
            assembler.install(),
            vec![
                Step::command(["echo setup"]),
                Step::command(["export TOKEN=1", "npx projen install:ci"]),
            ]
        );
    }

    #[test]
    fn test_global_asset_publishing() {
        let config = config(RoleConfig::with_default("arn:default"));
        let assembler = StepAssembler::new(&config, &config.project);

        assert!(assembler.asset_role(Some(ASSET_REGION)).unwrap().is_some());
        assert_eq!(
            assembler.publish_assets(true).unwrap(),
            vec![
                Step::command(["npx projen publish:assets"]),
                Step::command(["npx projen bump", "npx projen release:push-assembly"]),
            ]
        );
    }

    #[test]
    fn test_per_stage_asset_publishing() {
        let config = config(
            RoleConfig::default()
                .asset_publishing_for("dev", "arn:assets-dev")
                .asset_publishing_for("prod", "arn:assets-prod"),
        );
        let assembler = StepAssembler::new(&config, &config.project);

        assert_eq!(assembler.asset_role(None).unwrap(), None);
        let steps = assembler.publish_assets(false).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(
            steps[0],
            Step::assume_role(AssumeRoleConfig::new("arn:assets-dev").with_region("eu-west-1"))
        );
        assert_eq!(steps[3], Step::command(["npx projen publish:assets:prod"]));
    }

    #[test]
    fn test_missing_asset_role() {
        let config = config(RoleConfig::default().deployment_for("dev", "arn:dev"));
        let assembler = StepAssembler::new(&config, &config.project);

        let err = assembler.asset_role(None).unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnresolvableCredential {
                operation: Operation::AssetPublishing,
                stage: None
            }
        ));
    }
}
