//! GitLab CI job graph
//!
//! Shared setup lives in alias jobs pulled in through `extends`:
//! - `.aws_base`: image, OIDC token and the `awslogin` shell helper
//! - `.artifacts_cdk`: keeps the cloud assembly of the synth job
//! - `.artifacts_cdkdeploy`: keeps the deployment outputs
//!
//! Execution stages are `synth`, `publish_assets`, then one per stage.
//!
//! Manual-approval stages are `when: manual` jobs of the same pipeline run.
//! They deploy that run's cloud assembly; GitLab has no dispatch input to
//! carry a caller-supplied package version, so unlike the GitHub release
//! workflows no version is requested.

use super::assembler::StepAssembler;
use super::plan::{deploy_job_id, diff_job_id};
use crate::codegen::{GitlabCodegen, StepCodegen};
use crate::compiler::CompilerOptions;
use crate::error::{CompileError, Result};
use crate::pipeline::JobPlan;
use crate::resolver::{Operation, RunnerResolver};
use crate::topology::{self, StageTopology};
use crate::validator::ConfigValidator;
use pipegen_core::ir::{
    CompiledPipeline, GitlabConfiguration, GitlabJob, IdToken, JobArtifacts, JobImage, JobWhen,
    Need, OnlyRefs,
};
use pipegen_core::{DeploymentStage, IndependentStage, PipelineConfig, ProjectCommands};
use std::collections::BTreeMap;

/// Image used when the configuration names none
pub const DEFAULT_IMAGE: &str = "jsii/superchain:1-buster-slim-node18";

const SYNTH_STAGE: &str = "synth";
const ASSET_STAGE: &str = "publish_assets";

const AWS_BASE: &str = ".aws_base";
const ARTIFACTS_CDK: &str = ".artifacts_cdk";
const ARTIFACTS_CDK_DEPLOY: &str = ".artifacts_cdkdeploy";

const AWS_LOGIN_SCRIPT: &str = r#"check_variables_defined() {
  for var in "$@"; do
    if [ -z "$(eval "echo \$$var")" ]; then
      log_fatal "${var} not defined";
    fi
  done
}

awslogin() {
  roleArn=${1:-${AWS_ROLE_ARN}}
  sessionName=${2:-GitLabRunner-${CI_PROJECT_ID}-${CI_PIPELINE_ID}}
  check_variables_defined roleArn AWS_TOKEN
  export $(printf "AWS_ACCESS_KEY_ID=%s AWS_SECRET_ACCESS_KEY=%s AWS_SESSION_TOKEN=%s" $(aws sts assume-role-with-web-identity --role-arn ${roleArn} --role-session-name "${sessionName}" --web-identity-token ${AWS_TOKEN} --duration-seconds 3600 --query 'Credentials.[AccessKeyId,SecretAccessKey,SessionToken]' --output text))
}
"#;

/// Per-job placement that GitLab expresses outside the step body
#[derive(Debug, Default)]
struct JobLayout {
    stage: String,
    extends: Vec<&'static str>,
    when: Option<JobWhen>,
    branch_only: bool,
    needs: Vec<Need>,
}

pub(crate) struct GitlabPipelineBuilder<'a> {
    config: &'a PipelineConfig,
    options: &'a CompilerOptions,
    steps: StepAssembler<'a>,
    runners: RunnerResolver<'a>,
    versioned: bool,
}

impl<'a> GitlabPipelineBuilder<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        project: &'a dyn ProjectCommands,
        options: &'a CompilerOptions,
    ) -> Self {
        Self {
            config,
            options,
            steps: StepAssembler::new(config, project),
            runners: RunnerResolver::new(&config.runner_tags),
            versioned: config.needs_versioned_artifacts(),
        }
    }

    pub fn build(&self) -> Result<CompiledPipeline> {
        let mut gitlab = GitlabConfiguration::new();
        self.add_aliases(&mut gitlab)?;

        let mut jobs = vec![self.synth_job()?, self.asset_job()?];
        gitlab.add_stages([SYNTH_STAGE, ASSET_STAGE]);

        for entry in topology::plan(self.config) {
            gitlab.add_stages([entry.name()]);
            match entry {
                StageTopology::Sequential { stage, previous } => {
                    jobs.push(self.diff_job(stage)?);
                    jobs.push(self.deploy_job(stage, previous, false)?);
                }
                StageTopology::ManualFork { stage } => {
                    jobs.push(self.diff_job(stage)?);
                    jobs.push(self.deploy_job(stage, None, true)?);
                }
                StageTopology::Independent { stage } => {
                    jobs.push(self.independent_job(stage)?);
                }
            }
        }

        if self.options.validate_artifacts {
            let plans: Vec<JobPlan> = jobs.iter().map(|(plan, _)| plan.clone()).collect();
            ConfigValidator::validate_artifact_references(&plans)?;
        }

        for (plan, layout) in jobs {
            let job = self.render_job(&plan, layout)?;
            Self::insert(&mut gitlab, plan.id, job)?;
        }

        log::debug!(
            "gitlab: {} execution stage(s), {} job(s)",
            gitlab.stages.len(),
            gitlab.jobs.len()
        );
        Ok(CompiledPipeline::Gitlab { config: gitlab })
    }

    fn add_aliases(&self, gitlab: &mut GitlabConfiguration) -> Result<()> {
        let project = self.steps.project();

        let artifacts_cdk = GitlabJob {
            artifacts: Some(Self::artifacts("CDK Assembly", project.cdk_out())),
            ..Default::default()
        };
        let artifacts_deploy = GitlabJob {
            artifacts: Some(Self::artifacts("CDK Outputs", "cdk-outputs-*.json")),
            ..Default::default()
        };
        let aws_base = GitlabJob {
            image: Some(JobImage {
                name: self
                    .config
                    .image
                    .clone()
                    .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            }),
            id_tokens: BTreeMap::from([(
                "AWS_TOKEN".to_string(),
                IdToken {
                    aud: "https://sts.amazonaws.com".to_string(),
                },
            )]),
            variables: BTreeMap::from([("CI".to_string(), "true".to_string())]),
            before_script: vec![AWS_LOGIN_SCRIPT.to_string()],
            ..Default::default()
        };

        Self::insert(gitlab, ARTIFACTS_CDK.to_string(), artifacts_cdk)?;
        Self::insert(gitlab, ARTIFACTS_CDK_DEPLOY.to_string(), artifacts_deploy)?;
        Self::insert(gitlab, AWS_BASE.to_string(), aws_base)
    }

    fn artifacts(title: &str, path: &str) -> JobArtifacts {
        JobArtifacts {
            when: JobWhen::OnSuccess,
            expire_in: "30 days".to_string(),
            name: format!("{} - $CI_JOB_NAME-$CI_COMMIT_REF_SLUG", title),
            untracked: false,
            paths: vec![path.to_string()],
        }
    }

    fn synth_job(&self) -> Result<(JobPlan, JobLayout)> {
        let mut steps: Vec<_> = self.steps.synth_role(None).into_iter().collect();
        steps.extend(self.steps.install());
        steps.extend(self.steps.synth());
        // Kept by `.artifacts_cdk`; recorded for reference validation
        steps.push(self.steps.upload_assembly());

        let plan = JobPlan::new(SYNTH_STAGE, "Synth CDK application", Operation::Synth).steps(steps);
        let layout = JobLayout {
            stage: SYNTH_STAGE.to_string(),
            extends: vec![AWS_BASE, ARTIFACTS_CDK],
            ..Default::default()
        };
        Ok((plan, layout))
    }

    fn asset_job(&self) -> Result<(JobPlan, JobLayout)> {
        let mut steps: Vec<_> = self.steps.asset_role(None)?.into_iter().collect();
        steps.extend(self.steps.install());
        steps.extend(self.steps.publish_assets(self.versioned)?);

        let plan = JobPlan::new(ASSET_STAGE, "Publish assets to AWS", Operation::AssetPublishing)
            .needs([SYNTH_STAGE])
            .steps(steps);
        let layout = JobLayout {
            stage: ASSET_STAGE.to_string(),
            extends: vec![AWS_BASE],
            needs: vec![Need::with_artifacts(SYNTH_STAGE)],
            ..Default::default()
        };
        Ok((plan, layout))
    }

    fn diff_job(&self, stage: &DeploymentStage) -> Result<(JobPlan, JobLayout)> {
        let mut steps = vec![self.steps.assume_role(
            Operation::Diff,
            Some(&stage.name),
            Some(&stage.env.region),
        )?];
        steps.push(self.steps.download_assembly());
        steps.extend(self.steps.install());
        steps.push(self.steps.diff(&stage.name));
        steps.extend(stage.post_diff_steps.iter().cloned());

        let plan = JobPlan::new(
            diff_job_id(&stage.name),
            format!("Diff stage {}", stage.name),
            Operation::Diff,
        )
        .for_stage(&stage.name)
        .needs([SYNTH_STAGE, ASSET_STAGE])
        .steps(steps);
        let layout = JobLayout {
            stage: stage.name.clone(),
            extends: vec![AWS_BASE],
            branch_only: true,
            needs: vec![Need::with_artifacts(SYNTH_STAGE), Need::job(ASSET_STAGE)],
            ..Default::default()
        };
        Ok((plan, layout))
    }

    /// Manual stages keep their diff gate but never join the chain
    fn deploy_job(
        &self,
        stage: &DeploymentStage,
        previous: Option<&str>,
        manual: bool,
    ) -> Result<(JobPlan, JobLayout)> {
        let mut steps = vec![self.steps.assume_role(
            Operation::Deployment,
            Some(&stage.name),
            Some(&stage.env.region),
        )?];
        steps.push(self.steps.download_assembly());
        steps.extend(self.steps.install());
        steps.push(self.steps.deploy(&stage.name));
        steps.extend(stage.post_deploy_steps.iter().cloned());

        let diff = diff_job_id(&stage.name);
        let previous = previous.map(deploy_job_id);

        let mut needs = vec![
            Need::with_artifacts(SYNTH_STAGE),
            Need::job(ASSET_STAGE),
            Need::job(&diff),
        ];
        needs.extend(previous.iter().map(Need::job));

        let plan = JobPlan::new(
            deploy_job_id(&stage.name),
            format!("Deploy stage {} to AWS", stage.name),
            Operation::Deployment,
        )
        .for_stage(&stage.name)
        .needs([SYNTH_STAGE.to_string(), ASSET_STAGE.to_string(), diff])
        .needs(previous)
        .steps(steps);
        let layout = JobLayout {
            stage: stage.name.clone(),
            extends: vec![AWS_BASE, ARTIFACTS_CDK_DEPLOY],
            when: manual.then_some(JobWhen::Manual),
            branch_only: true,
            needs,
        };
        Ok((plan, layout))
    }

    fn independent_job(&self, stage: &IndependentStage) -> Result<(JobPlan, JobLayout)> {
        let mut steps = vec![self.steps.assume_role(
            Operation::Deployment,
            Some(&stage.name),
            Some(&stage.env.region),
        )?];
        steps.extend(self.steps.install());
        steps.extend(self.steps.synth());
        steps.push(self.steps.diff(&stage.name));
        steps.extend(stage.post_diff_steps.iter().cloned());
        steps.push(self.steps.deploy(&stage.name));
        steps.extend(stage.post_deploy_steps.iter().cloned());

        let plan = JobPlan::new(
            deploy_job_id(&stage.name),
            format!("Deploy independent stage {} to AWS", stage.name),
            Operation::Deployment,
        )
        .for_stage(&stage.name)
        .steps(steps);
        let layout = JobLayout {
            stage: stage.name.clone(),
            extends: vec![AWS_BASE, ARTIFACTS_CDK_DEPLOY],
            when: Some(JobWhen::Manual),
            ..Default::default()
        };
        Ok((plan, layout))
    }

    fn render_job(&self, plan: &JobPlan, layout: JobLayout) -> Result<GitlabJob> {
        let fragment = GitlabCodegen::render_steps(&plan.steps)?;

        let mut extends: Vec<String> = layout.extends.iter().map(|s| s.to_string()).collect();
        for extension in fragment.extensions {
            if !extends.contains(&extension) {
                extends.push(extension);
            }
        }

        let mut needs = layout.needs;
        for need in fragment.needs {
            if !needs.iter().any(|existing| existing.job == need) {
                needs.push(Need::job(need));
            }
        }

        Ok(GitlabJob {
            extends,
            stage: Some(layout.stage),
            tags: self
                .runners
                .resolve(plan.operation, plan.stage_name())
                .map(<[String]>::to_vec),
            when: layout.when,
            only: layout.branch_only.then(|| OnlyRefs {
                refs: vec![self.config.branch.clone()],
            }),
            needs,
            variables: fragment.env,
            script: fragment.commands,
            ..Default::default()
        })
    }

    fn insert(gitlab: &mut GitlabConfiguration, id: String, job: GitlabJob) -> Result<()> {
        gitlab.jobs.insert(id.clone(), job).map_err(|_| CompileError::DuplicateJob {
            unit: gitlab.file_path().to_string(),
            job: id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_alias_naming() {
        let artifacts = GitlabPipelineBuilder::artifacts("CDK Assembly", "cdk.out");
        assert_eq!(artifacts.name, "CDK Assembly - $CI_JOB_NAME-$CI_COMMIT_REF_SLUG");
        assert_eq!(artifacts.paths, vec!["cdk.out"]);
        assert_eq!(artifacts.expire_in, "30 days");
    }

    #[test]
    fn test_login_helper_defined() {
        assert!(AWS_LOGIN_SCRIPT.contains("awslogin() {"));
        assert!(AWS_LOGIN_SCRIPT.contains("assume-role-with-web-identity"));
    }
}
