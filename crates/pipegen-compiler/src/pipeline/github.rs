//! GitHub Actions job graph
//!
//! Layout:
//! - workflow `deploy` (push on the branch + manual dispatch): `synth`,
//!   `assetUpload` and one `deploy-<stage>` job per sequential stage that
//!   diffs, then deploys
//! - workflow `release-<stage>` per manual-approval stage, dispatched with
//!   the `version` of the assembly package to deploy
//! - workflow `deploy-<stage>` per independent stage

use super::assembler::{StepAssembler, ASSET_REGION};
use super::plan::{deploy_job_id, JobPlan};
use crate::codegen::{GithubCodegen, StepCodegen};
use crate::compiler::CompilerOptions;
use crate::error::{CompileError, Result};
use crate::resolver::{Operation, RunnerResolver};
use crate::topology::{self, StageTopology};
use crate::validator::ConfigValidator;
use pipegen_core::ir::{
    CompiledPipeline, DispatchInput, GithubJob, GithubStep, GithubWorkflow, JobPermissions,
    PermissionLevel, RegistryAuth, WorkflowTriggers,
};
use pipegen_core::{DeploymentStage, IndependentStage, PipelineConfig, ProjectCommands, Step};
use std::collections::BTreeMap;

/// Runner used when no tags resolve
pub const DEFAULT_RUNNER: &str = "ubuntu-latest";

const MAIN_WORKFLOW: &str = "deploy";
const SYNTH_JOB: &str = "synth";
const ASSET_JOB: &str = "assetUpload";
const STAGE_WORKFLOW_JOB: &str = "deploy";

const PACKAGE_REGISTRY: &str = "https://npm.pkg.github.com";
const REGISTRY_TOKEN_COMMAND: &str =
    "echo \"GITHUB_TOKEN=${{ secrets.GITHUB_TOKEN }}\" >> $GITHUB_ENV";
const GIT_IDENTITY_COMMAND: &str = "git config --global user.name \"github-actions\" && git config --global user.email \"github-actions@github.com\"";

pub(crate) struct GithubPipelineBuilder<'a> {
    config: &'a PipelineConfig,
    options: &'a CompilerOptions,
    steps: StepAssembler<'a>,
    runners: RunnerResolver<'a>,
    versioned: bool,
    use_packages: bool,
}

impl<'a> GithubPipelineBuilder<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        project: &'a dyn ProjectCommands,
        options: &'a CompilerOptions,
    ) -> Self {
        let versioned = config.needs_versioned_artifacts();
        let use_packages = versioned && config.use_package_registry;

        let mut steps = StepAssembler::new(config, project);
        if use_packages {
            steps = steps.with_pre_install_commands([REGISTRY_TOKEN_COMMAND]);
        }

        Self {
            config,
            options,
            steps,
            runners: RunnerResolver::new(&config.runner_tags),
            versioned,
            use_packages,
        }
    }

    pub fn build(&self) -> Result<CompiledPipeline> {
        let mut main_jobs = vec![self.synth_job()?, self.asset_job()?];
        let mut stage_workflows = Vec::new();

        for entry in topology::plan(self.config) {
            match entry {
                StageTopology::Sequential { stage, previous } => {
                    main_jobs.push(self.deploy_job(stage, previous)?);
                }
                StageTopology::ManualFork { stage } => {
                    stage_workflows.push(self.release_workflow(stage)?);
                }
                StageTopology::Independent { stage } => {
                    stage_workflows.push(self.independent_workflow(stage)?);
                }
            }
        }

        let main = self.render_workflow(
            GithubWorkflow::new(
                MAIN_WORKFLOW,
                WorkflowTriggers::push_and_dispatch(&self.config.branch),
            ),
            &main_jobs,
        )?;

        let mut workflows = vec![main];
        workflows.extend(stage_workflows);

        log::debug!(
            "github: {} workflow(s), stage workflows: {:?}",
            workflows.len(),
            workflows.iter().skip(1).map(|w| w.name.as_str()).collect::<Vec<_>>()
        );

        Ok(CompiledPipeline::Github {
            workflows,
            registry_auth: self.use_packages.then(|| self.registry_auth()),
        })
    }

    fn synth_job(&self) -> Result<JobPlan> {
        let mut steps: Vec<Step> = self
            .steps
            .synth_role(Some(pipegen_core::step::DEFAULT_SESSION_NAME))
            .into_iter()
            .collect();
        steps.extend(self.steps.install());
        steps.extend(self.steps.synth());
        steps.push(self.steps.upload_assembly());

        Ok(JobPlan::new(SYNTH_JOB, "Synth CDK application", Operation::Synth).steps(steps))
    }

    fn asset_job(&self) -> Result<JobPlan> {
        let mut steps = Vec::new();
        if self.versioned {
            steps.push(Step::command([GIT_IDENTITY_COMMAND]));
        }
        steps.extend(self.steps.asset_role(Some(ASSET_REGION))?);
        steps.push(self.steps.download_assembly());
        steps.extend(self.steps.install());
        steps.extend(self.steps.publish_assets(self.versioned)?);

        Ok(
            JobPlan::new(ASSET_JOB, "Publish assets to AWS", Operation::AssetPublishing)
                .needs([SYNTH_JOB])
                .steps(steps),
        )
    }

    fn deploy_job(&self, stage: &DeploymentStage, previous: Option<&str>) -> Result<JobPlan> {
        let mut steps = vec![self.steps.download_assembly()];
        steps.extend(self.steps.install());
        steps.extend(self.diff_then_deploy(stage)?);
        steps.push(self.steps.upload_outputs(&stage.name));

        Ok(JobPlan::new(
            deploy_job_id(&stage.name),
            format!("Deploy stage {} to AWS", stage.name),
            Operation::Deployment,
        )
        .for_stage(&stage.name)
        .needs([ASSET_JOB.to_string()])
        .needs(previous.map(deploy_job_id))
        .steps(steps))
    }

    /// Diff and deploy of a stage, each under its resolved role
    ///
    /// The deployment role is only assumed again when it differs from the
    /// diff role.
    fn diff_then_deploy(&self, stage: &DeploymentStage) -> Result<Vec<Step>> {
        let name = Some(stage.name.as_str());
        let region = Some(stage.env.region.as_str());

        let diff_role = self.steps.assume_role(Operation::Diff, name, region)?;
        let deploy_role = self.steps.assume_role(Operation::Deployment, name, region)?;

        let mut steps = vec![diff_role.clone(), self.steps.diff(&stage.name)];
        steps.extend(stage.post_diff_steps.iter().cloned());
        if deploy_role != diff_role {
            steps.push(deploy_role);
        }
        steps.push(self.steps.deploy(&stage.name));
        steps.extend(stage.post_deploy_steps.iter().cloned());
        Ok(steps)
    }

    /// Manual stages deploy a published assembly version instead of the
    /// artifact of the current run
    fn release_workflow(&self, stage: &DeploymentStage) -> Result<GithubWorkflow> {
        let project = self.steps.project();
        let package = format!(
            "{}/{}@${{{{github.event.inputs.version}}}}",
            project.package_namespace(),
            project.app_name()
        );

        let mut steps = self.steps.install();
        steps.push(Step::Command(project.install_package_commands(&package)));
        steps.push(Step::command([format!(
            "mv ./node_modules/{}/{} {}",
            project.package_namespace(),
            project.app_name(),
            project.cdk_out()
        )]));
        steps.extend(self.diff_then_deploy(stage)?);
        steps.push(self.steps.upload_outputs(&stage.name));

        let job = JobPlan::new(
            STAGE_WORKFLOW_JOB,
            format!("Release stage {} to AWS", stage.name),
            Operation::Deployment,
        )
        .for_stage(&stage.name)
        .steps(steps);

        let inputs = BTreeMap::from([(
            "version".to_string(),
            DispatchInput {
                description: "Package version".to_string(),
                required: true,
            },
        )]);
        self.render_workflow(
            GithubWorkflow::new(format!("release-{}", stage.name), WorkflowTriggers::dispatch(inputs)),
            &[job],
        )
    }

    fn independent_workflow(&self, stage: &IndependentStage) -> Result<GithubWorkflow> {
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
        steps.push(self.steps.upload_outputs(&stage.name));

        let job = JobPlan::new(
            STAGE_WORKFLOW_JOB,
            format!("Deploy independent stage {} to AWS", stage.name),
            Operation::Deployment,
        )
        .for_stage(&stage.name)
        .steps(steps);

        self.render_workflow(
            GithubWorkflow::new(
                deploy_job_id(&stage.name),
                WorkflowTriggers::dispatch(BTreeMap::new()),
            ),
            &[job],
        )
    }

    fn render_workflow(&self, mut workflow: GithubWorkflow, jobs: &[JobPlan]) -> Result<GithubWorkflow> {
        if self.options.validate_artifacts {
            ConfigValidator::validate_artifact_references(jobs)?;
        }

        for plan in jobs {
            let job = self.render_job(plan)?;
            if workflow.jobs.insert(plan.id.clone(), job).is_err() {
                return Err(CompileError::DuplicateJob {
                    unit: workflow.name.clone(),
                    job: plan.id.clone(),
                });
            }
        }
        Ok(workflow)
    }

    fn render_job(&self, plan: &JobPlan) -> Result<GithubJob> {
        let fragment = GithubCodegen::render_steps(&plan.steps)?;

        let mut needs = plan.needs.clone();
        for need in fragment.needs {
            if !needs.contains(&need) {
                needs.push(need);
            }
        }

        let mut env = BTreeMap::from([("CI".to_string(), "true".to_string())]);
        env.extend(fragment.env);

        let mut steps = vec![self.checkout(plan.operation)];
        steps.extend(fragment.steps);

        Ok(GithubJob {
            name: plan.name.clone(),
            needs,
            runs_on: self.runs_on(plan),
            permissions: self.base_permissions(plan.operation).union(fragment.permissions),
            env,
            steps,
        })
    }

    fn checkout(&self, operation: Operation) -> GithubStep {
        let checkout = GithubStep::uses("Checkout", "actions/checkout@v4");
        match operation {
            // Full history for version bumps
            Operation::AssetPublishing => checkout.with_input("fetch-depth", "0"),
            _ => checkout,
        }
    }

    fn runs_on(&self, plan: &JobPlan) -> Vec<String> {
        self.runners
            .resolve(plan.operation, plan.stage_name())
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| vec![DEFAULT_RUNNER.to_string()])
    }

    fn base_permissions(&self, operation: Operation) -> JobPermissions {
        let publishing = operation == Operation::AssetPublishing;
        let contents = if publishing && self.versioned {
            PermissionLevel::Write
        } else {
            PermissionLevel::Read
        };

        let permissions = JobPermissions::id_token(PermissionLevel::Write).with_contents(contents);
        if !self.use_packages {
            return permissions;
        }
        permissions.with_packages(if publishing {
            PermissionLevel::Write
        } else {
            PermissionLevel::Read
        })
    }

    fn registry_auth(&self) -> RegistryAuth {
        let host = PACKAGE_REGISTRY.trim_start_matches("https:");
        RegistryAuth {
            registry: PACKAGE_REGISTRY.to_string(),
            scope: self.steps.project().package_namespace().to_string(),
            settings: vec![
                (format!("{}/:_authToken", host), "${GITHUB_TOKEN}".to_string()),
                (format!("{}/:always-auth", host), "true".to_string()),
            ],
        }
    }
}
