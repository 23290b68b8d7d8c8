//! CodeCatalyst workflow (deferred)
//!
//! Roles are still resolved and steps validated so configuration errors
//! surface early, but only the sequential chain is emitted and only its
//! command bodies are rendered.

use super::assembler::StepAssembler;
use super::plan::{deploy_job_id, JobPlan};
use crate::codegen::{CodeCatalystCodegen, StepCodegen};
use crate::error::{CompileError, Result};
use crate::resolver::Operation;
use crate::topology::{self, StageTopology};
use pipegen_core::ir::{CodeCatalystWorkflow, CompiledPipeline};
use pipegen_core::{PipelineConfig, ProjectCommands};

const WORKFLOW_NAME: &str = "deploy";

pub(crate) struct CodeCatalystPipelineBuilder<'a> {
    config: &'a PipelineConfig,
    steps: StepAssembler<'a>,
}

impl<'a> CodeCatalystPipelineBuilder<'a> {
    pub fn new(config: &'a PipelineConfig, project: &'a dyn ProjectCommands) -> Self {
        Self {
            config,
            steps: StepAssembler::new(config, project),
        }
    }

    pub fn build(&self) -> Result<CompiledPipeline> {
        let mut jobs = Vec::new();
        let mut skipped = Vec::new();

        let mut synth: Vec<_> = self.steps.synth_role(None).into_iter().collect();
        synth.extend(self.steps.install());
        synth.extend(self.steps.synth());
        jobs.push(JobPlan::new("synth", "Synth", Operation::Synth).steps(synth));

        let mut assets: Vec<_> = self.steps.asset_role(None)?.into_iter().collect();
        assets.extend(self.steps.install());
        assets.extend(
            self.steps
                .publish_assets(self.config.needs_versioned_artifacts())?,
        );
        jobs.push(
            JobPlan::new("assetUpload", "Publish assets", Operation::AssetPublishing)
                .needs(["synth"])
                .steps(assets),
        );

        for entry in topology::plan(self.config) {
            match entry {
                StageTopology::Sequential { stage, previous } => {
                    let mut steps = vec![self.steps.assume_role(
                        Operation::Deployment,
                        Some(&stage.name),
                        Some(&stage.env.region),
                    )?];
                    steps.extend(self.steps.install());
                    steps.push(self.steps.deploy(&stage.name));
                    steps.extend(stage.post_deploy_steps.iter().cloned());
                    jobs.push(
                        JobPlan::new(
                            deploy_job_id(&stage.name),
                            format!("Deploy {}", stage.name),
                            Operation::Deployment,
                        )
                        .for_stage(&stage.name)
                        .needs(["assetUpload".to_string()])
                        .needs(previous.map(deploy_job_id))
                        .steps(steps),
                    );
                }
                StageTopology::ManualFork { .. } | StageTopology::Independent { .. } => {
                    // Resolve anyway: a missing role is a configuration error
                    self.steps
                        .assume_role(Operation::Deployment, Some(entry.name()), None)?;
                    skipped.push(entry.name());
                }
            }
        }

        let notice = if skipped.is_empty() {
            "CodeCatalyst support is preliminary: credentials and artifacts are not rendered"
                .to_string()
        } else {
            format!(
                "CodeCatalyst support is preliminary: credentials and artifacts are not rendered, stages not emitted: {}",
                skipped.join(", ")
            )
        };
        log::warn!("{}", notice);

        let mut workflow = CodeCatalystWorkflow::new(WORKFLOW_NAME, notice);
        for plan in jobs {
            let mut action = CodeCatalystCodegen::render_steps(&plan.steps)?;
            let mut needs = plan.needs.clone();
            needs.extend(action.needs.drain(..).filter(|n| !plan.needs.contains(n)));
            action.needs = needs;

            if workflow.actions.insert(plan.id.clone(), action).is_err() {
                return Err(CompileError::DuplicateJob {
                    unit: workflow.name.clone(),
                    job: plan.id,
                });
            }
        }

        Ok(CompiledPipeline::CodeCatalyst { workflow })
    }
}
