//! Flat shell script
//!
//! Sequential rendering of the whole pipeline: synth, asset publishing,
//! then every stage in declaration order. There is no job graph, so
//! manual stages only differ by their section title.

use super::assembler::StepAssembler;
use super::plan::JobPlan;
use crate::codegen::{BashCodegen, StepCodegen};
use crate::compiler::CompilerOptions;
use crate::error::Result;
use crate::resolver::Operation;
use crate::topology::{self, StageTopology};
use crate::validator::ConfigValidator;
use pipegen_core::ir::{BashScript, CompiledPipeline};
use pipegen_core::{PipelineConfig, ProjectCommands, Step};

pub(crate) struct BashPipelineBuilder<'a> {
    config: &'a PipelineConfig,
    options: &'a CompilerOptions,
    steps: StepAssembler<'a>,
}

impl<'a> BashPipelineBuilder<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        project: &'a dyn ProjectCommands,
        options: &'a CompilerOptions,
    ) -> Self {
        Self {
            config,
            options,
            steps: StepAssembler::new(config, project),
        }
    }

    pub fn build(&self) -> Result<CompiledPipeline> {
        let sections = self.plan_sections()?;

        if self.options.validate_artifacts {
            ConfigValidator::validate_artifact_references(&sections)?;
        }

        let mut script = BashScript::new();
        for section in &sections {
            let fragment = BashCodegen::render_steps(&section.steps)?;
            script.push_section(&section.name, fragment.commands);
        }

        log::debug!("bash: {} section(s)", script.sections.len());
        Ok(CompiledPipeline::Bash { script })
    }

    /// Sections as a linear chain, each needing the one before
    fn plan_sections(&self) -> Result<Vec<JobPlan>> {
        let versioned = self.config.needs_versioned_artifacts();
        let mut sections = Vec::new();

        let mut synth: Vec<Step> = self.steps.synth_role(None).into_iter().collect();
        synth.extend(self.steps.install());
        synth.extend(self.steps.synth());
        synth.push(self.steps.upload_assembly());
        sections.push(JobPlan::new("synth", "Synth", Operation::Synth).steps(synth));

        let mut assets: Vec<Step> = self.steps.asset_role(None)?.into_iter().collect();
        assets.push(self.steps.download_assembly());
        assets.extend(self.steps.publish_assets(versioned)?);
        sections.push(
            JobPlan::new("publish_assets", "Publish assets", Operation::AssetPublishing)
                .steps(assets),
        );

        for entry in topology::plan(self.config) {
            let section = match entry {
                StageTopology::Sequential { stage, .. } | StageTopology::ManualFork { stage } => {
                    let title = if entry.is_manual() {
                        format!("Stage {} (manual approval)", stage.name)
                    } else {
                        format!("Stage {}", stage.name)
                    };
                    let mut steps = vec![
                        self.steps.assume_role(
                            Operation::Deployment,
                            Some(&stage.name),
                            Some(&stage.env.region),
                        )?,
                        self.steps.download_assembly(),
                        self.steps.diff(&stage.name),
                    ];
                    steps.extend(stage.post_diff_steps.iter().cloned());
                    steps.push(self.steps.deploy(&stage.name));
                    steps.extend(stage.post_deploy_steps.iter().cloned());
                    JobPlan::new(format!("stage-{}", stage.name), title, Operation::Deployment)
                        .for_stage(&stage.name)
                        .steps(steps)
                }
                StageTopology::Independent { stage } => {
                    let mut steps = vec![self.steps.assume_role(
                        Operation::Deployment,
                        Some(&stage.name),
                        Some(&stage.env.region),
                    )?];
                    steps.extend(self.steps.synth());
                    steps.push(self.steps.diff(&stage.name));
                    steps.extend(stage.post_diff_steps.iter().cloned());
                    steps.push(self.steps.deploy(&stage.name));
                    steps.extend(stage.post_deploy_steps.iter().cloned());
                    JobPlan::new(
                        format!("independent-{}", stage.name),
                        format!("Independent stage {}", stage.name),
                        Operation::Deployment,
                    )
                    .for_stage(&stage.name)
                    .steps(steps)
                }
            };
            sections.push(section);
        }

        // A script runs top to bottom
        for index in 1..sections.len() {
            let previous = sections[index - 1].id.clone();
            sections[index].needs.push(previous);
        }
        Ok(sections)
    }
}
