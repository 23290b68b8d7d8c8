//! Shell step rendering

use super::{unsupported, StepCodegen, DEFAULT_REGION};
use crate::error::Result;
use pipegen_core::ir::BashStepConfig;
use pipegen_core::{PipelineEngine, Step};

/// Renders steps as shell lines
///
/// The script runs in a single environment, so credential and artifact
/// steps only announce what a CI system would do at that point.
pub struct BashCodegen;

impl StepCodegen for BashCodegen {
    type Fragment = BashStepConfig;
    const ENGINE: PipelineEngine = PipelineEngine::Bash;

    fn render_step(step: &Step) -> Result<BashStepConfig> {
        let commands = match step {
            Step::Command(commands) => commands.clone(),
            Step::AssumeRole(config) => vec![format!(
                "echo \"Login to AWS using role {} for region {}\"",
                config.role_arn,
                config.region.as_deref().unwrap_or(DEFAULT_REGION)
            )],
            Step::UploadArtifact(config) => vec![format!(
                "echo \"Upload artifact {} from {}\"",
                config.name, config.path
            )],
            Step::DownloadArtifact(config) => vec![format!(
                "echo \"Download artifact {} to {}\"",
                config.name, config.path
            )],
            Step::Custom(custom) => {
                return custom
                    .bash
                    .clone()
                    .ok_or_else(|| unsupported(step, Self::ENGINE))
            }
        };
        Ok(BashStepConfig { commands })
    }
}
