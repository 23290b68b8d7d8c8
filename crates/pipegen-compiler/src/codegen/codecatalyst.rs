//! CodeCatalyst step rendering
//!
//! Deferred backend: only command bodies are carried over. Other steps
//! render empty instead of failing so pipelines still compile.

use super::StepCodegen;
use crate::error::Result;
use pipegen_core::ir::CodeCatalystStepConfig;
use pipegen_core::{PipelineEngine, Step};

pub struct CodeCatalystCodegen;

impl StepCodegen for CodeCatalystCodegen {
    type Fragment = CodeCatalystStepConfig;
    const ENGINE: PipelineEngine = PipelineEngine::CodeCatalyst;

    fn render_step(step: &Step) -> Result<CodeCatalystStepConfig> {
        let fragment = match step {
            Step::Command(commands) => CodeCatalystStepConfig {
                commands: commands.clone(),
                ..Default::default()
            },
            Step::Custom(custom) => custom.codecatalyst.clone().unwrap_or_default(),
            Step::AssumeRole(_) | Step::UploadArtifact(_) | Step::DownloadArtifact(_) => {
                log::trace!("{} not rendered for codecatalyst", step.describe());
                CodeCatalystStepConfig::default()
            }
        };
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipegen_core::{AssumeRoleConfig, CustomStep};

    #[test]
    fn test_only_commands_render() {
        let fragment = CodeCatalystCodegen::render_steps(&[
            Step::assume_role(AssumeRoleConfig::new("arn:role")),
            Step::command(["npx projen build"]),
            Step::custom(CustomStep::new("github-only").with_github(Default::default())),
        ])
        .unwrap();
        assert_eq!(fragment.commands, vec!["npx projen build"]);
    }
}
