//! Stage topology
//!
//! Decides how each declared stage attaches to the job graph:
//! - sequential stages chain onto the previous sequential stage
//! - manual-approval stages fork off and never join the chain
//! - independent stages stand alone with their own synth
//!
//! The plan is a pure fold over the stage lists; backends only translate it.

use pipegen_core::{DeploymentStage, IndependentStage, PipelineConfig};

/// Placement of one stage in the job graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageTopology<'a> {
    /// Runs after the shared setup and after `previous`, if any
    Sequential {
        stage: &'a DeploymentStage,
        previous: Option<&'a str>,
    },

    /// Released by hand, outside the sequential chain
    ManualFork { stage: &'a DeploymentStage },

    /// Self-contained, no dependency on the shared setup
    Independent { stage: &'a IndependentStage },
}

impl<'a> StageTopology<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            StageTopology::Sequential { stage, .. } | StageTopology::ManualFork { stage } => {
                &stage.name
            }
            StageTopology::Independent { stage } => &stage.name,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, StageTopology::ManualFork { .. })
    }
}

/// Plan the deployment stages in declaration order
pub fn plan_stages(stages: &[DeploymentStage]) -> Vec<StageTopology<'_>> {
    stages
        .iter()
        .scan(None, |last_sequential, stage| {
            if stage.manual_approval {
                return Some(StageTopology::ManualFork { stage });
            }
            let previous = last_sequential.replace(stage.name.as_str());
            Some(StageTopology::Sequential { stage, previous })
        })
        .collect()
}

/// Plan every stage of a pipeline: deployment stages, then independent ones
pub fn plan(config: &PipelineConfig) -> Vec<StageTopology<'_>> {
    let mut topology = plan_stages(&config.stages);
    topology.extend(
        config
            .independent_stages
            .iter()
            .map(|stage| StageTopology::Independent { stage }),
    );
    topology
}
